// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Writing Domain Tables
//!
//! Fixed vocabularies for the writing pipeline: the assistant roles that
//! collaborate on a novel and the directory stages of a novel project.
//! These are reference data only; no workflow is attached to them yet.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Assistant roles in the writing pipeline.
///
/// ## Responsibilities
///
/// - `Director` - Owns the overall creative direction
/// - `Architect` - Designs world settings and characters
/// - `Planner` - Turns settings into outlines and chapter summaries
/// - `Writer` - Produces the chapter text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum WriterRole {
    Director,
    Architect,
    Planner,
    Writer,
}

impl WriterRole {
    pub const ALL: [WriterRole; 4] = [
        WriterRole::Director,
        WriterRole::Architect,
        WriterRole::Planner,
        WriterRole::Writer,
    ];

    /// Parse role from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<WriterRole> {
        match s.to_lowercase().as_str() {
            "director" => Some(WriterRole::Director),
            "architect" => Some(WriterRole::Architect),
            "planner" => Some(WriterRole::Planner),
            "writer" => Some(WriterRole::Writer),
            _ => None,
        }
    }

    /// Localized label shown to authors.
    pub fn display_name(&self) -> &'static str {
        match self {
            WriterRole::Director => "总监",
            WriterRole::Architect => "架构师",
            WriterRole::Planner => "规划师",
            WriterRole::Writer => "写手",
        }
    }
}

impl std::fmt::Display for WriterRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WriterRole::Director => write!(f, "director"),
            WriterRole::Architect => write!(f, "architect"),
            WriterRole::Planner => write!(f, "planner"),
            WriterRole::Writer => write!(f, "writer"),
        }
    }
}

/// Top-level directories of a novel project, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStage {
    /// World and character settings
    Settings,
    /// Story outlines
    Outlines,
    /// Chapter summaries
    Summaries,
    /// Chapter text
    Contents,
}

impl ProjectStage {
    pub const ALL: [ProjectStage; 4] = [
        ProjectStage::Settings,
        ProjectStage::Outlines,
        ProjectStage::Summaries,
        ProjectStage::Contents,
    ];

    /// Directory name inside a project, prefixed with the stage index.
    pub fn dir_name(&self) -> &'static str {
        match self {
            ProjectStage::Settings => "0-小说设定",
            ProjectStage::Outlines => "1-故事大纲",
            ProjectStage::Summaries => "2-故事概要",
            ProjectStage::Contents => "3-小说内容",
        }
    }
}
