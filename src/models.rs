// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the response structures returned by the REST API.
//! Every endpoint answers with an [`ApiResponse`] envelope so clients can
//! branch on `success` alone.
//!
//! ## Envelope Shape
//!
//! ```json
//! { "success": true,  "data": { ... },        "timestamp": "2026-01-01T00:00:00.000Z" }
//! { "success": false, "error": "description", "timestamp": "2026-01-01T00:00:00.000Z" }
//! ```
//!
//! Exactly one of `data` and `error` is present.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Application version reported by the health and index endpoints.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current development milestone.
pub const EPIC: &str = "Epic 0: 技术环境搭建";

// =============================================================================
// Response Envelope
// =============================================================================

/// Uniform wrapper for every API outcome.
///
/// Fields are private; build values with [`ApiResponse::success`] or
/// [`ApiResponse::failure`].
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    success: bool,
    /// Payload, present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    /// Error description, present only on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    /// ISO-8601 UTC time the response was built.
    timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: now_iso8601(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            timestamp: now_iso8601(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// =============================================================================
// Health Models
// =============================================================================

/// Payload of `GET /api/health`.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct HealthResponse {
    /// Human-readable status line.
    pub message: String,
    /// Service version.
    pub version: String,
    /// Current development milestone.
    pub epic: String,
}

impl HealthResponse {
    pub fn running(app_name: &str) -> Self {
        Self {
            message: format!("{app_name}后端服务正常运行"),
            version: APP_VERSION.to_string(),
            epic: EPIC.to_string(),
        }
    }
}

// =============================================================================
// API Index Models
// =============================================================================

/// Endpoint prefixes advertised by `GET /api`.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct ApiEndpoints {
    pub health: String,
    pub ai: String,
    pub project: String,
    pub file: String,
}

impl Default for ApiEndpoints {
    fn default() -> Self {
        Self {
            health: "/api/health".to_string(),
            ai: "/api/ai/*".to_string(),
            project: "/api/project/*".to_string(),
            file: "/api/file/*".to_string(),
        }
    }
}

/// Payload of `GET /api`.
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct ApiIndex {
    pub message: String,
    pub version: String,
    pub endpoints: ApiEndpoints,
}

impl ApiIndex {
    pub fn new(app_name: &str) -> Self {
        Self {
            message: format!("{app_name} API"),
            version: APP_VERSION.to_string(),
            endpoints: ApiEndpoints::default(),
        }
    }
}
