// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Novel Studio - Writing Platform Backend
//!
//! Backend scaffold for the AI-assisted novel writing platform. Settings are
//! loaded and validated once at startup, then shared read-only with the HTTP
//! layer, which answers every request with a uniform response envelope.
//!
//! ## Modules
//!
//! - `api` - HTTP routes and middleware (Axum)
//! - `config` - Environment configuration and validation
//! - `domain` - Writer roles and project stages
//! - `models` - Response envelope and payloads

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod models;
pub mod observability;
pub mod secret;
pub mod startup;
pub mod state;
