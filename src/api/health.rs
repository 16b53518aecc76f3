// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::models::{ApiIndex, ApiResponse, HealthResponse};
use crate::state::AppState;

/// Health check endpoint handler.
///
/// Always returns 200 while the process is serving.
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is running", body = ApiResponse<HealthResponse>)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse::running(
        state.settings.app_name(),
    )))
}

/// API index listing the available endpoint prefixes.
#[utoipa::path(
    get,
    path = "/api",
    tag = "Health",
    responses(
        (status = 200, description = "Available endpoints", body = ApiResponse<ApiIndex>)
    )
)]
pub async fn index(State(state): State<AppState>) -> Json<ApiResponse<ApiIndex>> {
    Json(ApiResponse::success(ApiIndex::new(state.settings.app_name())))
}
