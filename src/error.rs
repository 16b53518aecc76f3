// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ApiResponse;

/// Message returned to clients for any unexpected server-side failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "服务器内部错误";

/// Prefix of the message returned when no route matches.
pub const NOT_FOUND_MESSAGE: &str = "接口不存在";

/// Request-level failure rendered as a failure [`ApiResponse`].
///
/// `message` is sent to the client and must not contain internal detail.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// No route matched `path`.
    pub fn route_not_found(path: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{NOT_FOUND_MESSAGE}: {path}"))
    }

    /// Unexpected failure. `detail` is logged and never sent to the client.
    pub fn internal(detail: impl Display) -> Self {
        tracing::error!(error = %detail, "request failed with internal error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ApiResponse::<()>::failure(self.message));
        (self.status, body).into_response()
    }
}
