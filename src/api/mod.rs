// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::any::Any;

use axum::{
    http::{header, HeaderName, HeaderValue, Method, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::Settings,
    error::ApiError,
    models::{ApiEndpoints, ApiIndex, HealthResponse},
    state::AppState,
};

pub mod health;
pub mod security;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState) -> Router {
    let settings = state.settings.clone();

    let api_routes = Router::new()
        .route("/api", get(health::index))
        .route("/api/health", get(health::health))
        .with_state(state);

    let app = Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));

    with_middleware(app, &settings)
}

/// Attach the not-found fallback and the shared middleware stack.
///
/// Layers run outermost first: request id, tracing, request id
/// propagation, security headers, CORS, panic recovery.
pub fn with_middleware(app: Router, settings: &Settings) -> Router {
    let app = app.fallback(not_found).layer(
        ServiceBuilder::new()
            .layer(cors_layer(settings))
            .layer(CatchPanicLayer::custom(handle_panic)),
    );

    security::add_security_headers(app).layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id()),
    )
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::route_not_found(uri.path())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    ApiError::internal(format!("handler panicked: {detail}")).into_response()
}

fn cors_layer(settings: &Settings) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
        .allow_credentials(true);

    match HeaderValue::from_str(settings.allowed_origin()) {
        Ok(origin) => layer.allow_origin(AllowOrigin::list([origin])),
        Err(e) => {
            tracing::warn!(
                origin = settings.allowed_origin(),
                error = %e,
                "Allowed origin is not a valid header value, cross-origin requests will be refused"
            );
            layer
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health::health, health::index),
    components(schemas(HealthResponse, ApiIndex, ApiEndpoints)),
    tags(
        (name = "Health", description = "Service health and endpoint discovery")
    )
)]
struct ApiDoc;
