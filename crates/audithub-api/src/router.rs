//! Route definitions for the AuditHub HTTP API.
//!
//! All routes are mounted under `/api`. The router receives `AppState`
//! and passes it to all handlers via Axum's `State` extractor.

use std::time::Duration;

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use audithub_core::config::app::CorsConfig;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(share_routes())
        .merge(audit_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state.config.server.cors);
    let timeout = TimeoutLayer::new(Duration::from_secs(
        state.config.server.request_timeout_seconds,
    ));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(timeout)
        .layer(cors)
        .with_state(state)
}

/// Share token endpoints: create, validate, revoke.
fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/shares", post(handlers::share::create_share))
        .route("/shares/validate", get(handlers::share::validate_share))
        .route("/shares/{token_id}", delete(handlers::share::revoke_share))
}

/// Audit trail endpoints: ingest and history.
fn audit_routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(handlers::events::create_event))
        .route(
            "/sessions/{id}/history",
            get(handlers::history::session_history),
        )
}

/// Health check endpoint (no auth required).
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Build CORS layer from configuration.
fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    use http::Method;
    use tower_http::cors::{AllowOrigin, Any};

    let mut cors = CorsLayer::new();

    if config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<http::HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(AllowOrigin::list(origins));
    }

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    if config.allowed_headers.iter().any(|h| h == "*") {
        cors = cors.allow_headers(Any);
    }

    cors.max_age(Duration::from_secs(config.max_age_seconds))
}
