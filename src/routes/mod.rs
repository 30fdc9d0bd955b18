// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod auth;
pub mod pages;

use crate::middleware::security::add_security_headers;
use crate::middleware::session_guard;
use crate::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Build the complete router with all routes.
///
/// The session guard wraps every route; which paths it protects is decided
/// by the classification in `middleware::session`.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(pages::dashboard))
        .route(
            "/bookmarks",
            get(pages::bookmarks).post(pages::create_bookmark),
        )
        .route("/bookmarks/{id}/delete", post(pages::delete_bookmark))
        .route("/settings", get(pages::settings))
        .merge(auth::routes())
        .layer(middleware::from_fn_with_state(state.clone(), session_guard))
        .layer(middleware::from_fn(add_security_headers))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
