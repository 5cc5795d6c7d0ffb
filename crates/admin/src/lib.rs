//! TheColoringBliss admin console library.
//!
//! This crate provides the admin functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Security
//!
//! Every page except `/login` requires a store account with the admin role.
//! The role is checked again on each request, and the store API enforces it
//! independently on every admin endpoint.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod filters;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod views;

use std::path::Path;

use axum::{Router, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Build the admin router with its session, security, and trace layers.
/// Sentry layers are added by the binary.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    let session_layer = middleware::create_session_layer(state.config())
        .with_signed(middleware::session_key(state.config()));

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::security_headers_middleware,
        ))
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
