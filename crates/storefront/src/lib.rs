//! Puja Samagri storefront library.
//!
//! Server-rendered shop for complete puja kits. The binary in `main.rs`
//! only loads configuration and serves [`app`]; everything else lives
//! here so integration tests can drive the full router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use std::path::Path;

use axum::{
    Router,
    http::{HeaderValue, header::CACHE_CONTROL},
    middleware::from_fn,
    routing::get,
};
use tower_http::{
    services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};

use crate::state::AppState;

/// Cache policy for the stylesheet and kit artwork.
const STATIC_CACHE_CONTROL: &str = "public, max-age=3600";

/// Directory with the stylesheet and kit images.
#[must_use]
pub fn static_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}

/// Build the complete storefront router.
///
/// Layers, outermost first: request id, tracing, security headers,
/// session. Sentry layers are added by the binary.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    let assets = Router::new()
        .nest_service("/static", ServeDir::new(static_dir()))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(STATIC_CACHE_CONTROL),
        ));

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes(state.config()))
        .merge(assets)
        .layer(session_layer)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(middleware::request_id_middleware))
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
