//! Defines routes for the browsing API.
//!
//! ## Structure
//! - `GET /healthz`    — liveness
//! - `GET /readyz`     — readiness (probes the storage endpoint)
//! - `GET /api/browse` — paginated folder/file listing under a prefix
//!   (`?prefix=&foldersPage=&filesPage=&itemsPerPage=`)
//! - `GET /api/access` — metadata + signed link for one object
//!   (`?key=&disposition=`)
//!
//! The router carries shared state (`AppState`) to all handlers. CORS is
//! wide open: the browser UI consuming this API is served from elsewhere.

use axum::{Router, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{
        browse_handlers::{browse, get_access},
        health_handlers::{healthz, readyz},
    },
    services::AppState,
};

/// Build and return the router for all browsing routes.
pub fn routes() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // health endpoints (mounted at root)
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // browsing API
        .route("/api/browse", get(browse))
        .route("/api/access", get(get_access))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
