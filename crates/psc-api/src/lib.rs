//! # psc-api — Axum API Service for the PSC Stack
//!
//! The service surface over the publishing core. Assembles the entity,
//! connection, and translation routers into one application with
//! request tracing and health probes.
//!
//! ## API Surface
//!
//! | Prefix                     | Module                      | Domain |
//! |----------------------------|-----------------------------|--------|
//! | `/v1/entities/*`           | [`routes::entities`]        | Publishing lifecycle |
//! | `/v1/connections/*`        | [`routes::connections`]     | Connection workbench |
//! | `/v1/translation-orders/*` | [`routes::translations`]    | Vendor orders |
//! | `/health/*`                | crate root                  | Probes (no state) |
//! | `/openapi.json`            | [`openapi`]                 | API document |
//!
//! ## Crate Policy
//!
//! - Sits at the top of the dependency DAG — depends on all other crates.
//! - No business logic in route handlers — parse, delegate, map errors.
//! - All errors map to structured HTTP responses via [`AppError`].
//! - The surrounding platform authenticates; requests carry the already
//!   authorized actor identity in their bodies and the core records it.

pub mod error;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Assemble the full application router.
///
/// Health probes are mounted without state so they stay alive whatever
/// happens to the domain components.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::entities::router())
        .merge(routes::connections::router())
        .merge(routes::translations::router())
        .merge(openapi::router())
        .with_state(state);

    Router::new()
        .merge(api)
        .route("/health/liveness", get(|| async { "ok" }))
        .route("/health/readiness", get(|| async { "ready" }))
        .layer(TraceLayer::new_for_http())
}
