//! HTTP route definitions.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::http::handlers;
use crate::state::AppState;

/// Build the router.
///
/// ```text
/// /services
///   GET    /services                  - List service snapshots
///   GET    /services/{id}             - Service snapshot
///   POST   /services/{id}/alerts      - Report an incident
///   POST   /services/{id}/acknowledge - Acknowledge the current alert
///   POST   /services/{id}/healthy     - Report recovery
///
/// /health - Liveness
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/services", get(handlers::list_services))
        .route("/services/{id}", get(handlers::get_service))
        .route("/services/{id}/alerts", post(handlers::receive_alert))
        .route("/services/{id}/acknowledge", post(handlers::acknowledge))
        .route("/services/{id}/healthy", post(handlers::healthy))
        .route("/health", get(handlers::health))
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
