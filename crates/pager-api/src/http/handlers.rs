//! Service event and status handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use pager_protocols::ServiceSnapshot;

use crate::error::ApiError;
use crate::state::AppState;

/// Body of an alert report.
#[derive(Debug, Deserialize)]
pub struct AlertRequest {
    pub message: String,
}

/// Reply to an accepted event.
#[derive(Debug, Serialize)]
pub struct EventResponse {
    pub service_id: String,
    pub event: &'static str,
    pub status: &'static str,
}

impl EventResponse {
    fn accepted(service_id: String, event: &'static str) -> (StatusCode, Json<Self>) {
        (
            StatusCode::ACCEPTED,
            Json(Self {
                service_id,
                event,
                status: "accepted",
            }),
        )
    }
}

/// Response for listing services.
#[derive(Debug, Serialize)]
pub struct ServiceListResponse {
    pub count: usize,
    pub services: Vec<ServiceSnapshot>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub services: usize,
    pub uptime_seconds: u64,
}

/// Report an incident.
///
/// POST /services/{id}/alerts
pub async fn receive_alert(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<AlertRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.increment_requests();
    info!("Alert reported for service '{}': {}", id, request.message);

    state.alerting.receive_alert(&id, &request.message).await?;
    Ok(EventResponse::accepted(id, "alert"))
}

/// Acknowledge the current alert.
///
/// POST /services/{id}/acknowledge
pub async fn acknowledge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.increment_requests();
    if !state.pager.contains(&id) {
        return Err(ApiError::ServiceNotFound(id));
    }

    info!("Acknowledgment received for service '{}'", id);
    state.pager.process_acknowledgment(&id).await;
    Ok(EventResponse::accepted(id, "acknowledge"))
}

/// Report recovery.
///
/// POST /services/{id}/healthy
pub async fn healthy(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    state.increment_requests();
    if !state.pager.contains(&id) {
        return Err(ApiError::ServiceNotFound(id));
    }

    info!("Healthy report received for service '{}'", id);
    state.pager.process_healthy_event(&id).await;
    Ok(EventResponse::accepted(id, "healthy"))
}

/// List every service.
///
/// GET /services
pub async fn list_services(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let services = state.pager.snapshots().await;
    debug!("Listing {} service(s)", services.len());
    Json(ServiceListResponse {
        count: services.len(),
        services,
    })
}

/// Get one service.
///
/// GET /services/{id}
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ServiceSnapshot>, ApiError> {
    match state.pager.snapshot(&id).await {
        Some(snapshot) => Ok(Json(snapshot)),
        None => Err(ApiError::ServiceNotFound(id)),
    }
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        services: state.pager.len(),
        uptime_seconds: state.uptime().as_secs(),
    })
}
