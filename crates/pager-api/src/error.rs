//! API error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use pager_protocols::PagerError;

/// Errors returned by HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No monitored service with this id.
    #[error("Service '{0}' not found")]
    ServiceNotFound(String),

    #[error(transparent)]
    Pager(#[from] PagerError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ServiceNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Pager(PagerError::UnknownService(_)) => StatusCode::NOT_FOUND,
            ApiError::Pager(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
