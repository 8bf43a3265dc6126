//! Pager error types.

use thiserror::Error;

/// Errors surfaced by the pager core and its collaborators.
///
/// None of these are fatal to the process. Notification failures are
/// recovered inside the escalation batch; unknown services are reported
/// to the caller; persistence failures are logged and skipped.
#[derive(Debug, Error)]
pub enum PagerError {
    /// An event referenced a service id that is not registered.
    #[error("Service not found: {0}")]
    UnknownService(String),

    /// A target failed to deliver a notification.
    #[error("Notification via target '{target}' failed: {reason}")]
    Notification { target: String, reason: String },

    /// The persistence backend rejected a save or load.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PagerError {
    /// Build a notification failure for `target`.
    pub fn notification(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Notification {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_service_display() {
        let err = PagerError::UnknownService("billing".to_string());
        assert!(err.to_string().contains("Service not found"));
        assert!(err.to_string().contains("billing"));
    }

    #[test]
    fn test_notification_display() {
        let err = PagerError::notification("oncall-sms", "gateway unreachable");
        let display = err.to_string();
        assert!(display.contains("oncall-sms"));
        assert!(display.contains("gateway unreachable"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing file");
        let err = PagerError::from(io_err);
        assert!(err.to_string().contains("missing file"));
    }

    #[test]
    fn test_serialization_error_from() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = PagerError::from(json_err);
        assert!(matches!(err, PagerError::Serialization(_)));
    }
}
