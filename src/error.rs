//! Error types for the pod tracker
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Tracker Error Enum ==
/// Unified error type for the pod tracker.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// Cache capacity must be at least one entry
    #[error("Invalid cache capacity: {0} (must be greater than zero)")]
    InvalidCapacity(usize),

    /// Cluster client could not be configured
    #[error("Invalid cluster client configuration: {0}")]
    ClientConfig(String),

    /// Pod is neither cached nor known to the cluster
    #[error("Pod not found: {0}")]
    NotFound(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for TrackerError {
    fn into_response(self) -> Response {
        let status = match &self {
            TrackerError::NotFound(_) => StatusCode::NOT_FOUND,
            TrackerError::InvalidCapacity(_) | TrackerError::ClientConfig(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the pod tracker.
pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = TrackerError::NotFound("ns_pod".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_invalid_capacity_message() {
        let err = TrackerError::InvalidCapacity(0);
        assert!(err.to_string().contains("must be greater than zero"));
    }
}
