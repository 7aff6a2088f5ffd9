//! storyreel: API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use storyreel_core::error::DomainError;
use thiserror::Error;
use tracing::{debug, warn};

/// Startup errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is invalid, or the catalog was refused.
    #[error("configuration error: {0}")]
    Config(String),

    /// Catalog, state or database setup failed.
    #[error("startup failed: {0}")]
    Domain(#[from] DomainError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            DomainError::PageNotFound(_) => (StatusCode::NOT_FOUND, "page_not_found"),
            DomainError::GraphIntegrity { .. } => (StatusCode::CONFLICT, "graph_integrity_error"),
            DomainError::Content(_) => (StatusCode::UNPROCESSABLE_ENTITY, "content_error"),
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DomainError::PersistenceRead(_) | DomainError::PersistenceWrite(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "persistence_error")
            }
            DomainError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        };

        if self.0.is_soft() {
            warn!(error = %self.0, "request failed");
        } else {
            debug!(error = %self.0, "request rejected");
        }

        let body = ErrorBody {
            error: error_code,
            message: self.0.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
