//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps domain errors from the store, the connection engine, and the
//! translation coordinator to HTTP status codes with JSON bodies.
//! Internal error details are never exposed to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use psc_connections::{ConnectionError, ConnectionTypeError};
use psc_core::CoreError;
use psc_store::StoreError;
use psc_translation::OrderError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// The error payload.
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g. "NOT_FOUND", "CONFLICT").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that maps to HTTP responses.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Request content failed validation (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// The request lost against current resource state — stale revision,
    /// illegal transition, or an ineligible endpoint (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Retryable contention (503).
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error (500). Logged, not returned to clients.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::ServiceUnavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        match &self {
            Self::Internal(_) => tracing::error!(error = %self, "internal server error"),
            Self::ServiceUnavailable(_) => tracing::warn!(error = %self, "service unavailable"),
            _ => {}
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EntityNotFound(_) | StoreError::VersionNotFound { .. } => {
                Self::NotFound(err.to_string())
            }
            StoreError::InvalidTransition(_)
            | StoreError::ConcurrencyConflict { .. }
            | StoreError::VersionExists { .. }
            | StoreError::ReviewIneligible { .. }
            | StoreError::RemoveIneligible { .. } => Self::Conflict(err.to_string()),
            StoreError::LanguageNotEnabled { .. } | StoreError::EmptyDisplayName => {
                Self::Validation(err.to_string())
            }
            StoreError::Contention(_) => Self::ServiceUnavailable(err.to_string()),
        }
    }
}

impl From<ConnectionError> for AppError {
    fn from(err: ConnectionError) -> Self {
        match err {
            ConnectionError::NotFound(_) => Self::NotFound(err.to_string()),
            ConnectionError::EndpointIneligible(_) => Self::Conflict(err.to_string()),
            ConnectionError::InvalidValidityWindow { .. } | ConnectionError::Hours(_) => {
                Self::Validation(err.to_string())
            }
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::NotFound(_) => Self::NotFound(err.to_string()),
            OrderError::SourceNotLive { .. } => Self::Conflict(err.to_string()),
            OrderError::Store(inner) => inner.into(),
            OrderError::NoTargetLanguages
            | OrderError::SourceIsTarget(_)
            | OrderError::LanguageNotEnabled { .. }
            | OrderError::EmptyContact => Self::Validation(err.to_string()),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<ConnectionTypeError> for AppError {
    fn from(err: ConnectionTypeError) -> Self {
        Self::Validation(err.to_string())
    }
}
