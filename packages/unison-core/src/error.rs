//! Centralized error types for the Unison core library.
//!
//! This module provides a unified error handling system that:
//! - Defines structured error types using `thiserror`
//! - Maps errors to appropriate HTTP status codes
//! - Implements `IntoResponse` for automatic JSON error responses
//!
//! Note that invalid *room commands* (ownership violations, out-of-range
//! indices) are not errors at all: the room state machine silently ignores
//! them by design. These types cover the HTTP surface and internal failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Application-wide error type for the Unison server.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum UnisonError {
    /// Client sent an invalid or malformed request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The byte-proxy origin failed or cannot serve a direct file.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// A feature is disabled by configuration.
    #[error("Feature disabled: {0}")]
    Disabled(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl UnisonError {
    /// Returns a machine-readable error code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::Upstream(_) => "upstream_error",
            Self::Disabled(_) => "feature_disabled",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Maps the error to an appropriate HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Disabled(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convenient Result alias for application-wide operations.
pub type UnisonResult<T> = Result<T, UnisonError>;

/// JSON response body for error responses.
#[derive(Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    status: u16,
}

impl IntoResponse for UnisonError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.code(),
            message: self.to_string(),
            status: status.as_u16(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<reqwest::Error> for UnisonError {
    fn from(err: reqwest::Error) -> Self {
        Self::Upstream(err.to_string())
    }
}
