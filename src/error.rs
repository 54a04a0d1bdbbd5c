//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::store::StoreError;

/// Application-wide error type.
///
/// Every handler returns `Result<T, AppError>`; nothing is retried and no
/// error outlives the request that produced it.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required field is missing or a value is malformed.
    ///
    /// Returns HTTP 400 Bad Request with the contained message.
    #[error("{0}")]
    Validation(String),

    /// No record matched. The message names the resource, e.g. "User not found".
    ///
    /// Returns HTTP 404 Not Found.
    #[error("{0}")]
    NotFound(&'static str),

    /// Submitted MPIN does not match the stored one.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Incorrect MPIN")]
    CredentialMismatch,

    /// Operation not valid for the account's current credential state.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("{0}")]
    InvalidState(String),

    /// Admin bearer key missing or wrong.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid API key")]
    Unauthorized,

    /// The record store failed or is unreachable.
    ///
    /// Returns HTTP 500 and hides the details from the client.
    #[error("Store error: {0}")]
    Store(StoreError),
}

/// Duplicate keys are the caller's fault; everything else from the store is ours.
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(what) => AppError::Validation(format!("{what} already exists")),
            other => AppError::Store(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidState(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::CredentialMismatch | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// { "error": "Human-readable error message" }
/// ```
///
/// # Status Code Mapping
///
/// - `Validation`, `InvalidState` → 400 Bad Request
/// - `CredentialMismatch`, `Unauthorized` → 401 Unauthorized
/// - `NotFound` → 404 Not Found
/// - `Store` → 500 Internal Server Error (details only in logs)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Store(ref err) => {
                tracing::error!(error = %err, "Record store failure");
                "Internal server error".to_string()
            }
            ref other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            AppError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InvalidState("MPIN not set".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("User not found").status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::CredentialMismatch.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Store(StoreError::Database(sqlx::Error::PoolTimedOut)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn duplicate_becomes_validation() {
        let err: AppError = StoreError::Duplicate("bank link bl1".into()).into();

        assert!(matches!(err, AppError::Validation(ref m) if m == "bank link bl1 already exists"));
    }
}
