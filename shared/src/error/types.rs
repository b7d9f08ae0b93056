//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the primary error type of the catalog admin, providing:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details for debugging
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }
}

/// Error body returned by every failing endpoint
///
/// - `code`: Error code
/// - `message`: Human-readable message
/// - `details`: Additional error details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Error code
    pub code: u16,
    /// Human-readable message
    pub message: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl ApiResponse {
    /// Create an error response from an AppError
    pub fn error(err: &AppError) -> Self {
        Self {
            code: err.code.code(),
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ApiResponse::error(&self);

        // Log system errors
        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::GroupNotFound);
        assert_eq!(err.code, ErrorCode::GroupNotFound);
        assert_eq!(err.message, "Group not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::new(ErrorCode::BatchPartiallyApplied)
            .with_detail("applied", 2)
            .with_detail("total", 5);

        let details = err.details.unwrap();
        assert_eq!(details.get("applied").unwrap(), 2);
        assert_eq!(details.get("total").unwrap(), 5);
    }

    #[test]
    fn test_app_error_convenience_constructors() {
        let err = AppError::validation("name is required");
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = AppError::database("disk I/O error");
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.http_status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_api_response_error() {
        let err = AppError::new(ErrorCode::InvalidPermutation).with_detail("missing", 3);
        let response = ApiResponse::error(&err);

        assert_eq!(response.code, 6401);
        assert_eq!(response.message, "Order must list every item exactly once");
        assert!(response.details.is_some());
    }

    #[test]
    fn test_api_response_serialize() {
        let response = ApiResponse::error(&AppError::new(ErrorCode::GroupNotFound));
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"code\":6301"));
        assert!(json.contains("\"message\":\"Group not found\""));
        assert!(!json.contains("details"));
    }

    #[tokio::test]
    async fn test_app_error_into_response() {
        use axum::response::IntoResponse;
        use http_body_util::BodyExt;

        let response = AppError::new(ErrorCode::GroupDeleteNotConfirmed)
            .with_detail("group", "Gems")
            .into_response();
        assert_eq!(response.status(), StatusCode::PRECONDITION_REQUIRED);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: ApiResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.code, 6304);
        assert_eq!(body.details.unwrap()["group"], "Gems");
    }
}
