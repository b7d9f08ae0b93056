//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::NotFound
            | Self::MenuItemNotFound
            | Self::PaymentMethodNotFound
            | Self::VariationNotFound
            | Self::GroupNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::GroupNameExists => StatusCode::CONFLICT,

            // 428 Precondition Required
            Self::GroupDeleteNotConfirmed => StatusCode::PRECONDITION_REQUIRED,

            // 500 Internal Server Error
            Self::DatabaseError | Self::BatchPartiallyApplied => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request
            Self::ValidationFailed
            | Self::GroupNameReserved
            | Self::InvalidPermutation
            | Self::InvalidRank => StatusCode::BAD_REQUEST,
        }
    }
}
