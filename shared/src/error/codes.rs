//! Unified error codes for the catalog admin
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 6xxx: Catalog errors (menu items, payment methods, variations, groups)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,

    // ==================== 6xxx: Catalog ====================
    /// Menu item not found
    MenuItemNotFound = 6001,
    /// Payment method not found
    PaymentMethodNotFound = 6101,
    /// Variation not found
    VariationNotFound = 6201,
    /// Variation group not found
    GroupNotFound = 6301,
    /// Another group already uses this name
    GroupNameExists = 6302,
    /// Group name collides with the reserved placeholder prefix
    GroupNameReserved = 6303,
    /// Group deletion was not confirmed by the caller
    GroupDeleteNotConfirmed = 6304,
    /// Reorder payload is not a permutation of the current collection
    InvalidPermutation = 6401,
    /// Rank is not a positive integer
    InvalidRank = 6402,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
    /// A multi-row write stopped partway; state must be re-read
    BatchPartiallyApplied = 9006,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the default message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            Self::ValidationFailed => "Validation failed",
            Self::NotFound => "Resource not found",

            // Catalog
            Self::MenuItemNotFound => "Menu item not found",
            Self::PaymentMethodNotFound => "Payment method not found",
            Self::VariationNotFound => "Variation not found",
            Self::GroupNotFound => "Group not found",
            Self::GroupNameExists => "Group name already exists",
            Self::GroupNameReserved => "Group name is reserved",
            Self::GroupDeleteNotConfirmed => "Group deletion must be confirmed",
            Self::InvalidPermutation => "Order must list every item exactly once",
            Self::InvalidRank => "Rank must be a positive integer",

            // System
            Self::DatabaseError => "Database error",
            Self::BatchPartiallyApplied => "Update was only partially applied, please reload",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code as u16
    }
}

/// Error returned when converting an unknown u16 to [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),

            // Catalog
            6001 => Ok(ErrorCode::MenuItemNotFound),
            6101 => Ok(ErrorCode::PaymentMethodNotFound),
            6201 => Ok(ErrorCode::VariationNotFound),
            6301 => Ok(ErrorCode::GroupNotFound),
            6302 => Ok(ErrorCode::GroupNameExists),
            6303 => Ok(ErrorCode::GroupNameReserved),
            6304 => Ok(ErrorCode::GroupDeleteNotConfirmed),
            6401 => Ok(ErrorCode::InvalidPermutation),
            6402 => Ok(ErrorCode::InvalidRank),

            // System
            9002 => Ok(ErrorCode::DatabaseError),
            9006 => Ok(ErrorCode::BatchPartiallyApplied),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
