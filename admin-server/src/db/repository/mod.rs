//! Repository Module
//!
//! SQLite CRUD as free functions over `&SqlitePool`, plus the rank stores the
//! ordering engine writes through.

pub mod menu_item;
pub mod payment_method;
pub mod ranks;
pub mod variation;

pub use ranks::{RankScope, SqliteRankStore};
pub use variation::SqliteVariationStore;

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepoError::NotFound("Row not found".into()),
            other => RepoError::Database(other.to_string()),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                AppError::database(msg)
            }
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Reject blank names before they reach the database
pub(crate) fn require_name(name: &str, what: &str) -> RepoResult<()> {
    if name.trim().is_empty() {
        return Err(RepoError::Validation(format!("{what} name must not be empty")));
    }
    Ok(())
}
