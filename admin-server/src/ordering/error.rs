//! Ordering engine errors

use crate::db::repository::RepoError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Errors raised by the sequencer and the grouper
///
/// Input errors are raised before any write is attempted.
#[derive(Debug, Error)]
pub enum OrderingError {
    #[error("Invalid permutation: {0}")]
    InvalidPermutation(String),

    #[error("Invalid rank: {0}")]
    InvalidRank(i32),

    #[error("Entity {0} is not part of this collection")]
    NotFound(i64),

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Group name is reserved: {0}")]
    ReservedName(String),

    #[error("Another group is already named '{0}'")]
    NameInUse(String),

    #[error("Group deletion must be confirmed")]
    ConfirmationRequired,

    /// Nothing was written
    #[error("Write failed: {0}")]
    Write(#[from] RepoError),

    /// The first `applied` writes of a sequential batch are persisted
    #[error("Batch stopped after {applied} of {total} writes: {source}")]
    PartialBatch {
        applied: usize,
        total: usize,
        #[source]
        source: RepoError,
    },
}

pub type OrderingResult<T> = Result<T, OrderingError>;

impl OrderingError {
    /// Error for a sequential batch that failed at write number `applied`
    pub(crate) fn batch(applied: usize, total: usize, source: RepoError) -> Self {
        if applied == 0 {
            Self::Write(source)
        } else {
            Self::PartialBatch {
                applied,
                total,
                source,
            }
        }
    }
}

impl From<OrderingError> for AppError {
    fn from(err: OrderingError) -> Self {
        let message = err.to_string();
        match err {
            OrderingError::InvalidPermutation(_) => {
                AppError::with_message(ErrorCode::InvalidPermutation, message)
            }
            OrderingError::InvalidRank(rank) => {
                AppError::with_message(ErrorCode::InvalidRank, message).with_detail("rank", rank)
            }
            OrderingError::NotFound(id) => {
                AppError::with_message(ErrorCode::NotFound, message).with_detail("id", id)
            }
            OrderingError::GroupNotFound(_) => {
                AppError::with_message(ErrorCode::GroupNotFound, message)
            }
            OrderingError::ReservedName(_) => {
                AppError::with_message(ErrorCode::GroupNameReserved, message)
            }
            OrderingError::NameInUse(_) => {
                AppError::with_message(ErrorCode::GroupNameExists, message)
            }
            OrderingError::ConfirmationRequired => {
                AppError::new(ErrorCode::GroupDeleteNotConfirmed)
            }
            OrderingError::Write(source) => source.into(),
            OrderingError::PartialBatch {
                applied,
                total,
                source,
            } => {
                tracing::error!(applied, total, error = %source, "Batch write partially applied");
                AppError::new(ErrorCode::BatchPartiallyApplied)
                    .with_detail("applied", applied)
                    .with_detail("total", total)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_error_first_write_is_plain_failure() {
        let err = OrderingError::batch(0, 3, RepoError::Database("locked".into()));
        assert!(matches!(err, OrderingError::Write(_)));
    }

    #[test]
    fn test_batch_error_reports_progress() {
        let err = OrderingError::batch(2, 3, RepoError::Database("locked".into()));
        assert!(matches!(
            err,
            OrderingError::PartialBatch {
                applied: 2,
                total: 3,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "Batch stopped after 2 of 3 writes: Database error: locked"
        );
    }

    #[test]
    fn test_partial_batch_maps_to_single_failure_code() {
        let app: AppError =
            OrderingError::batch(1, 4, RepoError::Database("gone".into())).into();
        assert_eq!(app.code, ErrorCode::BatchPartiallyApplied);
        let details = app.details.unwrap();
        assert_eq!(details.get("applied").unwrap(), 1);
        assert_eq!(details.get("total").unwrap(), 4);
    }

    #[test]
    fn test_input_errors_map_to_catalog_codes() {
        let app: AppError = OrderingError::InvalidPermutation("duplicate id 3".into()).into();
        assert_eq!(app.code, ErrorCode::InvalidPermutation);

        let app: AppError = OrderingError::NameInUse("Gems".into()).into();
        assert_eq!(app.code, ErrorCode::GroupNameExists);

        let app: AppError = OrderingError::ConfirmationRequired.into();
        assert_eq!(app.code, ErrorCode::GroupDeleteNotConfirmed);
    }
}
