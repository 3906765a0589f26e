//! Trash error types.

use cashbook_shared::AppError;
use thiserror::Error;

use super::types::TrashKind;

/// Errors that can occur during trash operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrashError {
    /// Only the user who deleted a record may see, restore, or purge it.
    #[error("Not authorized to access this trash item")]
    NotDeleter,

    /// Entries and activity logs are only restored through their parents.
    #[error("Restoring a {} directly is not supported", .0.label())]
    DirectRestoreUnsupported(TrashKind),

    /// A book cannot come back while its business is still deleted.
    #[error("Cannot restore this book because its parent business was deleted. Restore the business first")]
    ParentBusinessMissing,
}

impl From<TrashError> for AppError {
    fn from(err: TrashError) -> Self {
        match err {
            TrashError::NotDeleter => Self::Forbidden(err.to_string()),
            TrashError::DirectRestoreUnsupported(_) => Self::Validation(err.to_string()),
            TrashError::ParentBusinessMissing => Self::PreconditionFailed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_deleter_is_forbidden() {
        let app: AppError = TrashError::NotDeleter.into();
        assert_eq!(app.status_code(), 403);
    }

    #[test]
    fn test_missing_parent_is_precondition_failed() {
        let app: AppError = TrashError::ParentBusinessMissing.into();
        assert_eq!(app.status_code(), 412);
        assert_eq!(app.error_code(), "PRECONDITION_FAILED");
    }

    #[test]
    fn test_direct_restore_is_validation() {
        let app: AppError = TrashError::DirectRestoreUnsupported(TrashKind::Entry).into();
        assert_eq!(app.status_code(), 400);
    }
}
