//! Ledger error types.

use cashbook_shared::AppError;
use thiserror::Error;

/// Errors that can occur while validating ledger input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Entry amount must be strictly positive.
    #[error("Entry amount must be positive")]
    NonPositiveAmount,

    /// Category is required.
    #[error("Category is required")]
    MissingCategory,

    /// Payment mode is required.
    #[error("Payment mode is required")]
    MissingPaymentMode,
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maps_to_validation() {
        let app: AppError = LedgerError::NonPositiveAmount.into();
        assert_eq!(app.status_code(), 400);
        assert_eq!(app.error_code(), "VALIDATION_ERROR");
    }
}
