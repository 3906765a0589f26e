//! Entry input validation.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{EntryDraft, EntryPatch};

/// Validates a new entry before persistence.
///
/// # Errors
///
/// Returns `LedgerError` if the amount is not strictly positive or a
/// required field is blank.
pub fn validate_draft(draft: &EntryDraft) -> Result<(), LedgerError> {
    if draft.amount <= Decimal::ZERO {
        return Err(LedgerError::NonPositiveAmount);
    }
    if draft.category.trim().is_empty() {
        return Err(LedgerError::MissingCategory);
    }
    if draft.payment_mode.trim().is_empty() {
        return Err(LedgerError::MissingPaymentMode);
    }
    Ok(())
}

/// Validates a patch before it is applied to an existing entry.
///
/// Only supplied fields are checked; absent fields keep their stored value
/// and need no validation.
///
/// # Errors
///
/// Returns `LedgerError` if a supplied field would violate entry rules.
pub fn validate_patch(patch: &EntryPatch) -> Result<(), LedgerError> {
    if let Some(amount) = patch.amount {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount);
        }
    }
    if let Some(category) = &patch.category {
        if category.trim().is_empty() {
            return Err(LedgerError::MissingCategory);
        }
    }
    if let Some(mode) = &patch.payment_mode {
        if mode.trim().is_empty() {
            return Err(LedgerError::MissingPaymentMode);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::EntryKind;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn draft(amount: Decimal) -> EntryDraft {
        EntryDraft {
            amount,
            kind: EntryKind::In,
            entry_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            category: "Rent".to_string(),
            payment_mode: "Cash".to_string(),
            remark: None,
            receipt_url: None,
        }
    }

    #[test]
    fn test_valid_draft() {
        assert!(validate_draft(&draft(dec!(500))).is_ok());
    }

    #[test]
    fn test_zero_amount_rejected() {
        assert_eq!(
            validate_draft(&draft(Decimal::ZERO)),
            Err(LedgerError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert_eq!(
            validate_draft(&draft(dec!(-10))),
            Err(LedgerError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_blank_category_rejected() {
        let mut d = draft(dec!(10));
        d.category = "  ".to_string();
        assert_eq!(validate_draft(&d), Err(LedgerError::MissingCategory));
    }

    #[test]
    fn test_blank_payment_mode_rejected() {
        let mut d = draft(dec!(10));
        d.payment_mode = String::new();
        assert_eq!(validate_draft(&d), Err(LedgerError::MissingPaymentMode));
    }

    #[test]
    fn test_patch_checks_only_supplied_fields() {
        assert!(validate_patch(&EntryPatch::default()).is_ok());
        assert_eq!(
            validate_patch(&EntryPatch {
                amount: Some(Decimal::ZERO),
                ..EntryPatch::default()
            }),
            Err(LedgerError::NonPositiveAmount)
        );
        assert_eq!(
            validate_patch(&EntryPatch {
                category: Some(String::new()),
                ..EntryPatch::default()
            }),
            Err(LedgerError::MissingCategory)
        );
    }
}
