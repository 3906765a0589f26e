//! Ledger domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Entry direction: income into the book or expense out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryKind {
    /// Income entry. Increases the book balance.
    In,
    /// Expense entry. Decreases the book balance.
    Out,
}

impl EntryKind {
    /// Returns the persisted tag for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
        }
    }

    /// Returns the human label used in activity details and notifications.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::In => "Income",
            Self::Out => "Expense",
        }
    }
}

/// Input for creating a new entry.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    /// Entry amount. Must be strictly positive.
    pub amount: Decimal,
    /// Income or expense.
    pub kind: EntryKind,
    /// Date the transaction took place.
    pub entry_date: NaiveDate,
    /// Category name. Required.
    pub category: String,
    /// Payment mode name. Required.
    pub payment_mode: String,
    /// Optional free-text remark.
    pub remark: Option<String>,
    /// Optional receipt URL produced by the upload collaborator.
    pub receipt_url: Option<String>,
}

/// Partial update for an existing entry. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    /// New amount, if changing.
    pub amount: Option<Decimal>,
    /// New kind, if changing (IN/OUT flips are allowed).
    pub kind: Option<EntryKind>,
    /// New entry date, if changing.
    pub entry_date: Option<NaiveDate>,
    /// New category, if changing.
    pub category: Option<String>,
    /// New payment mode, if changing.
    pub payment_mode: Option<String>,
    /// New remark, if changing.
    pub remark: Option<String>,
    /// New receipt URL, if changing.
    pub receipt_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(EntryKind::In, "IN", "Income")]
    #[case(EntryKind::Out, "OUT", "Expense")]
    fn test_entry_kind_tags(
        #[case] kind: EntryKind,
        #[case] tag: &str,
        #[case] label: &str,
    ) {
        assert_eq!(kind.as_str(), tag);
        assert_eq!(kind.label(), label);
    }
}
