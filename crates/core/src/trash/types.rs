//! Trash domain types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which live collection a trash row was snapshotted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrashKind {
    /// A business snapshot (cascade root).
    Business,
    /// A book snapshot.
    Book,
    /// An entry snapshot.
    Entry,
    /// An activity-log snapshot.
    ActivityLog,
}

impl TrashKind {
    /// Returns the persisted tag for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Business => "business",
            Self::Book => "book",
            Self::Entry => "entry",
            Self::ActivityLog => "activity_log",
        }
    }

    /// Human label used in user-facing messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Business => "Business",
            Self::Book => "Book",
            Self::Entry => "Entry",
            Self::ActivityLog => "Activity log",
        }
    }
}

/// The cascade-relevant fields of a trash row. The snapshot payload itself
/// stays in the storage layer; planning only needs identity and the typed
/// parent references.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrashRowView {
    /// Trash row id.
    pub id: Uuid,
    /// Snapshot kind.
    pub kind: TrashKind,
    /// Id the record had while live.
    pub original_id: Uuid,
    /// Business the record belonged to, when applicable.
    pub parent_business_id: Option<Uuid>,
    /// Book the record belonged to, when applicable.
    pub parent_book_id: Option<Uuid>,
    /// The user who performed the deletion.
    pub deleted_by: Uuid,
}

/// The trash rows a cascade covers, grouped by kind. Row ids reference the
/// rows handed to the planner. Restore recreates books before entries;
/// purge order is irrelevant since everything is removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadePlan {
    /// Child book trash rows.
    pub book_rows: Vec<Uuid>,
    /// Child entry trash rows.
    pub entry_rows: Vec<Uuid>,
    /// Child activity-log trash rows.
    pub log_rows: Vec<Uuid>,
}

impl CascadePlan {
    /// All covered row ids, children only (the root row is handled last by
    /// the executor).
    #[must_use]
    pub fn child_row_ids(&self) -> Vec<Uuid> {
        self.book_rows
            .iter()
            .chain(&self.entry_rows)
            .chain(&self.log_rows)
            .copied()
            .collect()
    }
}
