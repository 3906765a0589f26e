//! Audit trail action tags.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What happened, as recorded in the append-only activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityAction {
    /// A business was created.
    CreatedBusiness,
    /// Business profile details were updated.
    UpdatedBusiness,
    /// A book was created.
    CreatedBook,
    /// A book was renamed.
    RenamedBook,
    /// A book was moved to trash.
    DeletedBook,
    /// An entry was recorded.
    CreatedEntry,
    /// An entry was updated.
    UpdatedEntry,
    /// An entry was moved to trash.
    DeletedEntry,
    /// A member was added.
    AddedMember,
    /// A member was removed.
    RemovedMember,
    /// A member's role was changed.
    UpdatedMemberRole,
    /// A member left voluntarily.
    LeftBusiness,
    /// Ownership was transferred.
    TransferredOwnership,
    /// A category was added.
    AddedCategory,
    /// A category was deleted.
    DeletedCategory,
    /// A payment mode was deleted.
    DeletedPaymentMode,
}

impl ActivityAction {
    /// Returns the stable tag stored in the activity log.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedBusiness => "CREATED_BUSINESS",
            Self::UpdatedBusiness => "UPDATED_BUSINESS",
            Self::CreatedBook => "CREATED_BOOK",
            Self::RenamedBook => "RENAMED_BOOK",
            Self::DeletedBook => "DELETED_BOOK",
            Self::CreatedEntry => "CREATED_ENTRY",
            Self::UpdatedEntry => "UPDATED_ENTRY",
            Self::DeletedEntry => "DELETED_ENTRY",
            Self::AddedMember => "ADDED_MEMBER",
            Self::RemovedMember => "REMOVED_MEMBER",
            Self::UpdatedMemberRole => "UPDATED_MEMBER_ROLE",
            Self::LeftBusiness => "LEFT_BUSINESS",
            Self::TransferredOwnership => "TRANSFERRED_OWNERSHIP",
            Self::AddedCategory => "ADDED_CATEGORY",
            Self::DeletedCategory => "DELETED_CATEGORY",
            Self::DeletedPaymentMode => "DELETED_PAYMENT_MODE",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_stable() {
        assert_eq!(ActivityAction::CreatedEntry.as_str(), "CREATED_ENTRY");
        assert_eq!(
            ActivityAction::TransferredOwnership.to_string(),
            "TRANSFERRED_OWNERSHIP"
        );
    }
}
