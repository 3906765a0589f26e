//! Access control domain types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Permission level scoped to a business or a book.
///
/// Ordering follows privilege: `Owner > Admin > Editor > Member`.
/// `Owner` is derived from the business owner pointer and never appears
/// in a member list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular member: may view and record entries.
    Member,
    /// Editor: member rights plus category/payment-mode management.
    Editor,
    /// Admin: full management of books, members, and settings.
    Admin,
    /// The business owner. Supersedes every other role.
    Owner,
}

impl Role {
    /// Returns the lowercase tag used in persisted member rows.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Editor => "editor",
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }
}

/// A membership row: one user's role within a business or book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Membership {
    /// The member's user id.
    pub user_id: Uuid,
    /// The member's assigned role.
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ordering() {
        assert!(Role::Owner > Role::Admin);
        assert!(Role::Admin > Role::Editor);
        assert!(Role::Editor > Role::Member);
    }

    #[test]
    fn test_role_tags() {
        assert_eq!(Role::Member.as_str(), "member");
        assert_eq!(Role::Editor.as_str(), "editor");
        assert_eq!(Role::Admin.as_str(), "admin");
        assert_eq!(Role::Owner.as_str(), "owner");
    }
}
