//! Database enum types shared by the entities.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role a member holds within a business or book. The owner never appears
/// in a member row, so there is no `owner` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "member_role")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Full management rights.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Member rights plus category/payment-mode management.
    #[sea_orm(string_value = "editor")]
    Editor,
    /// View and record entries.
    #[sea_orm(string_value = "member")]
    Member,
}

/// Entry direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_kind")]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryKind {
    /// Income.
    #[sea_orm(string_value = "IN")]
    In,
    /// Expense.
    #[sea_orm(string_value = "OUT")]
    Out,
}

/// Which entry directions a category applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "category_kind")]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryKind {
    /// Income only.
    #[sea_orm(string_value = "IN")]
    In,
    /// Expense only.
    #[sea_orm(string_value = "OUT")]
    Out,
    /// Both directions.
    #[sea_orm(string_value = "BOTH")]
    Both,
}

/// Which live collection a trash row was snapshotted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "trash_kind")]
#[serde(rename_all = "snake_case")]
pub enum TrashKind {
    /// A business snapshot.
    #[sea_orm(string_value = "business")]
    Business,
    /// A book snapshot.
    #[sea_orm(string_value = "book")]
    Book,
    /// An entry snapshot.
    #[sea_orm(string_value = "entry")]
    Entry,
    /// An activity-log snapshot.
    #[sea_orm(string_value = "activity_log")]
    ActivityLog,
}

impl From<MemberRole> for cashbook_core::access::Role {
    fn from(role: MemberRole) -> Self {
        match role {
            MemberRole::Admin => Self::Admin,
            MemberRole::Editor => Self::Editor,
            MemberRole::Member => Self::Member,
        }
    }
}

impl From<EntryKind> for cashbook_core::ledger::EntryKind {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::In => Self::In,
            EntryKind::Out => Self::Out,
        }
    }
}

impl From<cashbook_core::ledger::EntryKind> for EntryKind {
    fn from(kind: cashbook_core::ledger::EntryKind) -> Self {
        match kind {
            cashbook_core::ledger::EntryKind::In => Self::In,
            cashbook_core::ledger::EntryKind::Out => Self::Out,
        }
    }
}

impl From<TrashKind> for cashbook_core::trash::TrashKind {
    fn from(kind: TrashKind) -> Self {
        match kind {
            TrashKind::Business => Self::Business,
            TrashKind::Book => Self::Book,
            TrashKind::Entry => Self::Entry,
            TrashKind::ActivityLog => Self::ActivityLog,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cashbook_core::access::Role;

    #[test]
    fn test_member_role_maps_to_core_role() {
        assert_eq!(Role::from(MemberRole::Admin), Role::Admin);
        assert_eq!(Role::from(MemberRole::Editor), Role::Editor);
        assert_eq!(Role::from(MemberRole::Member), Role::Member);
    }

    #[test]
    fn test_entry_kind_round_trips_to_core() {
        for kind in [EntryKind::In, EntryKind::Out] {
            let core: cashbook_core::ledger::EntryKind = kind.into();
            assert_eq!(EntryKind::from(core), kind);
        }
    }
}
