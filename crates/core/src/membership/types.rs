//! Membership transition types.

use uuid::Uuid;

use crate::access::{Membership, Role};

/// The three steps of an ownership transfer, resolved up front so the
/// storage layer can run them in a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferPlan {
    /// The user receiving ownership.
    pub new_owner: Uuid,
    /// The outgoing owner, to be appended as an admin member.
    pub previous_owner: Uuid,
    /// Whether the new owner currently holds a member row that must be
    /// removed (owner and member are mutually exclusive).
    pub strip_new_owner_member_row: bool,
}

impl TransferPlan {
    /// Returns the member list as it will look after the transfer.
    #[must_use]
    pub fn resulting_members(&self, members: &[Membership]) -> Vec<Membership> {
        let mut result: Vec<Membership> = members
            .iter()
            .copied()
            .filter(|m| m.user_id != self.new_owner)
            .collect();
        result.push(Membership {
            user_id: self.previous_owner,
            role: Role::Admin,
        });
        result
    }
}
