//! Notification recipient resolution.

use std::collections::BTreeSet;

use uuid::Uuid;

/// Resolves who gets notified about a ledger or membership event: the
/// business owner and every member, minus the acting user, deduplicated.
#[must_use]
pub fn recipients<I>(owner_id: Uuid, member_ids: I, actor_id: Uuid) -> Vec<Uuid>
where
    I: IntoIterator<Item = Uuid>,
{
    let mut set: BTreeSet<Uuid> = member_ids.into_iter().collect();
    set.insert(owner_id);
    set.remove(&actor_id);
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_is_excluded() {
        let [owner, member] = [Uuid::new_v4(), Uuid::new_v4()];
        let result = recipients(owner, vec![member], member);
        assert_eq!(result, vec![owner]);
    }

    #[test]
    fn test_owner_acting_notifies_members_only() {
        let [owner, a, b] = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let result = recipients(owner, vec![a, b], owner);
        assert_eq!(result.len(), 2);
        assert!(!result.contains(&owner));
    }

    #[test]
    fn test_duplicates_collapse() {
        let [owner, member, actor] = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let result = recipients(owner, vec![member, member, owner], actor);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_sole_owner_acting_alone_notifies_nobody() {
        let owner = Uuid::new_v4();
        assert!(recipients(owner, vec![], owner).is_empty());
    }
}
