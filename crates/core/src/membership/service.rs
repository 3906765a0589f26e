//! Membership transition rules.

use uuid::Uuid;

use crate::access::{self, Membership, Role};

use super::error::MembershipError;
use super::types::TransferPlan;

/// Validates adding `candidate` as a member.
///
/// # Errors
///
/// Returns an error if the candidate is the owner or already a member.
pub fn validate_add_member(
    owner_id: Uuid,
    members: &[Membership],
    candidate: Uuid,
) -> Result<(), MembershipError> {
    if candidate == owner_id {
        return Err(MembershipError::TargetIsOwner);
    }
    if members.iter().any(|m| m.user_id == candidate) {
        return Err(MembershipError::AlreadyMember);
    }
    Ok(())
}

/// Whether `actor` may remove `target`: admins and the owner may remove
/// anyone, and any member may remove themself (leave).
#[must_use]
pub fn can_remove_member(role: Option<Role>, actor: Uuid, target: Uuid) -> bool {
    access::authorize(role, &[Role::Admin]) || actor == target
}

/// Validates removing `target` from the member list.
///
/// # Errors
///
/// Returns an error if the target is the owner or holds no member row.
pub fn validate_remove_member(
    owner_id: Uuid,
    members: &[Membership],
    target: Uuid,
) -> Result<(), MembershipError> {
    if target == owner_id {
        return Err(MembershipError::OwnerCannotBeRemoved);
    }
    if !members.iter().any(|m| m.user_id == target) {
        return Err(MembershipError::MemberNotFound);
    }
    Ok(())
}

/// Validates a voluntary leave by `actor`.
///
/// The owner is rejected outright: they must transfer ownership or delete
/// the business instead.
///
/// # Errors
///
/// Returns an error if the actor is the owner or not a member.
pub fn validate_leave(
    owner_id: Uuid,
    members: &[Membership],
    actor: Uuid,
) -> Result<(), MembershipError> {
    if actor == owner_id {
        return Err(MembershipError::OwnerCannotLeave);
    }
    if !members.iter().any(|m| m.user_id == actor) {
        return Err(MembershipError::NotAMember);
    }
    Ok(())
}

/// Validates changing `target`'s role.
///
/// # Errors
///
/// Returns an error if the target is the owner (who has no member row) or
/// holds no member row.
pub fn validate_role_change(
    owner_id: Uuid,
    members: &[Membership],
    target: Uuid,
) -> Result<(), MembershipError> {
    if target == owner_id {
        return Err(MembershipError::CannotChangeOwnerRole);
    }
    if !members.iter().any(|m| m.user_id == target) {
        return Err(MembershipError::MemberNotFound);
    }
    Ok(())
}

/// Plans an ownership transfer from `owner_id` to `new_owner`.
///
/// The plan strips the new owner's member row if present (owner and member
/// are mutually exclusive) and appends the outgoing owner as an admin.
///
/// # Errors
///
/// Returns an error if the new owner is already the owner.
pub fn plan_ownership_transfer(
    owner_id: Uuid,
    members: &[Membership],
    new_owner: Uuid,
) -> Result<TransferPlan, MembershipError> {
    if new_owner == owner_id {
        return Err(MembershipError::AlreadyOwner);
    }
    Ok(TransferPlan {
        new_owner,
        previous_owner: owner_id,
        strip_new_owner_member_row: members.iter().any(|m| m.user_id == new_owner),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(user_id: Uuid, role: Role) -> Membership {
        Membership { user_id, role }
    }

    #[test]
    fn test_add_rejects_owner_and_duplicates() {
        let [owner, existing, fresh] = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let members = vec![member(existing, Role::Member)];

        assert_eq!(
            validate_add_member(owner, &members, owner),
            Err(MembershipError::TargetIsOwner)
        );
        assert_eq!(
            validate_add_member(owner, &members, existing),
            Err(MembershipError::AlreadyMember)
        );
        assert!(validate_add_member(owner, &members, fresh).is_ok());
    }

    #[test]
    fn test_remove_protects_owner() {
        let [owner, target] = [Uuid::new_v4(), Uuid::new_v4()];
        let members = vec![member(target, Role::Editor)];

        assert_eq!(
            validate_remove_member(owner, &members, owner),
            Err(MembershipError::OwnerCannotBeRemoved)
        );
        assert!(validate_remove_member(owner, &members, target).is_ok());
        assert_eq!(
            validate_remove_member(owner, &members, Uuid::new_v4()),
            Err(MembershipError::MemberNotFound)
        );
    }

    #[test]
    fn test_member_can_remove_self_without_admin_role() {
        let target = Uuid::new_v4();
        assert!(can_remove_member(Some(Role::Member), target, target));
        assert!(!can_remove_member(Some(Role::Member), Uuid::new_v4(), target));
        assert!(can_remove_member(Some(Role::Admin), Uuid::new_v4(), target));
        assert!(can_remove_member(Some(Role::Owner), Uuid::new_v4(), target));
    }

    #[test]
    fn test_leave_rejects_owner_and_non_members() {
        let [owner, joined, stranger] = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let members = vec![member(joined, Role::Member)];

        assert_eq!(
            validate_leave(owner, &members, owner),
            Err(MembershipError::OwnerCannotLeave)
        );
        assert_eq!(
            validate_leave(owner, &members, stranger),
            Err(MembershipError::NotAMember)
        );
        assert!(validate_leave(owner, &members, joined).is_ok());
    }

    #[test]
    fn test_role_change_never_touches_owner() {
        let [owner, target] = [Uuid::new_v4(), Uuid::new_v4()];
        let members = vec![member(target, Role::Member)];

        assert_eq!(
            validate_role_change(owner, &members, owner),
            Err(MembershipError::CannotChangeOwnerRole)
        );
        assert!(validate_role_change(owner, &members, target).is_ok());
    }

    #[test]
    fn test_transfer_to_existing_member() {
        let [owner, editor] = [Uuid::new_v4(), Uuid::new_v4()];
        let members = vec![member(editor, Role::Editor)];

        let plan = plan_ownership_transfer(owner, &members, editor).unwrap();
        assert!(plan.strip_new_owner_member_row);

        let resulting = plan.resulting_members(&members);
        // The new owner leaves the member list; the old owner joins as admin.
        assert!(!resulting.iter().any(|m| m.user_id == editor));
        assert!(resulting
            .iter()
            .any(|m| m.user_id == owner && m.role == Role::Admin));
    }

    #[test]
    fn test_transfer_to_outsider() {
        let [owner, outsider] = [Uuid::new_v4(), Uuid::new_v4()];
        let plan = plan_ownership_transfer(owner, &[], outsider).unwrap();
        assert!(!plan.strip_new_owner_member_row);
        assert_eq!(plan.new_owner, outsider);
        assert_eq!(plan.previous_owner, owner);
    }

    #[test]
    fn test_transfer_to_self_rejected() {
        let owner = Uuid::new_v4();
        assert_eq!(
            plan_ownership_transfer(owner, &[], owner),
            Err(MembershipError::AlreadyOwner)
        );
    }
}
