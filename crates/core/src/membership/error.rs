//! Membership error types.

use cashbook_shared::AppError;
use thiserror::Error;

/// Errors that can occur during membership transitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MembershipError {
    /// The target user is the owner and cannot also be a member.
    #[error("User is already the owner")]
    TargetIsOwner,

    /// The target user is already a member.
    #[error("User is already a member")]
    AlreadyMember,

    /// The owner can never be removed from their own business.
    #[error("Cannot remove the owner. The owner must transfer ownership or delete the business")]
    OwnerCannotBeRemoved,

    /// No member row exists for the target user.
    #[error("Member not found")]
    MemberNotFound,

    /// The owner cannot leave; they must transfer ownership or delete.
    #[error("Owner cannot leave the business")]
    OwnerCannotLeave,

    /// The acting user is not a member.
    #[error("You are not a member of this business")]
    NotAMember,

    /// The owner has no member row; their role cannot be changed.
    #[error("Cannot update the owner's role")]
    CannotChangeOwnerRole,

    /// Ownership transfer to the current owner is meaningless.
    #[error("User is already the owner of this business")]
    AlreadyOwner,
}

impl From<MembershipError> for AppError {
    fn from(err: MembershipError) -> Self {
        match err {
            MembershipError::TargetIsOwner | MembershipError::AlreadyMember => {
                Self::Conflict(err.to_string())
            }
            MembershipError::MemberNotFound => Self::NotFound(err.to_string()),
            MembershipError::OwnerCannotBeRemoved
            | MembershipError::OwnerCannotLeave
            | MembershipError::NotAMember
            | MembershipError::CannotChangeOwnerRole
            | MembershipError::AlreadyOwner => Self::Validation(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_membership_is_conflict() {
        let app: AppError = MembershipError::AlreadyMember.into();
        assert_eq!(app.status_code(), 409);
    }

    #[test]
    fn test_missing_member_is_not_found() {
        let app: AppError = MembershipError::MemberNotFound.into();
        assert_eq!(app.status_code(), 404);
    }

    #[test]
    fn test_owner_rules_are_validation() {
        let app: AppError = MembershipError::OwnerCannotBeRemoved.into();
        assert_eq!(app.status_code(), 400);
    }
}
