//! Role resolution algorithm.
//!
//! Resolution order for a business-scoped check:
//! 1. The owner pointer supersedes everything.
//! 2. Otherwise the business member list is scanned.
//!
//! For a book-scoped check, business `Owner`/`Admin` dominate regardless of
//! book membership; only then is the book member list consulted. A book
//! member row can therefore never weaken a business-level role.

use uuid::Uuid;

use super::types::{Membership, Role};

/// Resolves a user's effective role within a business.
///
/// Returns `None` when the user is neither the owner nor a member.
#[must_use]
pub fn business_role(owner_id: Uuid, members: &[Membership], user_id: Uuid) -> Option<Role> {
    if owner_id == user_id {
        return Some(Role::Owner);
    }
    members
        .iter()
        .find(|m| m.user_id == user_id)
        .map(|m| m.role)
}

/// Resolves a user's effective role for a book-scoped check.
///
/// Business `Owner` and `Admin` dominate: they hold their business role for
/// every book in the business. Everyone else is resolved against the book's
/// own member list, so a business editor without a book member row has no
/// role on that book.
#[must_use]
pub fn book_role(
    owner_id: Uuid,
    business_members: &[Membership],
    book_members: &[Membership],
    user_id: Uuid,
) -> Option<Role> {
    match business_role(owner_id, business_members, user_id) {
        Some(role @ (Role::Owner | Role::Admin)) => Some(role),
        _ => book_members
            .iter()
            .find(|m| m.user_id == user_id)
            .map(|m| m.role),
    }
}

/// Checks a resolved role against the roles an operation permits.
///
/// `Owner` is always authorized. An empty `allowed` slice means any resolved
/// role is sufficient. `None` (no role) is never authorized.
#[must_use]
pub fn authorize(role: Option<Role>, allowed: &[Role]) -> bool {
    match role {
        Some(Role::Owner) => true,
        Some(role) => allowed.is_empty() || allowed.contains(&role),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(n: usize) -> Vec<Uuid> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn test_owner_supersedes_member_row() {
        let [owner, other] = [Uuid::new_v4(), Uuid::new_v4()];
        let members = vec![Membership {
            user_id: other,
            role: Role::Member,
        }];
        assert_eq!(business_role(owner, &members, owner), Some(Role::Owner));
        assert_eq!(business_role(owner, &members, other), Some(Role::Member));
    }

    #[test]
    fn test_unknown_user_resolves_to_none() {
        let [owner, stranger] = [Uuid::new_v4(), Uuid::new_v4()];
        assert_eq!(business_role(owner, &[], stranger), None);
    }

    #[test]
    fn test_business_admin_dominates_book_membership() {
        let [owner, admin, member] = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let business_members = vec![
            Membership {
                user_id: admin,
                role: Role::Admin,
            },
            Membership {
                user_id: member,
                role: Role::Member,
            },
        ];
        // The admin has no book member row, the member is a book admin.
        let book_members = vec![Membership {
            user_id: member,
            role: Role::Admin,
        }];

        assert_eq!(
            book_role(owner, &business_members, &book_members, admin),
            Some(Role::Admin)
        );
        assert_eq!(
            book_role(owner, &business_members, &book_members, member),
            Some(Role::Admin)
        );
        assert_eq!(
            book_role(owner, &business_members, &book_members, owner),
            Some(Role::Owner)
        );
    }

    #[test]
    fn test_business_editor_without_book_row_has_no_book_role() {
        let [owner, editor] = [Uuid::new_v4(), Uuid::new_v4()];
        let business_members = vec![Membership {
            user_id: editor,
            role: Role::Editor,
        }];
        assert_eq!(book_role(owner, &business_members, &[], editor), None);
    }

    #[test]
    fn test_authorize_owner_always_passes() {
        assert!(authorize(Some(Role::Owner), &[Role::Admin]));
        assert!(authorize(Some(Role::Owner), &[]));
    }

    #[test]
    fn test_authorize_empty_allowed_means_any_role() {
        assert!(authorize(Some(Role::Member), &[]));
        assert!(!authorize(None, &[]));
    }

    #[test]
    fn test_authorize_role_list() {
        assert!(authorize(Some(Role::Editor), &[Role::Admin, Role::Editor]));
        assert!(!authorize(Some(Role::Member), &[Role::Admin, Role::Editor]));
        assert!(!authorize(None, &[Role::Admin]));
    }

    fn role_strategy() -> impl Strategy<Value = Role> {
        prop_oneof![
            Just(Role::Member),
            Just(Role::Editor),
            Just(Role::Admin),
        ]
    }

    proptest! {
        /// Owner and business-Admin authorization for a book-scoped action is
        /// never weaker than a book-Admin's for the same business.
        #[test]
        fn prop_business_admin_never_weaker_than_book_admin(
            book_admin_role in role_strategy(),
            allowed in proptest::collection::vec(role_strategy(), 0..3),
        ) {
            let users = ids(3);
            let (owner, admin, book_admin) = (users[0], users[1], users[2]);
            let business_members = vec![
                Membership { user_id: admin, role: Role::Admin },
                Membership { user_id: book_admin, role: book_admin_role },
            ];
            let book_members = vec![Membership { user_id: book_admin, role: Role::Admin }];

            let book_admin_passes = authorize(
                book_role(owner, &business_members, &book_members, book_admin),
                &allowed,
            );
            let admin_passes = authorize(
                book_role(owner, &business_members, &book_members, admin),
                &allowed,
            );
            let owner_passes = authorize(
                book_role(owner, &business_members, &book_members, owner),
                &allowed,
            );

            prop_assert!(owner_passes);
            // Both resolve to Admin for this book, so their outcomes match.
            prop_assert_eq!(admin_passes, book_admin_passes);
        }

        /// A book member row never changes the outcome for a business admin.
        #[test]
        fn prop_book_row_cannot_demote_business_admin(
            book_row_role in role_strategy(),
        ) {
            let users = ids(2);
            let (owner, admin) = (users[0], users[1]);
            let business_members = vec![Membership { user_id: admin, role: Role::Admin }];
            let book_members = vec![Membership { user_id: admin, role: book_row_role }];

            prop_assert_eq!(
                book_role(owner, &business_members, &book_members, admin),
                Some(Role::Admin)
            );
        }
    }
}
