//! Cascade planning over trash rows.

use uuid::Uuid;

use super::error::TrashError;
use super::types::{CascadePlan, TrashKind, TrashRowView};

/// Checks the owner-of-deletion rule: only the user who deleted a record
/// may list, restore, or purge its trash row. Independent of business role.
///
/// # Errors
///
/// Returns `TrashError::NotDeleter` for anyone else.
pub fn authorize_deleter(deleted_by: Uuid, user_id: Uuid) -> Result<(), TrashError> {
    if deleted_by == user_id {
        Ok(())
    } else {
        Err(TrashError::NotDeleter)
    }
}

/// Checks that a trash row's kind can be restored directly by a caller.
/// Entries and activity logs only come back as children of a business or
/// book restore.
///
/// # Errors
///
/// Returns `TrashError::DirectRestoreUnsupported` for child-only kinds.
pub fn ensure_restorable(kind: TrashKind) -> Result<(), TrashError> {
    match kind {
        TrashKind::Business | TrashKind::Book => Ok(()),
        TrashKind::Entry | TrashKind::ActivityLog => {
            Err(TrashError::DirectRestoreUnsupported(kind))
        }
    }
}

/// Computes which of `rows` belong to the cascade rooted at `root`.
///
/// - Business root: child books referencing the business, entries
///   referencing any of those books, and activity logs of the business.
/// - Book root: entries referencing the book.
/// - Entry/ActivityLog root: nothing (a purge removes just the row itself).
///
/// `rows` must already be scoped to the deleting user; the planner links
/// purely by the typed parent columns.
#[must_use]
pub fn cascade_plan(root: &TrashRowView, rows: &[TrashRowView]) -> CascadePlan {
    match root.kind {
        TrashKind::Business => {
            let book_rows: Vec<&TrashRowView> = rows
                .iter()
                .filter(|r| {
                    r.kind == TrashKind::Book && r.parent_business_id == Some(root.original_id)
                })
                .collect();
            let book_ids: Vec<Uuid> = book_rows.iter().map(|r| r.original_id).collect();

            let entry_rows = rows
                .iter()
                .filter(|r| {
                    r.kind == TrashKind::Entry
                        && r.parent_book_id.is_some_and(|b| book_ids.contains(&b))
                })
                .map(|r| r.id)
                .collect();
            let log_rows = rows
                .iter()
                .filter(|r| {
                    r.kind == TrashKind::ActivityLog
                        && r.parent_business_id == Some(root.original_id)
                })
                .map(|r| r.id)
                .collect();

            CascadePlan {
                book_rows: book_rows.iter().map(|r| r.id).collect(),
                entry_rows,
                log_rows,
            }
        }
        TrashKind::Book => CascadePlan {
            book_rows: Vec::new(),
            entry_rows: rows
                .iter()
                .filter(|r| {
                    r.kind == TrashKind::Entry && r.parent_book_id == Some(root.original_id)
                })
                .map(|r| r.id)
                .collect(),
            log_rows: Vec::new(),
        },
        TrashKind::Entry | TrashKind::ActivityLog => CascadePlan::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(
        kind: TrashKind,
        original_id: Uuid,
        parent_business_id: Option<Uuid>,
        parent_book_id: Option<Uuid>,
        deleted_by: Uuid,
    ) -> TrashRowView {
        TrashRowView {
            id: Uuid::new_v4(),
            kind,
            original_id,
            parent_business_id,
            parent_book_id,
            deleted_by,
        }
    }

    /// A deleted business with two books, three entries across them, two
    /// activity logs, plus an unrelated book from another business.
    fn fixture(user: Uuid) -> (TrashRowView, Vec<TrashRowView>) {
        let business_id = Uuid::new_v4();
        let other_business_id = Uuid::new_v4();
        let [book_a, book_b, other_book] = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];

        let root = row(TrashKind::Business, business_id, None, None, user);
        let rows = vec![
            root,
            row(TrashKind::Book, book_a, Some(business_id), None, user),
            row(TrashKind::Book, book_b, Some(business_id), None, user),
            row(TrashKind::Entry, Uuid::new_v4(), Some(business_id), Some(book_a), user),
            row(TrashKind::Entry, Uuid::new_v4(), Some(business_id), Some(book_a), user),
            row(TrashKind::Entry, Uuid::new_v4(), Some(business_id), Some(book_b), user),
            row(
                TrashKind::ActivityLog,
                Uuid::new_v4(),
                Some(business_id),
                None,
                user,
            ),
            row(
                TrashKind::ActivityLog,
                Uuid::new_v4(),
                Some(business_id),
                None,
                user,
            ),
            // Unrelated: belongs to a different business.
            row(TrashKind::Book, other_book, Some(other_business_id), None, user),
            row(
                TrashKind::Entry,
                Uuid::new_v4(),
                Some(other_business_id),
                Some(other_book),
                user,
            ),
        ];
        (root, rows)
    }

    #[test]
    fn test_business_cascade_is_complete() {
        let user = Uuid::new_v4();
        let (root, rows) = fixture(user);

        let plan = cascade_plan(&root, &rows);
        assert_eq!(plan.book_rows.len(), 2);
        assert_eq!(plan.entry_rows.len(), 3);
        assert_eq!(plan.log_rows.len(), 2);

        // Purging root + plan leaves zero rows referencing the business's
        // former books, entries, or logs.
        let mut removed: Vec<Uuid> = plan.child_row_ids();
        removed.push(root.id);
        let survivors: Vec<&TrashRowView> =
            rows.iter().filter(|r| !removed.contains(&r.id)).collect();
        assert_eq!(survivors.len(), 2);
        assert!(survivors
            .iter()
            .all(|r| r.parent_business_id != Some(root.original_id)));
    }

    #[test]
    fn test_book_cascade_covers_only_its_entries() {
        let user = Uuid::new_v4();
        let (_, rows) = fixture(user);
        let book_root = rows[1];

        let plan = cascade_plan(&book_root, &rows);
        assert!(plan.book_rows.is_empty());
        assert!(plan.log_rows.is_empty());
        assert_eq!(plan.entry_rows.len(), 2);
    }

    #[test]
    fn test_leaf_kinds_have_empty_cascade() {
        let user = Uuid::new_v4();
        let (_, rows) = fixture(user);
        let entry_root = rows[3];

        assert_eq!(cascade_plan(&entry_root, &rows), CascadePlan::default());
    }

    #[test]
    fn test_only_deleter_may_touch_trash() {
        let user = Uuid::new_v4();
        assert!(authorize_deleter(user, user).is_ok());
        assert_eq!(
            authorize_deleter(user, Uuid::new_v4()),
            Err(TrashError::NotDeleter)
        );
    }

    #[test]
    fn test_child_kinds_cannot_be_restored_directly() {
        assert!(ensure_restorable(TrashKind::Business).is_ok());
        assert!(ensure_restorable(TrashKind::Book).is_ok());
        assert_eq!(
            ensure_restorable(TrashKind::Entry),
            Err(TrashError::DirectRestoreUnsupported(TrashKind::Entry))
        );
        assert_eq!(
            ensure_restorable(TrashKind::ActivityLog),
            Err(TrashError::DirectRestoreUnsupported(TrashKind::ActivityLog))
        );
    }
}
