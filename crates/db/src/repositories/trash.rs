//! Trash repository: soft delete, cascade restore, and permanent purge.
//!
//! Deleting snapshots the record (and its children) into the trash table
//! and hard-deletes the live rows, children before parents, in one
//! transaction. Restore walks the typed parent columns back up: books
//! before entries, with the root trash row cleared last. Purge mirrors the
//! delete cascade entirely within trash. Every trash operation is gated by
//! the owner-of-deletion rule, not by business role.

use std::collections::HashMap;

use cashbook_core::access::Role;
use cashbook_core::activity::ActivityAction;
use cashbook_core::trash as trash_plan;
use cashbook_core::trash::TrashRowView;
use cashbook_shared::{AppError, AppResult};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{
    activity_logs, book_members, books, business_categories, business_members, businesses,
    entries, payment_modes, sea_orm_active_enums::TrashKind, trash,
};
use crate::error::DbResultExt;

use super::context::BusinessContext;
use super::fanout::{self, ActivityRecord};

/// Full snapshot of a business, including its embedded child collections,
/// as stored in a trash row's data payload.
#[derive(Debug, Serialize, Deserialize)]
struct BusinessSnapshot {
    business: businesses::Model,
    members: Vec<business_members::Model>,
    categories: Vec<business_categories::Model>,
    payment_modes: Vec<payment_modes::Model>,
}

/// Full snapshot of a book and its member rows.
#[derive(Debug, Serialize, Deserialize)]
struct BookSnapshot {
    book: books::Model,
    members: Vec<book_members::Model>,
}

/// Trash repository for the soft-delete lifecycle.
#[derive(Debug, Clone)]
pub struct TrashRepository {
    db: DatabaseConnection,
}

impl TrashRepository {
    /// Creates a new trash repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Moves a business and all its books, entries, and activity logs into
    /// trash, then hard-deletes the live rows. Owner only.
    pub async fn delete_business(&self, business_id: Uuid, actor: Uuid) -> AppResult<()> {
        let ctx = BusinessContext::load(&self.db, business_id).await?;
        if ctx.business.owner_id != actor {
            return Err(AppError::Forbidden(
                "Only the top-level owner can delete the business".to_string(),
            ));
        }

        let now = Utc::now().into();
        let txn = self.db.begin().await.map_db()?;

        let book_rows = books::Entity::find()
            .filter(books::Column::BusinessId.eq(business_id))
            .all(&txn)
            .await
            .map_db()?;
        let book_ids: Vec<Uuid> = book_rows.iter().map(|b| b.id).collect();

        let (entry_rows, member_rows) = if book_ids.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            let entry_rows = entries::Entity::find()
                .filter(entries::Column::BookId.is_in(book_ids.clone()))
                .all(&txn)
                .await
                .map_db()?;
            let member_rows = book_members::Entity::find()
                .filter(book_members::Column::BookId.is_in(book_ids.clone()))
                .all(&txn)
                .await
                .map_db()?;
            (entry_rows, member_rows)
        };

        let log_rows = activity_logs::Entity::find()
            .filter(activity_logs::Column::BusinessId.eq(business_id))
            .all(&txn)
            .await
            .map_db()?;
        let categories = business_categories::Entity::find()
            .filter(business_categories::Column::BusinessId.eq(business_id))
            .all(&txn)
            .await
            .map_db()?;
        let modes = payment_modes::Entity::find()
            .filter(payment_modes::Column::BusinessId.eq(business_id))
            .all(&txn)
            .await
            .map_db()?;

        // Snapshot everything into trash in one batch.
        let mut snapshots: Vec<trash::ActiveModel> = Vec::new();
        for entry in &entry_rows {
            snapshots.push(snapshot_row(
                TrashKind::Entry,
                entry.id,
                serialize(entry)?,
                Some(business_id),
                Some(entry.book_id),
                actor,
                now,
            ));
        }
        for book in &book_rows {
            let snap = BookSnapshot {
                book: book.clone(),
                members: member_rows
                    .iter()
                    .filter(|m| m.book_id == book.id)
                    .cloned()
                    .collect(),
            };
            snapshots.push(snapshot_row(
                TrashKind::Book,
                book.id,
                serialize(&snap)?,
                Some(business_id),
                None,
                actor,
                now,
            ));
        }
        for log in &log_rows {
            snapshots.push(snapshot_row(
                TrashKind::ActivityLog,
                log.id,
                serialize(log)?,
                Some(business_id),
                None,
                actor,
                now,
            ));
        }
        let business_snapshot = BusinessSnapshot {
            business: ctx.business.clone(),
            members: ctx.members.clone(),
            categories,
            payment_modes: modes,
        };
        snapshots.push(snapshot_row(
            TrashKind::Business,
            business_id,
            serialize(&business_snapshot)?,
            None,
            None,
            actor,
            now,
        ));

        trash::Entity::insert_many(snapshots)
            .exec(&txn)
            .await
            .map_db()?;

        // Hard-delete live rows, children before parents.
        if !book_ids.is_empty() {
            entries::Entity::delete_many()
                .filter(entries::Column::BookId.is_in(book_ids.clone()))
                .exec(&txn)
                .await
                .map_db()?;
            book_members::Entity::delete_many()
                .filter(book_members::Column::BookId.is_in(book_ids))
                .exec(&txn)
                .await
                .map_db()?;
        }
        books::Entity::delete_many()
            .filter(books::Column::BusinessId.eq(business_id))
            .exec(&txn)
            .await
            .map_db()?;
        activity_logs::Entity::delete_many()
            .filter(activity_logs::Column::BusinessId.eq(business_id))
            .exec(&txn)
            .await
            .map_db()?;
        business_categories::Entity::delete_many()
            .filter(business_categories::Column::BusinessId.eq(business_id))
            .exec(&txn)
            .await
            .map_db()?;
        payment_modes::Entity::delete_many()
            .filter(payment_modes::Column::BusinessId.eq(business_id))
            .exec(&txn)
            .await
            .map_db()?;
        business_members::Entity::delete_many()
            .filter(business_members::Column::BusinessId.eq(business_id))
            .exec(&txn)
            .await
            .map_db()?;
        businesses::Entity::delete_by_id(business_id)
            .exec(&txn)
            .await
            .map_db()?;

        txn.commit().await.map_db()
    }

    /// Moves a book and its entries into trash, then hard-deletes the live
    /// rows. Requires business admin or owner.
    pub async fn delete_book(&self, book_id: Uuid, actor: Uuid) -> AppResult<()> {
        let book = books::Entity::find_by_id(book_id)
            .one(&self.db)
            .await
            .map_db()?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
        let ctx = BusinessContext::load(&self.db, book.business_id).await?;
        if !ctx.authorize(actor, &[Role::Admin]) {
            return Err(AppError::Forbidden(
                "Not authorized to delete this book".to_string(),
            ));
        }

        let now = Utc::now().into();
        let txn = self.db.begin().await.map_db()?;

        let entry_rows = entries::Entity::find()
            .filter(entries::Column::BookId.eq(book_id))
            .all(&txn)
            .await
            .map_db()?;
        let member_rows = book_members::Entity::find()
            .filter(book_members::Column::BookId.eq(book_id))
            .all(&txn)
            .await
            .map_db()?;

        let mut snapshots: Vec<trash::ActiveModel> = Vec::new();
        for entry in &entry_rows {
            snapshots.push(snapshot_row(
                TrashKind::Entry,
                entry.id,
                serialize(entry)?,
                Some(book.business_id),
                Some(book_id),
                actor,
                now,
            ));
        }
        let snap = BookSnapshot {
            book: book.clone(),
            members: member_rows,
        };
        snapshots.push(snapshot_row(
            TrashKind::Book,
            book_id,
            serialize(&snap)?,
            Some(book.business_id),
            None,
            actor,
            now,
        ));

        trash::Entity::insert_many(snapshots)
            .exec(&txn)
            .await
            .map_db()?;

        entries::Entity::delete_many()
            .filter(entries::Column::BookId.eq(book_id))
            .exec(&txn)
            .await
            .map_db()?;
        book_members::Entity::delete_many()
            .filter(book_members::Column::BookId.eq(book_id))
            .exec(&txn)
            .await
            .map_db()?;
        books::Entity::delete_by_id(book_id)
            .exec(&txn)
            .await
            .map_db()?;

        txn.commit().await.map_db()?;

        fanout::log_activity(
            &self.db,
            ActivityRecord {
                business_id: book.business_id,
                book_id: None,
                entry_id: None,
                user_id: actor,
                action: ActivityAction::DeletedBook,
                details: format!("Deleted book: {}", book.name),
            },
        )
        .await;

        Ok(())
    }

    /// Lists the user's restorable trash rows (businesses and books),
    /// newest first. Child entries and activity logs are implicit.
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<trash::Model>> {
        trash::Entity::find()
            .filter(trash::Column::DeletedBy.eq(user_id))
            .filter(trash::Column::Kind.is_in([TrashKind::Business, TrashKind::Book]))
            .order_by_desc(trash::Column::DeletedAt)
            .all(&self.db)
            .await
            .map_db()
    }

    /// Restores a trash row and its cascade. Businesses come back with
    /// their books, entries, and activity logs; books with their entries,
    /// and only while the parent business is live. Deleter only.
    pub async fn restore(&self, trash_id: Uuid, actor: Uuid) -> AppResult<trash_plan::TrashKind> {
        let root = trash::Entity::find_by_id(trash_id)
            .one(&self.db)
            .await
            .map_db()?
            .ok_or_else(|| AppError::NotFound("Item not found in trash".to_string()))?;

        trash_plan::authorize_deleter(root.deleted_by, actor)?;
        let root_kind: trash_plan::TrashKind = root.kind.into();
        trash_plan::ensure_restorable(root_kind)?;

        let rows = trash::Entity::find()
            .filter(trash::Column::DeletedBy.eq(actor))
            .all(&self.db)
            .await
            .map_db()?;
        let views: Vec<TrashRowView> = rows.iter().map(view).collect();
        let plan = trash_plan::cascade_plan(&view(&root), &views);
        let by_id: HashMap<Uuid, &trash::Model> = rows.iter().map(|r| (r.id, r)).collect();

        match root.kind {
            TrashKind::Business => {
                let snap: BusinessSnapshot = deserialize(&root.data)?;

                let txn = self.db.begin().await.map_db()?;
                business_active(snap.business).insert(&txn).await.map_db()?;
                for member in snap.members {
                    business_member_active(member).insert(&txn).await.map_db()?;
                }
                for category in snap.categories {
                    category_active(category).insert(&txn).await.map_db()?;
                }
                for mode in snap.payment_modes {
                    payment_mode_active(mode).insert(&txn).await.map_db()?;
                }
                self.restore_books(&txn, &plan.book_rows, &by_id).await?;
                self.restore_entries(&txn, &plan.entry_rows, &by_id).await?;
                for row_id in &plan.log_rows {
                    let Some(row) = by_id.get(row_id) else { continue };
                    let log: activity_logs::Model = deserialize(&row.data)?;
                    activity_log_active(log).insert(&txn).await.map_db()?;
                    trash::Entity::delete_by_id(row.id)
                        .exec(&txn)
                        .await
                        .map_db()?;
                }
                trash::Entity::delete_by_id(root.id)
                    .exec(&txn)
                    .await
                    .map_db()?;
                txn.commit().await.map_db()?;
            }
            TrashKind::Book => {
                let snap: BookSnapshot = deserialize(&root.data)?;

                // The parent business must be live, or restoring the book
                // would orphan it.
                let parent = businesses::Entity::find_by_id(snap.book.business_id)
                    .one(&self.db)
                    .await
                    .map_db()?;
                if parent.is_none() {
                    return Err(trash_plan::TrashError::ParentBusinessMissing.into());
                }

                let txn = self.db.begin().await.map_db()?;
                book_active(snap.book).insert(&txn).await.map_db()?;
                for member in snap.members {
                    book_member_active(member).insert(&txn).await.map_db()?;
                }
                self.restore_entries(&txn, &plan.entry_rows, &by_id).await?;
                trash::Entity::delete_by_id(root.id)
                    .exec(&txn)
                    .await
                    .map_db()?;
                txn.commit().await.map_db()?;
            }
            TrashKind::Entry | TrashKind::ActivityLog => {
                return Err(trash_plan::TrashError::DirectRestoreUnsupported(root_kind).into());
            }
        }

        Ok(root_kind)
    }

    /// Permanently deletes a trash row and its cascade, entirely within
    /// trash. Purging an id that is already gone is `NotFound`. Deleter
    /// only.
    pub async fn purge(&self, trash_id: Uuid, actor: Uuid) -> AppResult<trash_plan::TrashKind> {
        let root = trash::Entity::find_by_id(trash_id)
            .one(&self.db)
            .await
            .map_db()?
            .ok_or_else(|| AppError::NotFound("Item not found in trash".to_string()))?;

        trash_plan::authorize_deleter(root.deleted_by, actor)?;

        let rows = trash::Entity::find()
            .filter(trash::Column::DeletedBy.eq(actor))
            .all(&self.db)
            .await
            .map_db()?;
        let views: Vec<TrashRowView> = rows.iter().map(view).collect();
        let plan = trash_plan::cascade_plan(&view(&root), &views);

        let txn = self.db.begin().await.map_db()?;
        let child_ids = plan.child_row_ids();
        if !child_ids.is_empty() {
            trash::Entity::delete_many()
                .filter(trash::Column::Id.is_in(child_ids))
                .exec(&txn)
                .await
                .map_db()?;
        }
        trash::Entity::delete_by_id(root.id)
            .exec(&txn)
            .await
            .map_db()?;
        txn.commit().await.map_db()?;

        Ok(root.kind.into())
    }

    async fn restore_books(
        &self,
        txn: &DatabaseTransaction,
        row_ids: &[Uuid],
        by_id: &HashMap<Uuid, &trash::Model>,
    ) -> AppResult<()> {
        for row_id in row_ids {
            let Some(row) = by_id.get(row_id) else { continue };
            let snap: BookSnapshot = deserialize(&row.data)?;
            book_active(snap.book).insert(txn).await.map_db()?;
            for member in snap.members {
                book_member_active(member).insert(txn).await.map_db()?;
            }
            trash::Entity::delete_by_id(row.id)
                .exec(txn)
                .await
                .map_db()?;
        }
        Ok(())
    }

    async fn restore_entries(
        &self,
        txn: &DatabaseTransaction,
        row_ids: &[Uuid],
        by_id: &HashMap<Uuid, &trash::Model>,
    ) -> AppResult<()> {
        for row_id in row_ids {
            let Some(row) = by_id.get(row_id) else { continue };
            let entry: entries::Model = deserialize(&row.data)?;
            entry_active(entry).insert(txn).await.map_db()?;
            trash::Entity::delete_by_id(row.id)
                .exec(txn)
                .await
                .map_db()?;
        }
        Ok(())
    }
}

/// Builds one trash snapshot row.
fn snapshot_row(
    kind: TrashKind,
    original_id: Uuid,
    data: serde_json::Value,
    parent_business_id: Option<Uuid>,
    parent_book_id: Option<Uuid>,
    deleted_by: Uuid,
    deleted_at: chrono::DateTime<chrono::FixedOffset>,
) -> trash::ActiveModel {
    trash::ActiveModel {
        id: Set(Uuid::new_v4()),
        kind: Set(kind),
        original_id: Set(original_id),
        data: Set(data),
        parent_business_id: Set(parent_business_id),
        parent_book_id: Set(parent_book_id),
        deleted_by: Set(deleted_by),
        deleted_at: Set(deleted_at),
    }
}

fn view(row: &trash::Model) -> TrashRowView {
    TrashRowView {
        id: row.id,
        kind: row.kind.into(),
        original_id: row.original_id,
        parent_business_id: row.parent_business_id,
        parent_book_id: row.parent_book_id,
        deleted_by: row.deleted_by,
    }
}

fn serialize<T: Serialize>(value: &T) -> AppResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|err| AppError::Internal(err.to_string()))
}

fn deserialize<T: for<'de> Deserialize<'de>>(value: &serde_json::Value) -> AppResult<T> {
    serde_json::from_value(value.clone()).map_err(|err| AppError::Internal(err.to_string()))
}

// Snapshotted models are re-inserted under their original primary keys, so
// every column is set explicitly.

fn business_active(model: businesses::Model) -> businesses::ActiveModel {
    businesses::ActiveModel {
        id: Set(model.id),
        name: Set(model.name),
        owner_id: Set(model.owner_id),
        address: Set(model.address),
        business_category: Set(model.business_category),
        phone: Set(model.phone),
        description: Set(model.description),
        image_url: Set(model.image_url),
        created_at: Set(model.created_at),
        updated_at: Set(model.updated_at),
    }
}

fn business_member_active(model: business_members::Model) -> business_members::ActiveModel {
    business_members::ActiveModel {
        business_id: Set(model.business_id),
        user_id: Set(model.user_id),
        role: Set(model.role),
        created_at: Set(model.created_at),
        updated_at: Set(model.updated_at),
    }
}

fn category_active(model: business_categories::Model) -> business_categories::ActiveModel {
    business_categories::ActiveModel {
        id: Set(model.id),
        business_id: Set(model.business_id),
        name: Set(model.name),
        kind: Set(model.kind),
        created_at: Set(model.created_at),
    }
}

fn payment_mode_active(model: payment_modes::Model) -> payment_modes::ActiveModel {
    payment_modes::ActiveModel {
        id: Set(model.id),
        business_id: Set(model.business_id),
        name: Set(model.name),
        created_at: Set(model.created_at),
    }
}

fn book_active(model: books::Model) -> books::ActiveModel {
    books::ActiveModel {
        id: Set(model.id),
        business_id: Set(model.business_id),
        name: Set(model.name),
        created_by: Set(model.created_by),
        balance: Set(model.balance),
        created_at: Set(model.created_at),
        updated_at: Set(model.updated_at),
    }
}

fn book_member_active(model: book_members::Model) -> book_members::ActiveModel {
    book_members::ActiveModel {
        book_id: Set(model.book_id),
        user_id: Set(model.user_id),
        role: Set(model.role),
        created_at: Set(model.created_at),
        updated_at: Set(model.updated_at),
    }
}

fn entry_active(model: entries::Model) -> entries::ActiveModel {
    entries::ActiveModel {
        id: Set(model.id),
        book_id: Set(model.book_id),
        transaction_id: Set(model.transaction_id),
        amount: Set(model.amount),
        entry_type: Set(model.entry_type),
        entry_date: Set(model.entry_date),
        remark: Set(model.remark),
        category: Set(model.category),
        payment_mode: Set(model.payment_mode),
        receipt_url: Set(model.receipt_url),
        created_by: Set(model.created_by),
        updated_by: Set(model.updated_by),
        created_at: Set(model.created_at),
        updated_at: Set(model.updated_at),
    }
}

fn activity_log_active(model: activity_logs::Model) -> activity_logs::ActiveModel {
    activity_logs::ActiveModel {
        id: Set(model.id),
        business_id: Set(model.business_id),
        book_id: Set(model.book_id),
        entry_id: Set(model.entry_id),
        user_id: Set(model.user_id),
        action: Set(model.action),
        details: Set(model.details),
        created_at: Set(model.created_at),
    }
}
