//! Entry repository: ledger mutations that maintain the balance invariant.
//!
//! Each mutation runs as one database transaction so the entry write and
//! the book balance adjustment cannot be torn apart by a partial failure.

use cashbook_core::access::Role;
use cashbook_core::activity::ActivityAction;
use cashbook_core::ledger::{self, balance, report::MonthlySummary, EntryDraft, EntryPatch};
use cashbook_shared::types::{PageRequest, PageResponse};
use cashbook_shared::{AppError, AppResult};
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    books, entries,
    sea_orm_active_enums::{EntryKind, TrashKind},
    trash,
};
use crate::error::DbResultExt;

use super::context::BusinessContext;
use super::fanout::{self, ActivityRecord};

/// Filter options for listing a book's entries.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Case-insensitive substring match over remark and category.
    pub search: Option<String>,
    /// Restrict to one entry direction.
    pub entry_type: Option<EntryKind>,
}

/// Entry repository for ledger operations.
#[derive(Debug, Clone)]
pub struct EntryRepository {
    db: DatabaseConnection,
}

impl EntryRepository {
    /// Creates a new entry repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a new entry and applies its effect to the book balance.
    /// Requires any business role.
    pub async fn create(
        &self,
        book_id: Uuid,
        actor: Uuid,
        draft: EntryDraft,
    ) -> AppResult<entries::Model> {
        let book = self.find_book(book_id).await?;
        let ctx = BusinessContext::load(&self.db, book.business_id).await?;
        if !ctx.authorize(actor, &[Role::Admin, Role::Editor, Role::Member]) {
            return Err(AppError::Forbidden(
                "Not authorized to add entries".to_string(),
            ));
        }

        ledger::validate_draft(&draft)?;

        let now = Utc::now().into();
        let book_name = book.name.clone();
        let new_balance = balance::apply(book.balance, draft.kind, draft.amount);

        let txn = self.db.begin().await.map_db()?;

        let entry = entries::ActiveModel {
            id: Set(Uuid::new_v4()),
            book_id: Set(book.id),
            transaction_id: Set(ledger::transaction_id()),
            amount: Set(draft.amount),
            entry_type: Set(draft.kind.into()),
            entry_date: Set(draft.entry_date),
            remark: Set(draft.remark.clone()),
            category: Set(draft.category.clone()),
            payment_mode: Set(draft.payment_mode.clone()),
            receipt_url: Set(draft.receipt_url.clone()),
            created_by: Set(actor),
            updated_by: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let entry = entry.insert(&txn).await.map_db()?;

        let mut book_active: books::ActiveModel = book.into();
        book_active.balance = Set(new_balance);
        book_active.updated_at = Set(now);
        book_active.update(&txn).await.map_db()?;

        txn.commit().await.map_db()?;

        let label = draft.kind.label();
        let remark = draft.remark.as_deref().unwrap_or("No remark");
        fanout::log_activity(
            &self.db,
            ActivityRecord {
                business_id: ctx.business.id,
                book_id: Some(book_id),
                entry_id: Some(entry.id),
                user_id: actor,
                action: ActivityAction::CreatedEntry,
                details: format!(
                    "Added {label} of {} in {book_name} ({remark})",
                    draft.amount
                ),
            },
        )
        .await;
        fanout::notify_members(
            &self.db,
            ctx.business.owner_id,
            ctx.member_ids(),
            actor,
            ctx.business.id,
            Some(book_id),
            format!("Added a new {label} of {} in {book_name}", draft.amount),
        )
        .await;

        Ok(entry)
    }

    /// Updates an entry, reverting its old balance effect and applying the
    /// new one as two discrete steps. Only the creator or a business admin
    /// (or the owner) may update.
    pub async fn update(
        &self,
        entry_id: Uuid,
        actor: Uuid,
        patch: EntryPatch,
    ) -> AppResult<entries::Model> {
        let entry = self.find_entry(entry_id).await?;
        let book = self.find_book(entry.book_id).await?;
        let ctx = BusinessContext::load(&self.db, book.business_id).await?;
        self.require_creator_or_admin(&ctx, &entry, actor, "update")?;

        ledger::validate_patch(&patch)?;

        let old_kind: ledger::EntryKind = entry.entry_type.into();
        let old_amount = entry.amount;
        let new_kind = patch.kind.unwrap_or(old_kind);
        let new_amount = patch.amount.unwrap_or(old_amount);
        let new_balance = balance::updated(
            book.balance,
            (old_kind, old_amount),
            (new_kind, new_amount),
        );

        let now = Utc::now().into();
        let book_name = book.name.clone();

        let txn = self.db.begin().await.map_db()?;

        let mut active: entries::ActiveModel = entry.into();
        if let Some(amount) = patch.amount {
            active.amount = Set(amount);
        }
        if let Some(kind) = patch.kind {
            active.entry_type = Set(kind.into());
        }
        if let Some(date) = patch.entry_date {
            active.entry_date = Set(date);
        }
        if let Some(category) = patch.category {
            active.category = Set(category);
        }
        if let Some(mode) = patch.payment_mode {
            active.payment_mode = Set(mode);
        }
        if let Some(remark) = patch.remark {
            active.remark = Set(Some(remark));
        }
        if let Some(url) = patch.receipt_url {
            active.receipt_url = Set(Some(url));
        }
        active.updated_by = Set(Some(actor));
        active.updated_at = Set(now);
        let updated = active.update(&txn).await.map_db()?;

        let mut book_active: books::ActiveModel = book.into();
        book_active.balance = Set(new_balance);
        book_active.updated_at = Set(now);
        book_active.update(&txn).await.map_db()?;

        txn.commit().await.map_db()?;

        fanout::log_activity(
            &self.db,
            ActivityRecord {
                business_id: ctx.business.id,
                book_id: Some(updated.book_id),
                entry_id: Some(updated.id),
                user_id: actor,
                action: ActivityAction::UpdatedEntry,
                details: format!(
                    "Updated entry from {old_amount} to {} in {book_name}",
                    updated.amount
                ),
            },
        )
        .await;
        fanout::notify_members(
            &self.db,
            ctx.business.owner_id,
            ctx.member_ids(),
            actor,
            ctx.business.id,
            Some(updated.book_id),
            format!("Updated an entry to {} in {book_name}", updated.amount),
        )
        .await;

        Ok(updated)
    }

    /// Deletes an entry: reverts its balance effect using the stored type,
    /// snapshots it into trash, and removes the live row. Only the creator
    /// or a business admin (or the owner) may delete.
    pub async fn delete(&self, entry_id: Uuid, actor: Uuid) -> AppResult<()> {
        let entry = self.find_entry(entry_id).await?;
        let book = self.find_book(entry.book_id).await?;
        let ctx = BusinessContext::load(&self.db, book.business_id).await?;
        self.require_creator_or_admin(&ctx, &entry, actor, "delete")?;

        let kind: ledger::EntryKind = entry.entry_type.into();
        let new_balance = balance::revert(book.balance, kind, entry.amount);
        let snapshot = serde_json::to_value(&entry)
            .map_err(|err| AppError::Internal(err.to_string()))?;

        let now = Utc::now().into();
        let book_name = book.name.clone();

        let txn = self.db.begin().await.map_db()?;

        let trash_row = trash::ActiveModel {
            id: Set(Uuid::new_v4()),
            kind: Set(TrashKind::Entry),
            original_id: Set(entry.id),
            data: Set(snapshot),
            parent_business_id: Set(Some(ctx.business.id)),
            parent_book_id: Set(Some(book.id)),
            deleted_by: Set(actor),
            deleted_at: Set(now),
        };
        trash_row.insert(&txn).await.map_db()?;

        let mut book_active: books::ActiveModel = book.into();
        book_active.balance = Set(new_balance);
        book_active.updated_at = Set(now);
        book_active.update(&txn).await.map_db()?;

        entries::Entity::delete_by_id(entry.id)
            .exec(&txn)
            .await
            .map_db()?;

        txn.commit().await.map_db()?;

        let label = kind.label();
        fanout::log_activity(
            &self.db,
            ActivityRecord {
                business_id: ctx.business.id,
                book_id: Some(entry.book_id),
                entry_id: Some(entry.id),
                user_id: actor,
                action: ActivityAction::DeletedEntry,
                details: format!(
                    "Deleted {label} of {} from {book_name}",
                    entry.amount
                ),
            },
        )
        .await;
        fanout::notify_members(
            &self.db,
            ctx.business.owner_id,
            ctx.member_ids(),
            actor,
            ctx.business.id,
            Some(entry.book_id),
            format!("Deleted a {label} of {} in {book_name}", entry.amount),
        )
        .await;

        Ok(())
    }

    /// Lists a book's entries with search, type filter, and pagination.
    /// Any business role may view.
    pub async fn list(
        &self,
        book_id: Uuid,
        actor: Uuid,
        filter: EntryFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<entries::Model>> {
        let book = self.find_book(book_id).await?;
        let ctx = BusinessContext::load(&self.db, book.business_id).await?;
        if !ctx.authorize(actor, &[]) {
            return Err(AppError::Forbidden(
                "Not authorized to view this book".to_string(),
            ));
        }

        let mut query = entries::Entity::find().filter(entries::Column::BookId.eq(book_id));

        if let Some(search) = filter.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{search}%");
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::col((entries::Entity, entries::Column::Remark))
                            .ilike(pattern.clone()),
                    )
                    .add(Expr::col((entries::Entity, entries::Column::Category)).ilike(pattern)),
            );
        }
        if let Some(kind) = filter.entry_type {
            query = query.filter(entries::Column::EntryType.eq(kind));
        }

        let total = query.clone().count(&self.db).await.map_db()?;

        let rows = query
            .order_by_desc(entries::Column::EntryDate)
            .order_by_desc(entries::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_db()?;

        Ok(PageResponse::new(rows, page, total))
    }

    /// Monthly report for a book's calendar year: IN and OUT summed
    /// separately with an entry count, grouped by month.
    pub async fn monthly_report(
        &self,
        book_id: Uuid,
        actor: Uuid,
        year: i32,
    ) -> AppResult<Vec<MonthlySummary>> {
        let book = self.find_book(book_id).await?;
        let ctx = BusinessContext::load(&self.db, book.business_id).await?;
        if !ctx.authorize(actor, &[]) {
            return Err(AppError::Forbidden(
                "Not authorized to view this book".to_string(),
            ));
        }

        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| AppError::Validation("Invalid year".to_string()))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| AppError::Validation("Invalid year".to_string()))?;

        let rows = entries::Entity::find()
            .filter(entries::Column::BookId.eq(book_id))
            .filter(entries::Column::EntryDate.between(start, end))
            .all(&self.db)
            .await
            .map_db()?;

        Ok(ledger::report::monthly_report(
            year,
            rows.into_iter()
                .map(|e| (e.entry_date, e.entry_type.into(), e.amount)),
        ))
    }

    async fn find_book(&self, book_id: Uuid) -> AppResult<books::Model> {
        books::Entity::find_by_id(book_id)
            .one(&self.db)
            .await
            .map_db()?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    async fn find_entry(&self, entry_id: Uuid) -> AppResult<entries::Model> {
        entries::Entity::find_by_id(entry_id)
            .one(&self.db)
            .await
            .map_db()?
            .ok_or_else(|| AppError::NotFound("Entry not found".to_string()))
    }

    fn require_creator_or_admin(
        &self,
        ctx: &BusinessContext,
        entry: &entries::Model,
        actor: Uuid,
        verb: &str,
    ) -> AppResult<()> {
        let is_creator = entry.created_by == actor;
        let is_admin = ctx.authorize(actor, &[Role::Admin]);
        if is_creator || is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "Only the creator or an admin can {verb} this entry"
            )))
        }
    }
}
