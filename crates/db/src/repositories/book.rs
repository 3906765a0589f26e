//! Book repository: book lifecycle and book-level membership.

use cashbook_core::access::{self, Role};
use cashbook_core::activity::ActivityAction;
use cashbook_core::membership;
use cashbook_shared::{AppError, AppResult};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entities::{
    book_members, books, sea_orm_active_enums::MemberRole, users,
};
use crate::error::DbResultExt;

use super::context::BusinessContext;
use super::fanout::{self, ActivityRecord};

/// Book repository for book lifecycle and member management.
#[derive(Debug, Clone)]
pub struct BookRepository {
    db: DatabaseConnection,
}

impl BookRepository {
    /// Creates a new book repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a book inside a business. Requires business admin or owner.
    pub async fn create(
        &self,
        business_id: Uuid,
        actor: Uuid,
        name: &str,
    ) -> AppResult<books::Model> {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }

        let ctx = BusinessContext::load(&self.db, business_id).await?;
        if !ctx.authorize(actor, &[Role::Admin]) {
            return Err(AppError::Forbidden(
                "Not authorized to create books in this business".to_string(),
            ));
        }

        let now = Utc::now().into();
        let book = books::ActiveModel {
            id: Set(Uuid::new_v4()),
            business_id: Set(business_id),
            name: Set(name.to_string()),
            created_by: Set(actor),
            balance: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let book = book.insert(&self.db).await.map_db()?;

        fanout::log_activity(
            &self.db,
            ActivityRecord {
                business_id,
                book_id: Some(book.id),
                entry_id: None,
                user_id: actor,
                action: ActivityAction::CreatedBook,
                details: format!("Created book: {name}"),
            },
        )
        .await;

        Ok(book)
    }

    /// Gets a book. Any business role may view it.
    pub async fn get(&self, book_id: Uuid, actor: Uuid) -> AppResult<books::Model> {
        let book = self.find_book(book_id).await?;
        let ctx = BusinessContext::load(&self.db, book.business_id).await?;
        if !ctx.authorize(actor, &[]) {
            return Err(AppError::Forbidden(
                "Not authorized to view this book".to_string(),
            ));
        }
        Ok(book)
    }

    /// Renames a book. Requires business admin or owner.
    pub async fn rename(&self, book_id: Uuid, actor: Uuid, name: &str) -> AppResult<books::Model> {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }

        let book = self.find_book(book_id).await?;
        let ctx = BusinessContext::load(&self.db, book.business_id).await?;
        if !ctx.authorize(actor, &[Role::Admin]) {
            return Err(AppError::Forbidden(
                "Not authorized to rename this book".to_string(),
            ));
        }

        let old_name = book.name.clone();
        let business_id = book.business_id;

        let mut active: books::ActiveModel = book.into();
        active.name = Set(name.to_string());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await.map_db()?;

        fanout::log_activity(
            &self.db,
            ActivityRecord {
                business_id,
                book_id: Some(book_id),
                entry_id: None,
                user_id: actor,
                action: ActivityAction::RenamedBook,
                details: format!("Renamed book from \"{old_name}\" to \"{name}\""),
            },
        )
        .await;

        Ok(updated)
    }

    /// Lists a book's member rows. Any business role may view them.
    pub async fn list_members(
        &self,
        book_id: Uuid,
        actor: Uuid,
    ) -> AppResult<Vec<book_members::Model>> {
        let book = self.find_book(book_id).await?;
        let ctx = BusinessContext::load(&self.db, book.business_id).await?;
        if !ctx.authorize(actor, &[]) {
            return Err(AppError::Forbidden(
                "Not authorized to view this book".to_string(),
            ));
        }

        book_members::Entity::find()
            .filter(book_members::Column::BookId.eq(book_id))
            .all(&self.db)
            .await
            .map_db()
    }

    /// Adds a book member by email. Business admins and the owner may
    /// manage any book's members without holding a book row themselves;
    /// otherwise a book admin row is required.
    pub async fn add_member(
        &self,
        book_id: Uuid,
        actor: Uuid,
        email: &str,
        role: MemberRole,
    ) -> AppResult<book_members::Model> {
        let (book, ctx, book_memberships) = self.load_book_scope(book_id).await?;
        self.require_book_admin(&ctx, &book_memberships, actor)?;

        let target = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_db()?
            .ok_or_else(|| AppError::NotFound("User not found with that email".to_string()))?;

        membership::validate_add_member(ctx.business.owner_id, &book_memberships, target.id)?;

        let now = Utc::now().into();
        let row = book_members::ActiveModel {
            book_id: Set(book_id),
            user_id: Set(target.id),
            role: Set(role),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let row = row.insert(&self.db).await.map_db()?;

        let role_tag = Role::from(role).as_str();
        fanout::log_activity(
            &self.db,
            ActivityRecord {
                business_id: ctx.business.id,
                book_id: Some(book_id),
                entry_id: None,
                user_id: actor,
                action: ActivityAction::AddedMember,
                details: format!("Added {email} as {role_tag} in {}", book.name),
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
            format!("{email} was added to {} as {role_tag}", book.name),
        )
        .await;

        Ok(row)
    }

    /// Removes a book member. Book admins, business admins, and the owner
    /// may remove anyone; a book member may remove themself.
    pub async fn remove_member(&self, book_id: Uuid, actor: Uuid, target: Uuid) -> AppResult<()> {
        let (book, ctx, book_memberships) = self.load_book_scope(book_id).await?;

        let actor_role = access::book_role(
            ctx.business.owner_id,
            &ctx.memberships(),
            &book_memberships,
            actor,
        );
        if !membership::can_remove_member(actor_role, actor, target) {
            return Err(AppError::Forbidden(
                "Not authorized to manage book members".to_string(),
            ));
        }
        membership::validate_remove_member(ctx.business.owner_id, &book_memberships, target)?;

        book_members::Entity::delete_many()
            .filter(book_members::Column::BookId.eq(book_id))
            .filter(book_members::Column::UserId.eq(target))
            .exec(&self.db)
            .await
            .map_db()?;

        fanout::log_activity(
            &self.db,
            ActivityRecord {
                business_id: ctx.business.id,
                book_id: Some(book_id),
                entry_id: None,
                user_id: actor,
                action: ActivityAction::RemovedMember,
                details: format!("Removed member with ID {target} from {}", book.name),
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
            format!("A member was removed from {}", book.name),
        )
        .await;

        Ok(())
    }

    /// Changes a book member's role. Same dominance rule as `add_member`.
    pub async fn update_member_role(
        &self,
        book_id: Uuid,
        actor: Uuid,
        target: Uuid,
        role: MemberRole,
    ) -> AppResult<book_members::Model> {
        let (book, ctx, book_memberships) = self.load_book_scope(book_id).await?;
        self.require_book_admin(&ctx, &book_memberships, actor)?;

        membership::validate_role_change(ctx.business.owner_id, &book_memberships, target)?;

        let row = book_members::Entity::find_by_id((book_id, target))
            .one(&self.db)
            .await
            .map_db()?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;
        let old_role = Role::from(row.role);

        let mut active: book_members::ActiveModel = row.into();
        active.role = Set(role);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await.map_db()?;

        fanout::log_activity(
            &self.db,
            ActivityRecord {
                business_id: ctx.business.id,
                book_id: Some(book_id),
                entry_id: None,
                user_id: actor,
                action: ActivityAction::UpdatedMemberRole,
                details: format!(
                    "Updated member role from {} to {} in {}",
                    old_role.as_str(),
                    Role::from(role).as_str(),
                    book.name
                ),
            },
        )
        .await;

        Ok(updated)
    }

    async fn find_book(&self, book_id: Uuid) -> AppResult<books::Model> {
        books::Entity::find_by_id(book_id)
            .one(&self.db)
            .await
            .map_db()?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    async fn load_book_scope(
        &self,
        book_id: Uuid,
    ) -> AppResult<(
        books::Model,
        BusinessContext,
        Vec<cashbook_core::access::Membership>,
    )> {
        let book = self.find_book(book_id).await?;
        let ctx = BusinessContext::load(&self.db, book.business_id).await?;
        let book_memberships = book_members::Entity::find()
            .filter(book_members::Column::BookId.eq(book_id))
            .all(&self.db)
            .await
            .map_db()?
            .into_iter()
            .map(|m| cashbook_core::access::Membership {
                user_id: m.user_id,
                role: m.role.into(),
            })
            .collect();
        Ok((book, ctx, book_memberships))
    }

    fn require_book_admin(
        &self,
        ctx: &BusinessContext,
        book_memberships: &[cashbook_core::access::Membership],
        actor: Uuid,
    ) -> AppResult<()> {
        let role = access::book_role(
            ctx.business.owner_id,
            &ctx.memberships(),
            book_memberships,
            actor,
        );
        if access::authorize(role, &[Role::Admin]) {
            Ok(())
        } else {
            Err(AppError::Forbidden(
                "Not authorized to manage book members".to_string(),
            ))
        }
    }
}
