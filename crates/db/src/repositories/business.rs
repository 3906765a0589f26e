//! Business repository: tenant lifecycle, membership, and settings.

use cashbook_core::access::Role;
use cashbook_core::activity::ActivityAction;
use cashbook_core::membership;
use cashbook_shared::{AppError, AppResult};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    activity_logs, book_members, books, business_categories, business_members, businesses,
    payment_modes, users,
    sea_orm_active_enums::{CategoryKind, MemberRole},
};
use crate::error::DbResultExt;

use super::context::BusinessContext;
use super::fanout::{self, ActivityRecord};

/// Input for creating or updating a business profile. On update, `None`
/// fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct BusinessInput {
    /// Business name. Required.
    pub name: String,
    /// Street address.
    pub address: Option<String>,
    /// Line of business.
    pub business_category: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
    /// Logo/image URL.
    pub image_url: Option<String>,
}

/// A business with its member list, settings, and the books visible to the
/// requesting user.
#[derive(Debug, Clone)]
pub struct BusinessDetail {
    /// The business row.
    pub business: businesses::Model,
    /// Member rows.
    pub members: Vec<business_members::Model>,
    /// Category settings.
    pub categories: Vec<business_categories::Model>,
    /// Payment mode settings.
    pub payment_modes: Vec<payment_modes::Model>,
    /// Books the requesting user may see: all of them for the owner and
    /// admins, otherwise only books where the user holds a member row.
    pub books: Vec<books::Model>,
}

/// Business repository for tenant and membership operations.
#[derive(Debug, Clone)]
pub struct BusinessRepository {
    db: DatabaseConnection,
}

impl BusinessRepository {
    /// Creates a new business repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a business owned by `owner_id`, along with its default
    /// "Cash Book", in one transaction.
    pub async fn create(
        &self,
        owner_id: Uuid,
        input: BusinessInput,
    ) -> AppResult<businesses::Model> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }

        let now = Utc::now().into();
        let business_id = Uuid::new_v4();

        let txn = self.db.begin().await.map_db()?;

        let business = businesses::ActiveModel {
            id: Set(business_id),
            name: Set(input.name.clone()),
            owner_id: Set(owner_id),
            address: Set(input.address),
            business_category: Set(input.business_category),
            phone: Set(input.phone),
            description: Set(input.description),
            image_url: Set(input.image_url),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let business = business.insert(&txn).await.map_db()?;

        let default_book = books::ActiveModel {
            id: Set(Uuid::new_v4()),
            business_id: Set(business_id),
            name: Set("Cash Book".to_string()),
            created_by: Set(owner_id),
            balance: Set(Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        };
        default_book.insert(&txn).await.map_db()?;

        txn.commit().await.map_db()?;

        fanout::log_activity(
            &self.db,
            ActivityRecord {
                business_id,
                book_id: None,
                entry_id: None,
                user_id: owner_id,
                action: ActivityAction::CreatedBusiness,
                details: format!("Created business: {}", business.name),
            },
        )
        .await;

        Ok(business)
    }

    /// Lists every business the user owns or is a member of.
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<businesses::Model>> {
        let mut result = businesses::Entity::find()
            .filter(businesses::Column::OwnerId.eq(user_id))
            .all(&self.db)
            .await
            .map_db()?;

        let member_of: Vec<Uuid> = business_members::Entity::find()
            .filter(business_members::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_db()?
            .into_iter()
            .map(|m| m.business_id)
            .collect();

        if !member_of.is_empty() {
            let joined = businesses::Entity::find()
                .filter(businesses::Column::Id.is_in(member_of))
                .all(&self.db)
                .await
                .map_db()?;
            result.extend(joined);
        }

        Ok(result)
    }

    /// Gets a business with its members, settings, and visible books.
    pub async fn get(&self, business_id: Uuid, actor: Uuid) -> AppResult<BusinessDetail> {
        let ctx = BusinessContext::load(&self.db, business_id).await?;
        if !ctx.authorize(actor, &[]) {
            return Err(AppError::Forbidden(
                "Not authorized to view this business".to_string(),
            ));
        }

        let categories = business_categories::Entity::find()
            .filter(business_categories::Column::BusinessId.eq(business_id))
            .all(&self.db)
            .await
            .map_db()?;
        let modes = payment_modes::Entity::find()
            .filter(payment_modes::Column::BusinessId.eq(business_id))
            .all(&self.db)
            .await
            .map_db()?;

        let all_books = books::Entity::find()
            .filter(books::Column::BusinessId.eq(business_id))
            .order_by_desc(books::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_db()?;

        // Owner and admins see every book; everyone else only books where
        // they hold a member row.
        let visible_books = if ctx.authorize(actor, &[Role::Admin]) {
            all_books
        } else {
            let book_ids: Vec<Uuid> = all_books.iter().map(|b| b.id).collect();
            let joined: Vec<Uuid> = if book_ids.is_empty() {
                Vec::new()
            } else {
                book_members::Entity::find()
                    .filter(book_members::Column::UserId.eq(actor))
                    .filter(book_members::Column::BookId.is_in(book_ids))
                    .all(&self.db)
                    .await
                    .map_db()?
                    .into_iter()
                    .map(|m| m.book_id)
                    .collect()
            };
            all_books
                .into_iter()
                .filter(|b| joined.contains(&b.id))
                .collect()
        };

        Ok(BusinessDetail {
            business: ctx.business,
            members: ctx.members,
            categories,
            payment_modes: modes,
            books: visible_books,
        })
    }

    /// Updates the business profile. Requires admin or owner.
    pub async fn update(
        &self,
        business_id: Uuid,
        actor: Uuid,
        input: BusinessInput,
    ) -> AppResult<businesses::Model> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation("Name is required".to_string()));
        }

        let ctx = BusinessContext::load(&self.db, business_id).await?;
        if !ctx.authorize(actor, &[Role::Admin]) {
            return Err(AppError::Forbidden(
                "Not authorized to update this business".to_string(),
            ));
        }

        let mut active: businesses::ActiveModel = ctx.business.into();
        active.name = Set(input.name.clone());
        if let Some(address) = input.address {
            active.address = Set(Some(address));
        }
        if let Some(category) = input.business_category {
            active.business_category = Set(Some(category));
        }
        if let Some(phone) = input.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(description) = input.description {
            active.description = Set(Some(description));
        }
        if let Some(image_url) = input.image_url {
            active.image_url = Set(Some(image_url));
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await.map_db()?;

        fanout::log_activity(
            &self.db,
            ActivityRecord {
                business_id,
                book_id: None,
                entry_id: None,
                user_id: actor,
                action: ActivityAction::UpdatedBusiness,
                details: format!("Updated business details for \"{}\"", input.name),
            },
        )
        .await;

        Ok(updated)
    }

    /// Adds a member by email. Requires admin or owner.
    pub async fn add_member(
        &self,
        business_id: Uuid,
        actor: Uuid,
        email: &str,
        role: MemberRole,
    ) -> AppResult<business_members::Model> {
        let ctx = BusinessContext::load(&self.db, business_id).await?;
        if !ctx.authorize(actor, &[Role::Admin]) {
            return Err(AppError::Forbidden(
                "Not authorized to add members".to_string(),
            ));
        }

        let target = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_db()?
            .ok_or_else(|| AppError::NotFound("User not found with that email".to_string()))?;

        membership::validate_add_member(
            ctx.business.owner_id,
            &ctx.memberships(),
            target.id,
        )?;

        let now = Utc::now().into();
        let row = business_members::ActiveModel {
            business_id: Set(business_id),
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
                business_id,
                book_id: None,
                entry_id: None,
                user_id: actor,
                action: ActivityAction::AddedMember,
                details: format!("Added {email} as {role_tag}"),
            },
        )
        .await;
        fanout::notify_members(
            &self.db,
            ctx.business.owner_id,
            ctx.member_ids(),
            actor,
            business_id,
            None,
            format!("{email} joined {} as {role_tag}", ctx.business.name),
        )
        .await;

        Ok(row)
    }

    /// Removes a member. Admins and the owner may remove anyone; a member
    /// may remove themself. The owner can never be removed.
    pub async fn remove_member(
        &self,
        business_id: Uuid,
        actor: Uuid,
        target: Uuid,
    ) -> AppResult<()> {
        let ctx = BusinessContext::load(&self.db, business_id).await?;
        if !membership::can_remove_member(ctx.role_of(actor), actor, target) {
            return Err(AppError::Forbidden(
                "Not authorized to remove members".to_string(),
            ));
        }
        membership::validate_remove_member(ctx.business.owner_id, &ctx.memberships(), target)?;

        business_members::Entity::delete_many()
            .filter(business_members::Column::BusinessId.eq(business_id))
            .filter(business_members::Column::UserId.eq(target))
            .exec(&self.db)
            .await
            .map_db()?;

        fanout::log_activity(
            &self.db,
            ActivityRecord {
                business_id,
                book_id: None,
                entry_id: None,
                user_id: actor,
                action: ActivityAction::RemovedMember,
                details: format!("Removed member with ID {target}"),
            },
        )
        .await;
        fanout::notify_members(
            &self.db,
            ctx.business.owner_id,
            ctx.member_ids(),
            actor,
            business_id,
            None,
            format!("A member was removed from {}", ctx.business.name),
        )
        .await;

        Ok(())
    }

    /// A member voluntarily leaves. The owner is rejected outright.
    pub async fn leave(&self, business_id: Uuid, actor: Uuid) -> AppResult<()> {
        let ctx = BusinessContext::load(&self.db, business_id).await?;
        membership::validate_leave(ctx.business.owner_id, &ctx.memberships(), actor)?;

        business_members::Entity::delete_many()
            .filter(business_members::Column::BusinessId.eq(business_id))
            .filter(business_members::Column::UserId.eq(actor))
            .exec(&self.db)
            .await
            .map_db()?;

        let leaver = users::Entity::find_by_id(actor)
            .one(&self.db)
            .await
            .map_db()?;
        let who = leaver.map_or_else(|| actor.to_string(), |u| u.name);

        fanout::log_activity(
            &self.db,
            ActivityRecord {
                business_id,
                book_id: None,
                entry_id: None,
                user_id: actor,
                action: ActivityAction::LeftBusiness,
                details: format!("{who} left the business"),
            },
        )
        .await;

        Ok(())
    }

    /// Changes a member's role. Requires admin or owner; the owner's role
    /// can never be changed (they have no member row).
    pub async fn update_member_role(
        &self,
        business_id: Uuid,
        actor: Uuid,
        target: Uuid,
        role: MemberRole,
    ) -> AppResult<business_members::Model> {
        let ctx = BusinessContext::load(&self.db, business_id).await?;
        if !ctx.authorize(actor, &[Role::Admin]) {
            return Err(AppError::Forbidden(
                "Not authorized to update member roles".to_string(),
            ));
        }
        membership::validate_role_change(ctx.business.owner_id, &ctx.memberships(), target)?;

        let row = business_members::Entity::find_by_id((business_id, target))
            .one(&self.db)
            .await
            .map_db()?
            .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;
        let old_role = Role::from(row.role);

        let mut active: business_members::ActiveModel = row.into();
        active.role = Set(role);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&self.db).await.map_db()?;

        let new_role = Role::from(role);
        fanout::log_activity(
            &self.db,
            ActivityRecord {
                business_id,
                book_id: None,
                entry_id: None,
                user_id: actor,
                action: ActivityAction::UpdatedMemberRole,
                details: format!(
                    "Updated member role from {} to {}",
                    old_role.as_str(),
                    new_role.as_str()
                ),
            },
        )
        .await;
        fanout::notify_members(
            &self.db,
            ctx.business.owner_id,
            ctx.member_ids(),
            actor,
            business_id,
            None,
            format!("A member role changed in {}", ctx.business.name),
        )
        .await;

        Ok(updated)
    }

    /// Transfers ownership to the user behind `new_owner_email`. Only the
    /// current owner may invoke this. The new owner's member row (if any)
    /// is removed, the old owner is appended as an admin, and the owner
    /// pointer is reassigned — all in one transaction.
    pub async fn transfer_ownership(
        &self,
        business_id: Uuid,
        actor: Uuid,
        new_owner_email: &str,
    ) -> AppResult<businesses::Model> {
        let ctx = BusinessContext::load(&self.db, business_id).await?;
        if ctx.business.owner_id != actor {
            return Err(AppError::Forbidden(
                "Only the current owner can transfer ownership".to_string(),
            ));
        }

        let new_owner = users::Entity::find()
            .filter(users::Column::Email.eq(new_owner_email))
            .one(&self.db)
            .await
            .map_db()?
            .ok_or_else(|| AppError::NotFound("User not found with that email".to_string()))?;

        let plan = membership::plan_ownership_transfer(
            ctx.business.owner_id,
            &ctx.memberships(),
            new_owner.id,
        )?;

        let now = Utc::now().into();
        let txn = self.db.begin().await.map_db()?;

        if plan.strip_new_owner_member_row {
            business_members::Entity::delete_many()
                .filter(business_members::Column::BusinessId.eq(business_id))
                .filter(business_members::Column::UserId.eq(plan.new_owner))
                .exec(&txn)
                .await
                .map_db()?;
        }

        let demoted = business_members::ActiveModel {
            business_id: Set(business_id),
            user_id: Set(plan.previous_owner),
            role: Set(MemberRole::Admin),
            created_at: Set(now),
            updated_at: Set(now),
        };
        demoted.insert(&txn).await.map_db()?;

        let mut active: businesses::ActiveModel = ctx.business.clone().into();
        active.owner_id = Set(plan.new_owner);
        active.updated_at = Set(now);
        let updated = active.update(&txn).await.map_db()?;

        txn.commit().await.map_db()?;

        fanout::log_activity(
            &self.db,
            ActivityRecord {
                business_id,
                book_id: None,
                entry_id: None,
                user_id: actor,
                action: ActivityAction::TransferredOwnership,
                details: format!("Transferred ownership to {}", new_owner.email),
            },
        )
        .await;
        let mut audience = ctx.member_ids();
        audience.push(plan.previous_owner);
        fanout::notify_members(
            &self.db,
            plan.new_owner,
            audience,
            actor,
            business_id,
            None,
            format!("Ownership of {} was transferred", ctx.business.name),
        )
        .await;

        Ok(updated)
    }

    /// Adds a category. Any business role may add one; duplicate names are
    /// rejected case-insensitively.
    pub async fn add_category(
        &self,
        business_id: Uuid,
        actor: Uuid,
        name: &str,
        kind: CategoryKind,
    ) -> AppResult<business_categories::Model> {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Category name is required".to_string()));
        }

        let ctx = BusinessContext::load(&self.db, business_id).await?;
        if !ctx.authorize(actor, &[Role::Admin, Role::Editor, Role::Member]) {
            return Err(AppError::Forbidden(
                "Not authorized to add categories".to_string(),
            ));
        }

        let existing = business_categories::Entity::find()
            .filter(business_categories::Column::BusinessId.eq(business_id))
            .all(&self.db)
            .await
            .map_db()?;
        if existing.iter().any(|c| c.name.eq_ignore_ascii_case(name)) {
            return Err(AppError::Conflict("Category already exists".to_string()));
        }

        let row = business_categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            business_id: Set(business_id),
            name: Set(name.to_string()),
            kind: Set(kind),
            created_at: Set(Utc::now().into()),
        };
        let row = row.insert(&self.db).await.map_db()?;

        fanout::log_activity(
            &self.db,
            ActivityRecord {
                business_id,
                book_id: None,
                entry_id: None,
                user_id: actor,
                action: ActivityAction::AddedCategory,
                details: format!("Added category: {name}"),
            },
        )
        .await;

        Ok(row)
    }

    /// Deletes a category. Requires admin or editor.
    pub async fn remove_category(
        &self,
        business_id: Uuid,
        actor: Uuid,
        category_id: Uuid,
    ) -> AppResult<()> {
        let ctx = BusinessContext::load(&self.db, business_id).await?;
        if !ctx.authorize(actor, &[Role::Admin, Role::Editor]) {
            return Err(AppError::Forbidden(
                "Not authorized to delete categories".to_string(),
            ));
        }

        let category = business_categories::Entity::find_by_id(category_id)
            .filter(business_categories::Column::BusinessId.eq(business_id))
            .one(&self.db)
            .await
            .map_db()?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        let name = category.name.clone();
        business_categories::Entity::delete_by_id(category.id)
            .exec(&self.db)
            .await
            .map_db()?;

        fanout::log_activity(
            &self.db,
            ActivityRecord {
                business_id,
                book_id: None,
                entry_id: None,
                user_id: actor,
                action: ActivityAction::DeletedCategory,
                details: format!("Deleted category: {name}"),
            },
        )
        .await;

        Ok(())
    }

    /// Adds a payment mode. Requires admin or editor; duplicates rejected.
    pub async fn add_payment_mode(
        &self,
        business_id: Uuid,
        actor: Uuid,
        name: &str,
    ) -> AppResult<payment_modes::Model> {
        if name.trim().is_empty() {
            return Err(AppError::Validation(
                "Payment mode name is required".to_string(),
            ));
        }

        let ctx = BusinessContext::load(&self.db, business_id).await?;
        if !ctx.authorize(actor, &[Role::Admin, Role::Editor]) {
            return Err(AppError::Forbidden(
                "Not authorized to add payment modes".to_string(),
            ));
        }

        let duplicate = payment_modes::Entity::find()
            .filter(payment_modes::Column::BusinessId.eq(business_id))
            .filter(payment_modes::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_db()?;
        if duplicate.is_some() {
            return Err(AppError::Conflict("Payment mode already exists".to_string()));
        }

        let row = payment_modes::ActiveModel {
            id: Set(Uuid::new_v4()),
            business_id: Set(business_id),
            name: Set(name.to_string()),
            created_at: Set(Utc::now().into()),
        };
        row.insert(&self.db).await.map_db()
    }

    /// Deletes a payment mode by name. Requires admin or editor.
    pub async fn remove_payment_mode(
        &self,
        business_id: Uuid,
        actor: Uuid,
        name: &str,
    ) -> AppResult<()> {
        let ctx = BusinessContext::load(&self.db, business_id).await?;
        if !ctx.authorize(actor, &[Role::Admin, Role::Editor]) {
            return Err(AppError::Forbidden(
                "Not authorized to delete payment modes".to_string(),
            ));
        }

        let mode = payment_modes::Entity::find()
            .filter(payment_modes::Column::BusinessId.eq(business_id))
            .filter(payment_modes::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_db()?
            .ok_or_else(|| AppError::NotFound("Payment mode not found".to_string()))?;

        payment_modes::Entity::delete_by_id(mode.id)
            .exec(&self.db)
            .await
            .map_db()?;

        fanout::log_activity(
            &self.db,
            ActivityRecord {
                business_id,
                book_id: None,
                entry_id: None,
                user_id: actor,
                action: ActivityAction::DeletedPaymentMode,
                details: format!("Deleted payment mode: {name}"),
            },
        )
        .await;

        Ok(())
    }

    /// Returns the most recent 100 activity rows for a business. Any
    /// business role may view them.
    pub async fn activity(
        &self,
        business_id: Uuid,
        actor: Uuid,
    ) -> AppResult<Vec<activity_logs::Model>> {
        let ctx = BusinessContext::load(&self.db, business_id).await?;
        if !ctx.authorize(actor, &[]) {
            return Err(AppError::Forbidden(
                "Not authorized to view activity".to_string(),
            ));
        }

        activity_logs::Entity::find()
            .filter(activity_logs::Column::BusinessId.eq(business_id))
            .order_by_desc(activity_logs::Column::CreatedAt)
            .limit(100)
            .all(&self.db)
            .await
            .map_db()
    }
}
