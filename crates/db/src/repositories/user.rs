//! User repository: identity resolution and account lifecycle.

use cashbook_shared::{AppError, AppResult};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{
    book_members, books, business_categories, business_members, businesses, entries,
    activity_logs, notifications, payment_modes, users,
};
use crate::error::DbResultExt;

/// Partial profile update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    /// New display name.
    pub name: Option<String>,
    /// New photo URL.
    pub photo_url: Option<String>,
    /// New phone number.
    pub phone_number: Option<String>,
    /// New address.
    pub address: Option<String>,
    /// New social link.
    pub social_link: Option<String>,
}

/// User repository for identity resolution and CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Maps a verified external identity to the internal user record,
    /// creating it on first sync and refreshing name/photo afterwards.
    pub async fn sync(
        &self,
        external_ref: &str,
        email: &str,
        name: &str,
        photo_url: Option<&str>,
    ) -> AppResult<users::Model> {
        let existing = users::Entity::find()
            .filter(users::Column::ExternalRef.eq(external_ref))
            .one(&self.db)
            .await
            .map_db()?;

        let now = Utc::now().into();

        match existing {
            Some(user) => {
                let mut active: users::ActiveModel = user.into();
                active.name = Set(name.to_string());
                if let Some(url) = photo_url {
                    active.photo_url = Set(Some(url.to_string()));
                }
                active.updated_at = Set(now);
                active.update(&self.db).await.map_db()
            }
            None => {
                let user = users::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    external_ref: Set(external_ref.to_string()),
                    email: Set(email.to_string()),
                    name: Set(name.to_string()),
                    photo_url: Set(photo_url.map(ToString::to_string)),
                    phone_number: Set(None),
                    address: Set(None),
                    social_link: Set(None),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                user.insert(&self.db).await.map_db()
            }
        }
    }

    /// Finds a user by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<users::Model>> {
        users::Entity::find_by_id(id).one(&self.db).await.map_db()
    }

    /// Finds a user by email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<users::Model>> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_db()
    }

    /// Updates the user's profile fields.
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        patch: ProfilePatch,
    ) -> AppResult<users::Model> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_db()?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let mut active: users::ActiveModel = user.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(url) = patch.photo_url {
            active.photo_url = Set(Some(url));
        }
        if let Some(phone) = patch.phone_number {
            active.phone_number = Set(Some(phone));
        }
        if let Some(address) = patch.address {
            active.address = Set(Some(address));
        }
        if let Some(link) = patch.social_link {
            active.social_link = Set(Some(link));
        }
        active.updated_at = Set(Utc::now().into());

        active.update(&self.db).await.map_db()
    }

    /// Deletes the user's account: every business they own goes away with
    /// its books, entries, and logs; their memberships elsewhere are
    /// removed; finally the user row itself is deleted. One transaction.
    pub async fn delete_account(&self, user_id: Uuid) -> AppResult<()> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_db()?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let txn = self.db.begin().await.map_db()?;

        let owned_ids: Vec<Uuid> = businesses::Entity::find()
            .filter(businesses::Column::OwnerId.eq(user_id))
            .all(&txn)
            .await
            .map_db()?
            .into_iter()
            .map(|b| b.id)
            .collect();

        if !owned_ids.is_empty() {
            let book_ids: Vec<Uuid> = books::Entity::find()
                .filter(books::Column::BusinessId.is_in(owned_ids.clone()))
                .all(&txn)
                .await
                .map_db()?
                .into_iter()
                .map(|b| b.id)
                .collect();

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
                .filter(books::Column::BusinessId.is_in(owned_ids.clone()))
                .exec(&txn)
                .await
                .map_db()?;
            activity_logs::Entity::delete_many()
                .filter(activity_logs::Column::BusinessId.is_in(owned_ids.clone()))
                .exec(&txn)
                .await
                .map_db()?;
            business_categories::Entity::delete_many()
                .filter(business_categories::Column::BusinessId.is_in(owned_ids.clone()))
                .exec(&txn)
                .await
                .map_db()?;
            payment_modes::Entity::delete_many()
                .filter(payment_modes::Column::BusinessId.is_in(owned_ids.clone()))
                .exec(&txn)
                .await
                .map_db()?;
            business_members::Entity::delete_many()
                .filter(business_members::Column::BusinessId.is_in(owned_ids.clone()))
                .exec(&txn)
                .await
                .map_db()?;
            businesses::Entity::delete_many()
                .filter(businesses::Column::Id.is_in(owned_ids))
                .exec(&txn)
                .await
                .map_db()?;
        }

        // Memberships in businesses and books owned by others.
        business_members::Entity::delete_many()
            .filter(business_members::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_db()?;
        book_members::Entity::delete_many()
            .filter(book_members::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_db()?;
        notifications::Entity::delete_many()
            .filter(notifications::Column::UserId.eq(user_id))
            .exec(&txn)
            .await
            .map_db()?;

        users::Entity::delete_by_id(user.id)
            .exec(&txn)
            .await
            .map_db()?;

        txn.commit().await.map_db()
    }
}
