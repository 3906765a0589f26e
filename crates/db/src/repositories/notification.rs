//! Notification repository: pull-polled reads and read-state flips.
//!
//! Rows are created only by the fan-out side effects; this repository
//! never inserts.

use cashbook_shared::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::entities::notifications;
use crate::error::DbResultExt;

/// Notification repository.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    db: DatabaseConnection,
}

impl NotificationRepository {
    /// Creates a new notification repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Returns the user's most recent 50 notifications.
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<notifications::Model>> {
        notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .order_by_desc(notifications::Column::CreatedAt)
            .limit(50)
            .all(&self.db)
            .await
            .map_db()
    }

    /// Marks one of the user's notifications as read.
    pub async fn mark_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<notifications::Model> {
        let notification = notifications::Entity::find_by_id(notification_id)
            .filter(notifications::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_db()?
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

        let mut active: notifications::ActiveModel = notification.into();
        active.is_read = Set(true);
        active.update(&self.db).await.map_db()
    }

    /// Marks all of the user's unread notifications as read. Returns the
    /// number of rows flipped.
    pub async fn mark_all_read(&self, user_id: Uuid) -> AppResult<u64> {
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::IsRead, Expr::value(true))
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_db()?;

        Ok(result.rows_affected)
    }
}
