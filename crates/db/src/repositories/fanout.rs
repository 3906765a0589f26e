//! Best-effort side effects: activity logging and notification fan-out.
//!
//! These run after the primary mutation has committed. A failure here is
//! warned and swallowed; it must never roll back or block the mutation.

use cashbook_core::activity::{self, ActivityAction};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use crate::entities::{activity_logs, notifications};

/// One audit-trail row to record.
#[derive(Debug)]
pub(crate) struct ActivityRecord {
    pub business_id: Uuid,
    pub book_id: Option<Uuid>,
    pub entry_id: Option<Uuid>,
    pub user_id: Uuid,
    pub action: ActivityAction,
    pub details: String,
}

/// Appends a row to the activity log. Log-and-continue on failure.
pub(crate) async fn log_activity(db: &DatabaseConnection, record: ActivityRecord) {
    let row = activity_logs::ActiveModel {
        id: Set(Uuid::new_v4()),
        business_id: Set(record.business_id),
        book_id: Set(record.book_id),
        entry_id: Set(record.entry_id),
        user_id: Set(record.user_id),
        action: Set(record.action.as_str().to_string()),
        details: Set(record.details),
        created_at: Set(Utc::now().into()),
    };

    if let Err(err) = row.insert(db).await {
        tracing::warn!(error = %err, action = %record.action, "failed to record activity");
    }
}

/// Fans a message out to the business owner and every member except the
/// acting user. Log-and-continue on failure.
pub(crate) async fn notify_members(
    db: &DatabaseConnection,
    owner_id: Uuid,
    member_ids: Vec<Uuid>,
    sender_id: Uuid,
    business_id: Uuid,
    book_id: Option<Uuid>,
    message: String,
) {
    let recipients = activity::recipients(owner_id, member_ids, sender_id);
    if recipients.is_empty() {
        return;
    }

    let now = Utc::now().into();
    let rows: Vec<notifications::ActiveModel> = recipients
        .into_iter()
        .map(|user_id| notifications::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            sender_id: Set(Some(sender_id)),
            business_id: Set(Some(business_id)),
            book_id: Set(book_id),
            message: Set(message.clone()),
            is_read: Set(false),
            created_at: Set(now),
        })
        .collect();

    if let Err(err) = notifications::Entity::insert_many(rows).exec(db).await {
        tracing::warn!(error = %err, "failed to fan out notifications");
    }
}
