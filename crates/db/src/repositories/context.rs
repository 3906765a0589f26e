//! Business permission context shared by the repositories.

use cashbook_core::access::{self, Membership, Role};
use cashbook_shared::{AppError, AppResult};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::{business_members, businesses};
use crate::error::DbResultExt;

/// A business together with its member rows, loaded once per operation so
/// role resolution and fan-out work from a consistent snapshot.
#[derive(Debug, Clone)]
pub(crate) struct BusinessContext {
    pub business: businesses::Model,
    pub members: Vec<business_members::Model>,
}

impl BusinessContext {
    /// Loads the business and its member list.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the business does not exist.
    pub async fn load<C: ConnectionTrait>(db: &C, business_id: Uuid) -> AppResult<Self> {
        let business = businesses::Entity::find_by_id(business_id)
            .one(db)
            .await
            .map_db()?
            .ok_or_else(|| AppError::NotFound("Business not found".to_string()))?;

        let members = business_members::Entity::find()
            .filter(business_members::Column::BusinessId.eq(business_id))
            .all(db)
            .await
            .map_db()?;

        Ok(Self { business, members })
    }

    /// Member rows as core membership views.
    pub fn memberships(&self) -> Vec<Membership> {
        self.members
            .iter()
            .map(|m| Membership {
                user_id: m.user_id,
                role: m.role.into(),
            })
            .collect()
    }

    /// Resolves the user's effective business role.
    pub fn role_of(&self, user_id: Uuid) -> Option<Role> {
        access::business_role(self.business.owner_id, &self.memberships(), user_id)
    }

    /// Checks the user against the roles an operation permits.
    pub fn authorize(&self, user_id: Uuid, allowed: &[Role]) -> bool {
        access::authorize(self.role_of(user_id), allowed)
    }

    /// Member user ids, for notification fan-out.
    pub fn member_ids(&self) -> Vec<Uuid> {
        self.members.iter().map(|m| m.user_id).collect()
    }
}
