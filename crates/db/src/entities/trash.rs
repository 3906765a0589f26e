//! `SeaORM` Entity for trash table.
//!
//! A generic snapshot store for soft-deleted records. Cascade traversal
//! uses the typed parent columns rather than scanning inside the JSON
//! payload.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TrashKind;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trash")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: TrashKind,
    /// Id the record had while live. Reused on restore.
    pub original_id: Uuid,
    /// Full snapshot of the deleted record and its embedded children.
    pub data: Json,
    pub parent_business_id: Option<Uuid>,
    pub parent_book_id: Option<Uuid>,
    pub deleted_by: Uuid,
    pub deleted_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
