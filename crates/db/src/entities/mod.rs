//! `SeaORM` entity definitions.

pub mod activity_logs;
pub mod book_members;
pub mod books;
pub mod business_categories;
pub mod business_members;
pub mod businesses;
pub mod entries;
pub mod notifications;
pub mod payment_modes;
pub mod sea_orm_active_enums;
pub mod trash;
pub mod users;
