//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//!
//! Repositories resolve the acting user's role through `cashbook-core`
//! before mutating anything, and wrap every compound write (entry plus
//! balance, the ownership-transfer triad, cascade snapshot and delete,
//! restore, purge) in a database transaction.

pub mod entities;
mod error;
pub mod migration;
pub mod repositories;

pub use repositories::{
    BookRepository, BusinessRepository, EntryRepository, NotificationRepository, TrashRepository,
    UserRepository,
};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
