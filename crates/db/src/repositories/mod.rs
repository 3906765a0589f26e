//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations, hiding
//! the `SeaORM` implementation details from the rest of the application.
//! Every mutating method takes the pre-resolved acting user id, resolves
//! the actor's role through `cashbook-core`, and records activity and
//! notification side effects after the primary transaction commits.

pub mod book;
pub mod business;
pub(crate) mod context;
pub mod entry;
pub(crate) mod fanout;
pub mod notification;
pub mod trash;
pub mod user;

pub use book::BookRepository;
pub use business::{BusinessDetail, BusinessInput, BusinessRepository};
pub use entry::{EntryFilter, EntryRepository};
pub use notification::NotificationRepository;
pub use trash::TrashRepository;
pub use user::{ProfilePatch, UserRepository};
