//! Role resolution and authorization.
//!
//! Every mutating operation resolves the acting user's effective role
//! against a business (and, for book-scoped checks, a book) before touching
//! data. Resolution never fails: an unknown user simply resolves to no role,
//! and callers map a failed [`authorize`] to an access-denied error.

mod service;
mod types;

pub use service::{authorize, book_role, business_role};
pub use types::{Membership, Role};
