//! Soft-delete cascade planning.
//!
//! Each logical entity moves `Live -> Trashed -> {Restored, Purged}`.
//! The planners here decide, from a user's trash rows alone, which rows a
//! cascade covers and in what order they come back; executing the plan
//! (snapshots, recreation, row deletion) happens in the storage layer
//! inside one transaction.

mod error;
mod plan;
mod types;

pub use error::TrashError;
pub use plan::{authorize_deleter, cascade_plan, ensure_restorable};
pub use types::{CascadePlan, TrashKind, TrashRowView};
