//! Member and ownership transition rules.
//!
//! The rules here are pure: they inspect an owner pointer and a member list
//! and either approve a transition or explain why it is invalid. Applying
//! the transition (and making the ownership-transfer triad atomic) is the
//! storage layer's job.

mod error;
mod service;
mod types;

pub use error::MembershipError;
pub use service::{
    can_remove_member, plan_ownership_transfer, validate_add_member, validate_leave,
    validate_remove_member, validate_role_change,
};
pub use types::TransferPlan;
