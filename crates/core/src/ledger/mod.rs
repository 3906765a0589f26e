//! Entry validation and book balance algebra.
//!
//! A book's balance is an invariant over its live entries:
//! `balance == Σ(+amount for IN, -amount for OUT)`. Every mutation goes
//! through the revert/apply algebra in [`balance`] so the invariant holds
//! after creates, updates (including IN/OUT type flips), and deletes.

pub mod balance;
mod error;
pub mod report;
mod service;
mod txid;
mod types;

pub use error::LedgerError;
pub use service::{validate_draft, validate_patch};
pub use txid::transaction_id;
pub use types::{EntryDraft, EntryKind, EntryPatch};
