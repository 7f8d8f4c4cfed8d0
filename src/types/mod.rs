//! Core data types for the PayStream Engine
//!
//! This module contains all data structures shared across the engine:
//! - `session` - Connected-principal identity and capability
//! - `snapshot` - Authoritative point-in-time protocol reads
//! - `ledger` - Immutable protocol event records
//! - `action` - Write-action kinds, phases, and receipts
//! - `error` - Error taxonomy

pub mod action;
pub mod error;
pub mod ledger;
pub mod session;
pub mod snapshot;

pub use action::{ActionKind, ActionPhase, PendingAction, Receipt};
pub use error::{AuthorityError, EngineError, StoreError};
pub use ledger::{LedgerEntry, LedgerKind, TxHash};
pub use session::{AccountSession, Address, Capability, WriteCredential};
pub use snapshot::Snapshot;
