//! PayStream Engine Library
//! # Overview
//!
//! This library is the real-time balance accrual and ledger synchronization
//! core of a payroll-streaming dashboard: it simulates a continuously
//! growing balance between authoritative on-chain reads, reconciles the
//! simulation whenever a fresh snapshot lands, and keeps a deduplicated,
//! time-ordered ledger of protocol events fed by a historical backfill and
//! a live push subscription.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (sessions, snapshots, ledger entries, errors)
//! - [`config`] - Injected environment and timing constants
//! - [`core`] - Engine components:
//!   - [`core::snapshot`] - Authoritative snapshot reader
//!   - [`core::accrual`] - Fixed-tick accrual simulator
//!   - [`core::reconcile`] - Live-balance reconciliation
//!   - [`core::ledger_sync`] - Ledger backfill + live subscription
//!   - [`core::orchestrator`] - Write-action orchestration
//!   - [`core::engine`] - Session lifecycle
//!
//! # Lifecycle
//!
//! Connect an account, watch the live balance grow tick by tick, submit
//! actions (bonus, refill, stream creation, claim, pause toggle), and
//! disconnect. Every confirmed action records exactly one ledger entry and
//! triggers a snapshot refresh; disconnecting cancels every timer and
//! subscription and clears all derived state.

// Module declarations
pub mod config;
pub mod core;
pub mod types;

pub use config::{EngineConfig, GasCeilings};
pub use core::{
    fetch_snapshot, AccrualSimulator, AccrualState, ActionOrchestrator, ChainAuthority, Ledger,
    LedgerStore, LedgerSynchronizer, Reconciler, SessionEngine,
};
pub use types::{
    AccountSession, ActionKind, ActionPhase, Address, AuthorityError, Capability, EngineError,
    LedgerEntry, LedgerKind, PendingAction, Receipt, Snapshot, StoreError, TxHash,
    WriteCredential,
};
