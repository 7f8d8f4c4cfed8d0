//! Core engine components
//!
//! - `traits` - Seams to the blockchain authority and the ledger store
//! - `snapshot` - Fault-tolerant authoritative snapshot reader
//! - `accrual` - Fixed-tick balance simulator
//! - `reconcile` - Live-balance reconciliation coordinator
//! - `ledger_sync` - Backfill + live-subscription ledger synchronizer
//! - `orchestrator` - Write-action submission and recording
//! - `engine` - Session lifecycle wiring it all together

pub mod accrual;
pub mod engine;
pub mod ledger_sync;
pub mod orchestrator;
pub mod reconcile;
pub mod snapshot;
pub mod traits;

pub use accrual::{AccrualSimulator, AccrualState};
pub use engine::SessionEngine;
pub use ledger_sync::{Ledger, LedgerSynchronizer};
pub use orchestrator::ActionOrchestrator;
pub use reconcile::Reconciler;
pub use snapshot::fetch_snapshot;
pub use traits::{ChainAuthority, LedgerStore};
