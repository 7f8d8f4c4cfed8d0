//! Action-related types for the PayStream Engine
//!
//! This module defines the write actions the orchestrator can submit to the
//! authority, the phases an in-flight action moves through, and the
//! confirmation receipt returned by the authority.

use super::ledger::TxHash;
use std::fmt;

/// State-changing request kinds
///
/// Each kind maps to exactly one authority write operation and, on
/// confirmation, exactly one ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Push a one-off bonus into an existing stream
    Bonus,
    /// Refill the employer gas-sponsorship tank
    Refill,
    /// Create and fund a new salary stream
    CreateStream,
    /// Claim accrued earnings from a stream
    Claim,
    /// Toggle the protocol pause flag
    TogglePause,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::Bonus => "bonus",
            ActionKind::Refill => "gas refill",
            ActionKind::CreateStream => "stream creation",
            ActionKind::Claim => "claim",
            ActionKind::TogglePause => "pause toggle",
        };
        f.write_str(name)
    }
}

/// Phase of an in-flight action
///
/// Transitions: Submitting -> AwaitingConfirmation -> Recording, then the
/// pending record is dropped and the engine performs the reconciliation
/// refresh. A failed submission drops the record immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    Submitting,
    AwaitingConfirmation,
    Recording,
}

/// Transient record of an in-flight write action
///
/// Exists only between submission and confirmation or failure; never
/// persisted. The display layer reads these to disable double-submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAction {
    pub kind: ActionKind,
    /// Stream the action targets, for the per-stream actions
    pub stream_id: Option<u64>,
    pub phase: ActionPhase,
}

/// Confirmation returned by the authority for a settled write
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    /// Hash of the confirmed transaction
    pub hash: TxHash,
    /// Block height the transaction was included at
    pub block: u64,
}
