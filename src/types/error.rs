//! Error types for the PayStream Engine
//!
//! This module defines the error taxonomy of the core:
//!
//! - **Read degradation** (a snapshot field fetch fails) is recovered locally
//!   and never appears here; the reader substitutes neutral defaults.
//! - **Backfill failure** and **foreign subscription events** are recovered
//!   locally by the ledger synchronizer.
//! - **Write failure** is surfaced to the caller as [`EngineError`] so the
//!   boundary can offer an explicit resubmit; there is no in-core retry.
//!
//! Nothing in this crate is fatal to the process: the worst outcome is a
//! degraded or empty view.

use super::action::ActionKind;
use thiserror::Error;

/// Failure reported by the blockchain authority
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthorityError {
    /// Transport-level failure reaching the authority
    #[error("transport error: {message}")]
    Transport {
        /// Description of the transport failure
        message: String,
    },

    /// The authority rejected the submission outright
    #[error("submission rejected: {reason}")]
    Rejected {
        /// Rejection reason as reported by the authority
        reason: String,
    },

    /// The call was included but reverted on-chain
    #[error("call reverted: {reason}")]
    Reverted {
        /// Revert reason as reported by the authority
        reason: String,
    },
}

impl AuthorityError {
    /// Create a Transport error
    pub fn transport(message: impl Into<String>) -> Self {
        AuthorityError::Transport {
            message: message.into(),
        }
    }

    /// Create a Rejected error
    pub fn rejected(reason: impl Into<String>) -> Self {
        AuthorityError::Rejected {
            reason: reason.into(),
        }
    }

    /// Create a Reverted error
    pub fn reverted(reason: impl Into<String>) -> Self {
        AuthorityError::Reverted {
            reason: reason.into(),
        }
    }
}

/// Failure reported by the ledger storage service
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// A filtered history query failed
    #[error("ledger query failed: {message}")]
    Query {
        /// Description of the query failure
        message: String,
    },

    /// An insert failed
    #[error("ledger insert failed: {message}")]
    Insert {
        /// Description of the insert failure
        message: String,
    },
}

impl StoreError {
    /// Create a Query error
    pub fn query(message: impl Into<String>) -> Self {
        StoreError::Query {
            message: message.into(),
        }
    }

    /// Create an Insert error
    pub fn insert(message: impl Into<String>) -> Self {
        StoreError::Insert {
            message: message.into(),
        }
    }
}

/// Errors surfaced to the caller of the engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// The operation requires a connected session
    #[error("no session connected")]
    NotConnected,

    /// A write action failed during submission or confirmation
    ///
    /// The action was aborted: no ledger entry was written and no
    /// reconciliation was forced. The caller must resubmit explicitly.
    #[error("{kind} action failed: {source}")]
    ActionFailed {
        /// Which action failed
        kind: ActionKind,
        /// The underlying authority failure
        #[source]
        source: AuthorityError,
    },

    /// A claim for this stream is already awaiting confirmation
    ///
    /// No second submission is accepted for the same stream while the first
    /// is outstanding. Claims for other streams proceed independently.
    #[error("claim for stream {stream_id} already in flight")]
    ClaimInFlight {
        /// The contested stream id
        stream_id: u64,
    },
}

impl EngineError {
    /// Create an ActionFailed error
    pub fn action_failed(kind: ActionKind, source: AuthorityError) -> Self {
        EngineError::ActionFailed { kind, source }
    }

    /// Create a ClaimInFlight error
    pub fn claim_in_flight(stream_id: u64) -> Self {
        EngineError::ClaimInFlight { stream_id }
    }
}
