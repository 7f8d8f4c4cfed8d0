//! Ledger entry types for the PayStream Engine
//!
//! This module defines the immutable event records that make up the
//! per-account protocol ledger. Entries arrive from two feeds (historical
//! backfill and live push) and are keyed by transaction hash.

use super::session::Address;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique transaction hash, the deduplication key of the ledger
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    pub fn new(raw: impl Into<String>) -> Self {
        TxHash(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TxHash {
    fn from(raw: &str) -> Self {
        TxHash::new(raw)
    }
}

/// Semantic kind of a ledger event
///
/// A closed enumeration: adding a new protocol event is a compile-time
/// checked change, not a new magic string. The serialized labels are the
/// canonical wire names used by the ledger storage service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerKind {
    /// A new salary stream was created and funded
    #[serde(rename = "New Stream Created")]
    StreamCreated,

    /// A one-off performance bonus was pushed into a stream
    #[serde(rename = "Performance Bonus")]
    Bonus,

    /// The employer gas-sponsorship tank was refilled
    #[serde(rename = "Gas Tank Refill")]
    Refill,

    /// The protocol was paused by the owner
    #[serde(rename = "Emergency Pause")]
    Pause,

    /// The protocol was resumed by the owner
    #[serde(rename = "Protocol Resumed")]
    Resume,

    /// Accrued salary was claimed by the employee
    #[serde(rename = "Salary Withdrawal")]
    Withdrawal,
}

impl LedgerKind {
    /// The canonical wire label for this kind
    pub fn label(&self) -> &'static str {
        match self {
            LedgerKind::StreamCreated => "New Stream Created",
            LedgerKind::Bonus => "Performance Bonus",
            LedgerKind::Refill => "Gas Tank Refill",
            LedgerKind::Pause => "Emergency Pause",
            LedgerKind::Resume => "Protocol Resumed",
            LedgerKind::Withdrawal => "Salary Withdrawal",
        }
    }
}

impl fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One historical or live protocol event
///
/// Immutable once recorded. Block height is the ordering key; the
/// transaction hash is the uniqueness key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// What happened
    pub kind: LedgerKind,

    /// Transaction hash, unique per entry
    pub hash: TxHash,

    /// Block height at which the event was confirmed
    pub block: u64,

    /// Account the event belongs to
    pub account: Address,
}
