//! Authoritative snapshot types for the PayStream Engine
//!
//! A snapshot is one point-in-time read of every tracked balance and flag.
//! Snapshots are immutable: a fresh fetch supersedes the previous one, it
//! never mutates it.

use super::session::{Address, Capability};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One authoritative read of the protocol state
///
/// Fetched on connect and after every confirmed write action. Every field is
/// independently fault-tolerant: a failed read leaves the neutral default in
/// place so the remaining fields can still be displayed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Total value locked in the protocol
    pub tvl: Decimal,

    /// Gas-sponsorship tank balance for the connected account
    pub gas_tank: Decimal,

    /// Compliance tax reserve balance for the connected account
    pub tax_vault: Decimal,

    /// Next stream id, used as a proxy for the active-stream count
    pub active_streams: u64,

    /// The contract owner address, if the read succeeded
    pub owner: Option<Address>,

    /// Whether the protocol is paused
    pub paused: bool,
}

impl Snapshot {
    /// Derive the capability a session address holds under this snapshot
    ///
    /// Privileged iff the address equals the owner address; address equality
    /// is case-insensitive.
    pub fn capability_for(&self, address: &Address) -> Capability {
        match &self.owner {
            Some(owner) if owner == address => Capability::Privileged,
            _ => Capability::Ordinary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_matches_owner_case_insensitively() {
        let snapshot = Snapshot {
            owner: Some(Address::new("0xOwNeR")),
            ..Snapshot::default()
        };
        assert_eq!(
            snapshot.capability_for(&Address::new("0xowner")),
            Capability::Privileged
        );
        assert_eq!(
            snapshot.capability_for(&Address::new("0xother")),
            Capability::Ordinary
        );
    }

    #[test]
    fn test_missing_owner_yields_ordinary() {
        let snapshot = Snapshot::default();
        assert_eq!(
            snapshot.capability_for(&Address::new("0xowner")),
            Capability::Ordinary
        );
    }
}
