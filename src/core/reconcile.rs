//! Reconciliation coordinator
//!
//! The sole writer of the live-balance value consumed by dependent views.
//! Between snapshots the number is simulator-driven; the instant a fresh
//! snapshot lands it becomes snapshot-driven. The two writers may race and
//! last-write-wins is accepted: the simulator is immediately reseeded from
//! any fresher value, so no smoothing is needed.

use crate::types::Snapshot;
use rust_decimal::Decimal;
use std::sync::Mutex;
use tokio::sync::watch;

/// Publishes the current live balance to any number of read-only views
#[derive(Debug)]
pub struct Reconciler {
    live: watch::Sender<Decimal>,
    last_tvl: Mutex<Option<Decimal>>,
}

impl Reconciler {
    pub fn new() -> Self {
        let (live, _) = watch::channel(Decimal::ZERO);
        Reconciler {
            live,
            last_tvl: Mutex::new(None),
        }
    }

    /// Subscribe to live-balance updates
    pub fn subscribe(&self) -> watch::Receiver<Decimal> {
        self.live.subscribe()
    }

    /// The most recently published balance
    pub fn live_balance(&self) -> Decimal {
        *self.live.borrow()
    }

    /// Re-baseline from an authoritative snapshot
    ///
    /// Publishes the snapshot's TVL as the new live balance, but only when
    /// that field actually changed since the last snapshot; returns whether
    /// a re-baseline happened. A snapshot arriving mid-tick overrides the
    /// simulator's last emitted value immediately.
    pub fn apply_snapshot(&self, snapshot: &Snapshot) -> bool {
        let mut last_tvl = self.last_tvl.lock().expect("tvl baseline lock poisoned");
        if *last_tvl == Some(snapshot.tvl) {
            return false;
        }
        *last_tvl = Some(snapshot.tvl);
        self.live.send_replace(snapshot.tvl);
        true
    }

    /// Republish a simulator tick as the current live balance
    pub fn apply_tick(&self, value: Decimal) {
        self.live.send_replace(value);
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}
