//! Ledger synchronizer
//!
//! Maintains the ordered, deduplicated, bounded-length event list for the
//! connected account, fed by a one-shot historical backfill and a live
//! insert subscription. Both feeds may deliver the same entry; merging
//! deduplicates by transaction hash.
//!
//! Resource lifetime contract: subscribe-on-connect, unsubscribe on
//! disconnect or account change, never double-subscribe for one account.
//! The subscription task is aborted on release and on drop.

use crate::core::traits::LedgerStore;
use crate::types::{Address, LedgerEntry};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Bounded most-recent-first event list, deduplicated by transaction hash
#[derive(Debug)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
    depth: usize,
}

impl Ledger {
    pub fn new(depth: usize) -> Self {
        Ledger {
            entries: Vec::with_capacity(depth),
            depth,
        }
    }

    /// Merge one entry into the list
    ///
    /// A duplicate hash is ignored (idempotent merge). Otherwise the entry
    /// is inserted keeping block-descending order and the list is truncated
    /// to the configured depth. Returns whether the entry was recorded.
    pub fn record(&mut self, entry: LedgerEntry) -> bool {
        if self.entries.iter().any(|existing| existing.hash == entry.hash) {
            return false;
        }
        let position = self
            .entries
            .iter()
            .position(|existing| existing.block < entry.block)
            .unwrap_or(self.entries.len());
        self.entries.insert(position, entry);
        self.entries.truncate(self.depth);
        true
    }

    /// Entries in most-recent-first order
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Keeps the in-memory ledger consistent with the storage service
#[derive(Debug)]
pub struct LedgerSynchronizer {
    ledger: Arc<Mutex<Ledger>>,
    feed: Option<JoinHandle<()>>,
}

impl LedgerSynchronizer {
    pub fn new(depth: usize) -> Self {
        LedgerSynchronizer {
            ledger: Arc::new(Mutex::new(Ledger::new(depth))),
            feed: None,
        }
    }

    /// One-shot historical backfill for the connected account
    ///
    /// On failure the ledger is left empty: a missing history must not
    /// crash the session.
    pub async fn backfill<S>(&self, store: &S, account: &Address, limit: usize)
    where
        S: LedgerStore + ?Sized,
    {
        match store.recent_for_account(account, limit).await {
            Ok(entries) => {
                let mut ledger = self.lock_ledger();
                for entry in entries {
                    ledger.record(entry);
                }
            }
            Err(err) => {
                warn!(account = %account, error = %err, "ledger backfill failed, starting empty");
            }
        }
    }

    /// Open the live insert subscription for `account`
    ///
    /// Any previous feed is released first, so one synchronizer never holds
    /// two subscriptions. Events for other accounts are silently dropped.
    pub fn subscribe(&mut self, receiver: broadcast::Receiver<LedgerEntry>, account: Address) {
        self.release();
        let ledger = Arc::clone(&self.ledger);
        let mut receiver = receiver;
        self.feed = Some(tokio::spawn(async move {
            loop {
                match receiver.recv().await {
                    Ok(entry) => {
                        if entry.account == account {
                            ledger
                                .lock()
                                .expect("ledger lock poisoned")
                                .record(entry);
                        } else {
                            debug!(
                                event_account = %entry.account,
                                session_account = %account,
                                "dropping insert event for unrelated account"
                            );
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(skipped, "insert feed lagged, events skipped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        }));
    }

    /// Record an entry produced by a just-confirmed local action
    ///
    /// The store's insert echo will arrive through the subscription as well;
    /// hash deduplication makes the echo a no-op.
    pub fn record_local(&self, entry: LedgerEntry) -> bool {
        self.lock_ledger().record(entry)
    }

    /// Current entries, most-recent-first
    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.lock_ledger().entries().to_vec()
    }

    /// Abort the subscription task, if any
    pub fn release(&mut self) {
        if let Some(feed) = self.feed.take() {
            feed.abort();
        }
    }

    /// Whether a live subscription is held
    pub fn has_feed(&self) -> bool {
        self.feed.as_ref().is_some_and(|feed| !feed.is_finished())
    }

    /// Drop all in-memory entries
    pub fn clear(&self) {
        self.lock_ledger().clear();
    }

    fn lock_ledger(&self) -> std::sync::MutexGuard<'_, Ledger> {
        self.ledger.lock().expect("ledger lock poisoned")
    }
}

impl Drop for LedgerSynchronizer {
    fn drop(&mut self) {
        self.release();
    }
}
