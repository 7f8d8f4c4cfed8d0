//! Programmable fakes for the blockchain authority and the ledger store
//!
//! The mock authority lets tests fail individual read accessors (to observe
//! snapshot degradation), fail writes (to observe action aborts), delay
//! claims (to observe the per-stream in-flight guard), and inspect the gas
//! ceiling every write was submitted with. The mock store echoes every
//! insert onto its broadcast feed, matching the real storage service's
//! insert-event stream.

use async_trait::async_trait;
use paystream_engine::{
    Address, AuthorityError, ChainAuthority, LedgerEntry, LedgerStore, Receipt, StoreError, TxHash,
};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::broadcast;

#[derive(Default)]
pub struct MockAuthority {
    pub tvl: Mutex<Decimal>,
    pub gas_tank: Mutex<Decimal>,
    pub tax_vault: Mutex<Decimal>,
    pub next_stream_id: Mutex<u64>,
    pub owner: Mutex<Option<Address>>,
    pub paused: Mutex<bool>,

    pub fail_tvl: AtomicBool,
    pub fail_gas_tank: AtomicBool,
    pub fail_owner: AtomicBool,
    pub fail_writes: AtomicBool,
    pub delay_claims: AtomicBool,

    pub tvl_reads: AtomicUsize,
    /// (action name, gas limit) for every write submitted
    pub writes: Mutex<Vec<(&'static str, u64)>>,

    /// Receipts handed out in order; generated ones follow when exhausted
    pub receipts: Mutex<VecDeque<Receipt>>,
    generated: AtomicU64,
}

impl MockAuthority {
    pub fn new(tvl: &str, owner: &str) -> Self {
        let authority = MockAuthority::default();
        *authority.tvl.lock().unwrap() = tvl.parse().unwrap();
        *authority.owner.lock().unwrap() = Some(Address::new(owner));
        *authority.next_stream_id.lock().unwrap() = 1;
        authority
    }

    pub fn queue_receipt(&self, hash: &str, block: u64) {
        self.receipts.lock().unwrap().push_back(Receipt {
            hash: TxHash::new(hash),
            block,
        });
    }

    pub fn set_tvl(&self, tvl: &str) {
        *self.tvl.lock().unwrap() = tvl.parse().unwrap();
    }

    pub fn writes(&self) -> Vec<(&'static str, u64)> {
        self.writes.lock().unwrap().clone()
    }

    async fn write(&self, name: &'static str, gas_limit: u64) -> Result<Receipt, AuthorityError> {
        self.writes.lock().unwrap().push((name, gas_limit));
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AuthorityError::reverted("forced failure"));
        }
        if name == "claim_funds" && self.delay_claims.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
        let receipt = self.receipts.lock().unwrap().pop_front();
        Ok(receipt.unwrap_or_else(|| {
            let n = self.generated.fetch_add(1, Ordering::SeqCst);
            Receipt {
                hash: TxHash::new(format!("0xgen{n}")),
                block: 1000 + n,
            }
        }))
    }
}

#[async_trait]
impl ChainAuthority for MockAuthority {
    async fn protocol_tvl(&self) -> Result<Decimal, AuthorityError> {
        self.tvl_reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_tvl.load(Ordering::SeqCst) {
            return Err(AuthorityError::transport("tvl unavailable"));
        }
        Ok(*self.tvl.lock().unwrap())
    }

    async fn gas_tank(&self, _account: &Address) -> Result<Decimal, AuthorityError> {
        if self.fail_gas_tank.load(Ordering::SeqCst) {
            return Err(AuthorityError::transport("gas tank unavailable"));
        }
        Ok(*self.gas_tank.lock().unwrap())
    }

    async fn tax_vault(&self, _account: &Address) -> Result<Decimal, AuthorityError> {
        Ok(*self.tax_vault.lock().unwrap())
    }

    async fn next_stream_id(&self) -> Result<u64, AuthorityError> {
        Ok(*self.next_stream_id.lock().unwrap())
    }

    async fn owner(&self) -> Result<Address, AuthorityError> {
        if self.fail_owner.load(Ordering::SeqCst) {
            return Err(AuthorityError::transport("owner unavailable"));
        }
        self.owner
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| AuthorityError::transport("owner unset"))
    }

    async fn is_paused(&self) -> Result<bool, AuthorityError> {
        Ok(*self.paused.lock().unwrap())
    }

    async fn push_bonus(
        &self,
        _stream_id: u64,
        _amount: Decimal,
        gas_limit: u64,
    ) -> Result<Receipt, AuthorityError> {
        self.write("push_bonus", gas_limit).await
    }

    async fn fund_gas_tank(
        &self,
        _amount: Decimal,
        gas_limit: u64,
    ) -> Result<Receipt, AuthorityError> {
        self.write("fund_gas_tank", gas_limit).await
    }

    async fn create_batch_streams(
        &self,
        _recipients: Vec<Address>,
        _rates: Vec<Decimal>,
        _cliffs: Vec<u64>,
        _deposits: Vec<Decimal>,
        gas_limit: u64,
    ) -> Result<Receipt, AuthorityError> {
        self.write("create_batch_streams", gas_limit).await
    }

    async fn claim_funds(&self, _stream_id: u64, gas_limit: u64) -> Result<Receipt, AuthorityError> {
        self.write("claim_funds", gas_limit).await
    }

    async fn toggle_pause(&self, gas_limit: u64) -> Result<Receipt, AuthorityError> {
        self.write("toggle_pause", gas_limit).await
    }
}

pub struct MockStore {
    pub rows: Mutex<Vec<LedgerEntry>>,
    pub fail_backfill: AtomicBool,
    pub insert_count: AtomicUsize,
    inserts: broadcast::Sender<LedgerEntry>,
}

impl MockStore {
    pub fn new() -> Self {
        let (inserts, _) = broadcast::channel(64);
        MockStore {
            rows: Mutex::new(Vec::new()),
            fail_backfill: AtomicBool::new(false),
            insert_count: AtomicUsize::new(0),
            inserts,
        }
    }

    pub fn seed(&self, entries: Vec<LedgerEntry>) {
        self.rows.lock().unwrap().extend(entries);
    }

    /// Push an insert event without persisting, as if another client wrote
    pub fn push_event(&self, entry: LedgerEntry) {
        let _ = self.inserts.send(entry);
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerStore for MockStore {
    async fn recent_for_account(
        &self,
        account: &Address,
        limit: usize,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        if self.fail_backfill.load(Ordering::SeqCst) {
            return Err(StoreError::query("backfill unavailable"));
        }
        let mut matching: Vec<LedgerEntry> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| &entry.account == account)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.block.cmp(&a.block));
        matching.truncate(limit);
        Ok(matching)
    }

    async fn insert(&self, entry: LedgerEntry) -> Result<(), StoreError> {
        self.insert_count.fetch_add(1, Ordering::SeqCst);
        self.rows.lock().unwrap().push(entry.clone());
        // Echo to subscribers, like the real insert-event stream.
        let _ = self.inserts.send(entry);
        Ok(())
    }

    fn subscribe_inserts(&self) -> broadcast::Receiver<LedgerEntry> {
        self.inserts.subscribe()
    }
}
