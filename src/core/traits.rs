//! Trait seams to the external collaborators
//!
//! The engine never talks to a real chain or storage service directly; it
//! goes through these traits so tests can inject programmable fakes and the
//! boundary can plug in its RPC/storage clients.

use crate::types::{Address, AuthorityError, LedgerEntry, Receipt, StoreError};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::broadcast;

/// The blockchain read/write authority (the on-chain contract)
///
/// Read accessors fail independently; the snapshot reader degrades each
/// failed field to its neutral default. Write operations settle into a
/// [`Receipt`] or fail with a transport/rejection/revert error; the engine
/// imposes no timeout of its own on the confirmation wait.
#[async_trait]
pub trait ChainAuthority: Send + Sync {
    /// Total value locked in the protocol
    async fn protocol_tvl(&self) -> Result<Decimal, AuthorityError>;

    /// Gas-sponsorship tank balance for an account
    async fn gas_tank(&self, account: &Address) -> Result<Decimal, AuthorityError>;

    /// Tax reserve balance for an account
    async fn tax_vault(&self, account: &Address) -> Result<Decimal, AuthorityError>;

    /// Next stream id (proxy for the active-stream count)
    async fn next_stream_id(&self) -> Result<u64, AuthorityError>;

    /// The contract owner address
    async fn owner(&self) -> Result<Address, AuthorityError>;

    /// Whether the protocol is paused
    async fn is_paused(&self) -> Result<bool, AuthorityError>;

    /// Push a one-off bonus into an existing stream
    async fn push_bonus(
        &self,
        stream_id: u64,
        amount: Decimal,
        gas_limit: u64,
    ) -> Result<Receipt, AuthorityError>;

    /// Fund the employer gas-sponsorship tank
    async fn fund_gas_tank(&self, amount: Decimal, gas_limit: u64)
        -> Result<Receipt, AuthorityError>;

    /// Create and fund a batch of salary streams
    async fn create_batch_streams(
        &self,
        recipients: Vec<Address>,
        rates: Vec<Decimal>,
        cliffs: Vec<u64>,
        deposits: Vec<Decimal>,
        gas_limit: u64,
    ) -> Result<Receipt, AuthorityError>;

    /// Claim accrued earnings from a stream
    async fn claim_funds(&self, stream_id: u64, gas_limit: u64) -> Result<Receipt, AuthorityError>;

    /// Toggle the protocol pause flag
    async fn toggle_pause(&self, gas_limit: u64) -> Result<Receipt, AuthorityError>;
}

/// The ledger storage/query service
///
/// Supports a filtered, ordered, limited history read, a single-entry
/// insert, and a subscribe-to-inserts feed. Dropping the returned receiver
/// is the unsubscribe.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// The most recent `limit` entries for `account`, ordered by descending
    /// block height
    async fn recent_for_account(
        &self,
        account: &Address,
        limit: usize,
    ) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Append one entry to the ledger table
    async fn insert(&self, entry: LedgerEntry) -> Result<(), StoreError>;

    /// Live feed of every insert into the ledger table, unfiltered
    ///
    /// The synchronizer filters by account on its side; events for other
    /// accounts are expected and silently dropped.
    fn subscribe_inserts(&self) -> broadcast::Receiver<LedgerEntry>;
}
