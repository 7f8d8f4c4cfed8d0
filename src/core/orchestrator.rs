//! Action orchestrator
//!
//! Submits state-changing requests to the authority and serializes the
//! aftermath per action: exactly one ledger entry per confirmation, recorded
//! strictly before the reconciliation refresh the engine issues next.
//!
//! Every action is a single best-effort attempt. A failure aborts the
//! sequence (no ledger write, no forced reconciliation) and is surfaced to
//! the caller; resubmission is explicit. Actions requested without a write
//! credential are silent no-ops.

use crate::config::GasCeilings;
use crate::core::ledger_sync::LedgerSynchronizer;
use crate::core::traits::{ChainAuthority, LedgerStore};
use crate::types::{
    AccountSession, ActionKind, ActionPhase, Address, EngineError, LedgerEntry, LedgerKind,
    PendingAction, Receipt,
};
use dashmap::{DashMap, DashSet};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Streams vest over 30 days; the reference derives the per-second rate
/// from the funded total over this period.
const STREAM_FUNDING_PERIOD_SECS: u64 = 2_592_000;

/// Cliff parameter used for every stream the dashboard creates
const STREAM_CLIFF: u64 = 10;

/// Per-session write-action coordinator
pub struct ActionOrchestrator<A, S> {
    authority: Arc<A>,
    store: Arc<S>,
    gas: GasCeilings,
    pending: DashMap<u64, PendingAction>,
    next_pending_id: AtomicU64,
    in_flight_claims: DashSet<u64>,
}

/// Removes the pending record on every exit path
struct PendingGuard<'a> {
    pending: &'a DashMap<u64, PendingAction>,
    id: u64,
}

impl PendingGuard<'_> {
    fn set_phase(&self, phase: ActionPhase) {
        if let Some(mut action) = self.pending.get_mut(&self.id) {
            action.phase = phase;
        }
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.pending.remove(&self.id);
    }
}

/// Releases the per-stream claim slot on every exit path
struct ClaimGuard<'a> {
    in_flight: &'a DashSet<u64>,
    stream_id: u64,
}

impl<'a> ClaimGuard<'a> {
    fn try_acquire(in_flight: &'a DashSet<u64>, stream_id: u64) -> Option<Self> {
        if in_flight.insert(stream_id) {
            Some(ClaimGuard {
                in_flight,
                stream_id,
            })
        } else {
            None
        }
    }
}

impl Drop for ClaimGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(&self.stream_id);
    }
}

impl<A, S> ActionOrchestrator<A, S>
where
    A: ChainAuthority,
    S: LedgerStore,
{
    pub fn new(authority: Arc<A>, store: Arc<S>, gas: GasCeilings) -> Self {
        ActionOrchestrator {
            authority,
            store,
            gas,
            pending: DashMap::new(),
            next_pending_id: AtomicU64::new(0),
            in_flight_claims: DashSet::new(),
        }
    }

    /// Push a one-off bonus into `stream_id`
    pub async fn push_bonus(
        &self,
        session: &AccountSession,
        ledger: &LedgerSynchronizer,
        stream_id: u64,
        amount: Decimal,
    ) -> Result<Option<Receipt>, EngineError> {
        if !session.can_write() {
            debug!(kind = %ActionKind::Bonus, "no write credential, skipping");
            return Ok(None);
        }
        let guard = self.begin(ActionKind::Bonus, Some(stream_id));
        guard.set_phase(ActionPhase::AwaitingConfirmation);
        let receipt = self
            .authority
            .push_bonus(stream_id, amount, self.gas.bonus)
            .await
            .map_err(|source| self.fail(ActionKind::Bonus, source))?;
        guard.set_phase(ActionPhase::Recording);
        self.record(&session.address, LedgerKind::Bonus, &receipt).await;
        Ok(Some(self.record_local(ledger, session, LedgerKind::Bonus, receipt)))
    }

    /// Refill the employer gas-sponsorship tank
    pub async fn refill_gas_tank(
        &self,
        session: &AccountSession,
        ledger: &LedgerSynchronizer,
        amount: Decimal,
    ) -> Result<Option<Receipt>, EngineError> {
        if !session.can_write() {
            debug!(kind = %ActionKind::Refill, "no write credential, skipping");
            return Ok(None);
        }
        let guard = self.begin(ActionKind::Refill, None);
        guard.set_phase(ActionPhase::AwaitingConfirmation);
        let receipt = self
            .authority
            .fund_gas_tank(amount, self.gas.refill)
            .await
            .map_err(|source| self.fail(ActionKind::Refill, source))?;
        guard.set_phase(ActionPhase::Recording);
        self.record(&session.address, LedgerKind::Refill, &receipt).await;
        Ok(Some(self.record_local(ledger, session, LedgerKind::Refill, receipt)))
    }

    /// Create and fund one salary stream for `recipient`
    ///
    /// Mirrors the dashboard's batch call with a single element: the
    /// per-second rate is the funded total spread over the 30-day vesting
    /// period.
    pub async fn create_stream(
        &self,
        session: &AccountSession,
        ledger: &LedgerSynchronizer,
        recipient: Address,
        total: Decimal,
    ) -> Result<Option<Receipt>, EngineError> {
        if !session.can_write() {
            debug!(kind = %ActionKind::CreateStream, "no write credential, skipping");
            return Ok(None);
        }
        let guard = self.begin(ActionKind::CreateStream, None);
        guard.set_phase(ActionPhase::AwaitingConfirmation);
        let rate = total / Decimal::from(STREAM_FUNDING_PERIOD_SECS);
        let receipt = self
            .authority
            .create_batch_streams(
                vec![recipient],
                vec![rate],
                vec![STREAM_CLIFF],
                vec![total],
                self.gas.create_stream,
            )
            .await
            .map_err(|source| self.fail(ActionKind::CreateStream, source))?;
        guard.set_phase(ActionPhase::Recording);
        self.record(&session.address, LedgerKind::StreamCreated, &receipt)
            .await;
        Ok(Some(self.record_local(
            ledger,
            session,
            LedgerKind::StreamCreated,
            receipt,
        )))
    }

    /// Claim accrued earnings from `stream_id`
    ///
    /// At most one claim per stream may be outstanding; a concurrent second
    /// claim for the same stream is rejected with
    /// [`EngineError::ClaimInFlight`]. Claims for other streams proceed.
    pub async fn claim(
        &self,
        session: &AccountSession,
        ledger: &LedgerSynchronizer,
        stream_id: u64,
    ) -> Result<Option<Receipt>, EngineError> {
        if !session.can_write() {
            debug!(kind = %ActionKind::Claim, "no write credential, skipping");
            return Ok(None);
        }
        let _claim_slot = ClaimGuard::try_acquire(&self.in_flight_claims, stream_id)
            .ok_or(EngineError::ClaimInFlight { stream_id })?;
        let guard = self.begin(ActionKind::Claim, Some(stream_id));
        guard.set_phase(ActionPhase::AwaitingConfirmation);
        let receipt = self
            .authority
            .claim_funds(stream_id, self.gas.claim)
            .await
            .map_err(|source| self.fail(ActionKind::Claim, source))?;
        guard.set_phase(ActionPhase::Recording);
        self.record(&session.address, LedgerKind::Withdrawal, &receipt)
            .await;
        Ok(Some(self.record_local(
            ledger,
            session,
            LedgerKind::Withdrawal,
            receipt,
        )))
    }

    /// Toggle the protocol pause flag
    ///
    /// `currently_paused` decides the recorded kind: toggling a running
    /// protocol records a pause, toggling a paused one records a resume.
    pub async fn toggle_pause(
        &self,
        session: &AccountSession,
        ledger: &LedgerSynchronizer,
        currently_paused: bool,
    ) -> Result<Option<Receipt>, EngineError> {
        if !session.can_write() {
            debug!(kind = %ActionKind::TogglePause, "no write credential, skipping");
            return Ok(None);
        }
        let guard = self.begin(ActionKind::TogglePause, None);
        guard.set_phase(ActionPhase::AwaitingConfirmation);
        let receipt = self
            .authority
            .toggle_pause(self.gas.toggle_pause)
            .await
            .map_err(|source| self.fail(ActionKind::TogglePause, source))?;
        let kind = if currently_paused {
            LedgerKind::Resume
        } else {
            LedgerKind::Pause
        };
        guard.set_phase(ActionPhase::Recording);
        self.record(&session.address, kind, &receipt).await;
        Ok(Some(self.record_local(ledger, session, kind, receipt)))
    }

    /// Snapshot of every action currently in flight
    pub fn pending_actions(&self) -> Vec<PendingAction> {
        self.pending.iter().map(|entry| entry.value().clone()).collect()
    }

    /// Whether a claim for `stream_id` is outstanding
    pub fn claim_pending(&self, stream_id: u64) -> bool {
        self.in_flight_claims.contains(&stream_id)
    }

    fn begin(&self, kind: ActionKind, stream_id: Option<u64>) -> PendingGuard<'_> {
        let id = self.next_pending_id.fetch_add(1, Ordering::Relaxed);
        self.pending.insert(
            id,
            PendingAction {
                kind,
                stream_id,
                phase: ActionPhase::Submitting,
            },
        );
        PendingGuard {
            pending: &self.pending,
            id,
        }
    }

    fn fail(&self, kind: ActionKind, source: crate::types::AuthorityError) -> EngineError {
        warn!(%kind, error = %source, "action aborted, caller must resubmit");
        EngineError::ActionFailed { kind, source }
    }

    /// Append the confirmation to the ledger storage service
    ///
    /// The chain action already settled; a failed insert degrades the shared
    /// history but never unwinds the action.
    async fn record(&self, account: &Address, kind: LedgerKind, receipt: &Receipt) {
        let entry = LedgerEntry {
            kind,
            hash: receipt.hash.clone(),
            block: receipt.block,
            account: account.clone(),
        };
        if let Err(err) = self.store.insert(entry).await {
            warn!(%kind, hash = %receipt.hash, error = %err, "ledger insert failed after confirmation");
        }
    }

    fn record_local(
        &self,
        ledger: &LedgerSynchronizer,
        session: &AccountSession,
        kind: LedgerKind,
        receipt: Receipt,
    ) -> Receipt {
        ledger.record_local(LedgerEntry {
            kind,
            hash: receipt.hash.clone(),
            block: receipt.block,
            account: session.address.clone(),
        });
        receipt
    }
}
