//! Session engine
//!
//! Wires the five components into one explicit session lifecycle: connect
//! fetches the first snapshot, seeds the reconciler, starts the accrual
//! ticker, backfills the ledger and opens the live subscription; disconnect
//! cancels every timer and subscription and clears all derived state.
//! Reconnecting (same or different account) is a strictly separate
//! lifecycle with no state bleed.

use crate::config::EngineConfig;
use crate::core::accrual::AccrualSimulator;
use crate::core::ledger_sync::LedgerSynchronizer;
use crate::core::orchestrator::ActionOrchestrator;
use crate::core::reconcile::Reconciler;
use crate::core::snapshot::fetch_snapshot;
use crate::core::traits::{ChainAuthority, LedgerStore};
use crate::types::{
    AccountSession, Address, EngineError, LedgerEntry, PendingAction, Receipt, Snapshot,
    WriteCredential,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::info;

/// Everything owned by one connected account, destroyed together
struct ActiveSession {
    session: AccountSession,
    snapshot: Snapshot,
    reconciler: Arc<Reconciler>,
    simulator: AccrualSimulator,
    synchronizer: LedgerSynchronizer,
    /// Forwards simulator ticks into the reconciler
    tick_pump: JoinHandle<()>,
}

/// Real-time balance accrual and ledger synchronization engine
///
/// Owned by the boundary (the display layer drives it); all state lives in
/// the current session and is dropped on disconnect.
pub struct SessionEngine<A, S> {
    authority: Arc<A>,
    store: Arc<S>,
    config: EngineConfig,
    orchestrator: ActionOrchestrator<A, S>,
    active: Option<ActiveSession>,
}

impl<A, S> SessionEngine<A, S>
where
    A: ChainAuthority + 'static,
    S: LedgerStore + 'static,
{
    pub fn new(authority: Arc<A>, store: Arc<S>, config: EngineConfig) -> Self {
        let orchestrator = ActionOrchestrator::new(
            Arc::clone(&authority),
            Arc::clone(&store),
            config.gas.clone(),
        );
        SessionEngine {
            authority,
            store,
            config,
            orchestrator,
            active: None,
        }
    }

    /// Connect an account and bring every component up
    ///
    /// An existing session is torn down first. Snapshot degradation and a
    /// failed backfill are recovered locally; connect itself cannot fail.
    pub async fn connect(&mut self, address: Address, credential: Option<WriteCredential>) {
        self.disconnect();
        info!(account = %address, "connecting session");

        let mut session = AccountSession::new(address, credential);
        let snapshot = fetch_snapshot(self.authority.as_ref(), &session.address).await;
        session.capability = snapshot.capability_for(&session.address);

        let reconciler = Arc::new(Reconciler::new());
        reconciler.apply_snapshot(&snapshot);

        let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
        let tick_pump = {
            let reconciler = Arc::clone(&reconciler);
            tokio::spawn(async move {
                while let Some(value) = tick_rx.recv().await {
                    reconciler.apply_tick(value);
                }
            })
        };

        let simulator = AccrualSimulator::start(
            self.config.tick_period,
            self.config.ticks_per_second,
            snapshot.tvl,
            self.display_rate(&snapshot),
            tick_tx,
        );

        let mut synchronizer = LedgerSynchronizer::new(self.config.ledger_depth);
        synchronizer
            .backfill(
                self.store.as_ref(),
                &session.address,
                self.config.ledger_depth,
            )
            .await;
        synchronizer.subscribe(self.store.subscribe_inserts(), session.address.clone());

        self.active = Some(ActiveSession {
            session,
            snapshot,
            reconciler,
            simulator,
            synchronizer,
            tick_pump,
        });
    }

    /// Tear the session down: stop the timer, release the subscription,
    /// clear snapshot/ledger/accrual state
    ///
    /// Idempotent; no component emits anything after this returns.
    pub fn disconnect(&mut self) {
        if let Some(mut active) = self.active.take() {
            info!(account = %active.session.address, "disconnecting session");
            active.simulator.stop();
            active.tick_pump.abort();
            active.synchronizer.release();
            active.synchronizer.clear();
        }
    }

    /// Re-read the authority and reconcile
    ///
    /// Re-derives the session capability and applies the fresh snapshot to
    /// the reconciler. The simulator is reseeded only when the baseline or
    /// the rate actually changed; an unchanged snapshot leaves the current
    /// tick sequence running so the displayed balance never snaps backwards.
    pub async fn refresh(&mut self) -> Result<(), EngineError> {
        let address = match &self.active {
            Some(active) => active.session.address.clone(),
            None => return Err(EngineError::NotConnected),
        };
        let snapshot = fetch_snapshot(self.authority.as_ref(), &address).await;
        let rate = self.display_rate(&snapshot);

        let active = self.active.as_mut().ok_or(EngineError::NotConnected)?;
        active.session.capability = snapshot.capability_for(&active.session.address);
        let rebaselined = active.reconciler.apply_snapshot(&snapshot);
        if rebaselined || rate != active.simulator.state().rate {
            active.simulator.reseed(snapshot.tvl, rate);
        }
        active.snapshot = snapshot;
        Ok(())
    }

    /// Push a one-off bonus into `stream_id`
    ///
    /// Returns `Ok(None)` when no session or no write credential is present
    /// (nothing to do without a wallet). On confirmation the ledger entry is
    /// recorded before the reconciliation refresh runs.
    pub async fn push_bonus(
        &mut self,
        stream_id: u64,
        amount: Decimal,
    ) -> Result<Option<Receipt>, EngineError> {
        let receipt = {
            let Some(active) = &self.active else {
                return Ok(None);
            };
            self.orchestrator
                .push_bonus(&active.session, &active.synchronizer, stream_id, amount)
                .await?
        };
        self.reconcile_after(receipt).await
    }

    /// Refill the employer gas-sponsorship tank
    pub async fn refill_gas_tank(
        &mut self,
        amount: Decimal,
    ) -> Result<Option<Receipt>, EngineError> {
        let receipt = {
            let Some(active) = &self.active else {
                return Ok(None);
            };
            self.orchestrator
                .refill_gas_tank(&active.session, &active.synchronizer, amount)
                .await?
        };
        self.reconcile_after(receipt).await
    }

    /// Create and fund a salary stream for `recipient`
    pub async fn create_stream(
        &mut self,
        recipient: Address,
        total: Decimal,
    ) -> Result<Option<Receipt>, EngineError> {
        let receipt = {
            let Some(active) = &self.active else {
                return Ok(None);
            };
            self.orchestrator
                .create_stream(&active.session, &active.synchronizer, recipient, total)
                .await?
        };
        self.reconcile_after(receipt).await
    }

    /// Claim accrued earnings from `stream_id`
    ///
    /// Rejected with [`EngineError::ClaimInFlight`] while a claim for the
    /// same stream is outstanding.
    pub async fn claim(&mut self, stream_id: u64) -> Result<Option<Receipt>, EngineError> {
        let receipt = {
            let Some(active) = &self.active else {
                return Ok(None);
            };
            self.orchestrator
                .claim(&active.session, &active.synchronizer, stream_id)
                .await?
        };
        self.reconcile_after(receipt).await
    }

    /// Toggle the protocol pause flag
    pub async fn toggle_pause(&mut self) -> Result<Option<Receipt>, EngineError> {
        let receipt = {
            let Some(active) = &self.active else {
                return Ok(None);
            };
            self.orchestrator
                .toggle_pause(
                    &active.session,
                    &active.synchronizer,
                    active.snapshot.paused,
                )
                .await?
        };
        self.reconcile_after(receipt).await
    }

    /// The connected session, if any
    pub fn session(&self) -> Option<&AccountSession> {
        self.active.as_ref().map(|active| &active.session)
    }

    /// The latest authoritative snapshot
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.active.as_ref().map(|active| &active.snapshot)
    }

    /// Ledger entries, most-recent-first (empty when disconnected)
    pub fn ledger_entries(&self) -> Vec<LedgerEntry> {
        self.active
            .as_ref()
            .map(|active| active.synchronizer.entries())
            .unwrap_or_default()
    }

    /// Subscribe to the live balance
    pub fn live_balance(&self) -> Option<watch::Receiver<Decimal>> {
        self.active
            .as_ref()
            .map(|active| active.reconciler.subscribe())
    }

    /// The most recently published live balance
    pub fn live_balance_now(&self) -> Decimal {
        self.active
            .as_ref()
            .map(|active| active.reconciler.live_balance())
            .unwrap_or_default()
    }

    /// Actions currently in flight
    pub fn pending_actions(&self) -> Vec<PendingAction> {
        self.orchestrator.pending_actions()
    }

    /// Whether a claim for `stream_id` is outstanding
    pub fn claim_pending(&self, stream_id: u64) -> bool {
        self.orchestrator.claim_pending(stream_id)
    }

    /// Teardown hook: live timers/subscriptions/pumps held by the session
    ///
    /// Zero after disconnect; three while a session is healthy.
    pub fn active_task_count(&self) -> usize {
        self.active
            .as_ref()
            .map(|active| {
                usize::from(active.simulator.is_running())
                    + usize::from(!active.tick_pump.is_finished())
                    + usize::from(active.synchronizer.has_feed())
            })
            .unwrap_or(0)
    }

    fn display_rate(&self, snapshot: &Snapshot) -> Decimal {
        if snapshot.active_streams > 0 {
            self.config.display_rate
        } else {
            Decimal::ZERO
        }
    }

    /// Confirmed actions cascade into a snapshot refresh; no-ops do not
    async fn reconcile_after(
        &mut self,
        receipt: Option<Receipt>,
    ) -> Result<Option<Receipt>, EngineError> {
        if receipt.is_some() {
            self.refresh().await?;
        }
        Ok(receipt)
    }
}

impl<A, S> Drop for SessionEngine<A, S> {
    fn drop(&mut self) {
        if let Some(mut active) = self.active.take() {
            active.simulator.stop();
            active.tick_pump.abort();
            active.synchronizer.release();
        }
    }
}
