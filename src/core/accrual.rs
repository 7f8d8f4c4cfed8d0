//! Accrual simulator
//!
//! Advances a locally displayed balance on a fixed wall-clock tick,
//! independent of network latency, so the number keeps growing between
//! infrequent authoritative snapshots. The per-second rate is distributed
//! evenly across the ticks of one second.
//!
//! Emission is two-phase: the tick task commits its new balance first and
//! only then hands the value to the subscriber through a channel, so a slow
//! subscriber can never observe a value mid-computation.

use rust_decimal::Decimal;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

/// Displayed values are formatted with 8 decimal places at the boundary
const DISPLAY_SCALE: u32 = 8;

/// Baseline of the simulated accrual
///
/// Between reseeds the displayed balance is
/// `baseline + rate * elapsed_seconds`; monotonically non-decreasing while
/// the rate is non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccrualState {
    /// Balance the simulation restarted from
    pub baseline: Decimal,
    /// Accrual rate per second
    pub rate: Decimal,
}

/// Fixed-period balance ticker
///
/// Owns one spawned tick task at a time. Reseeding replaces the task with a
/// fresh one bound to the new baseline and rate; the old timer is aborted
/// first, so a replaced or dropped simulator never leaks a periodic timer.
#[derive(Debug)]
pub struct AccrualSimulator {
    tick_period: Duration,
    ticks_per_second: u32,
    state: AccrualState,
    tick_tx: mpsc::UnboundedSender<Decimal>,
    task: Option<JoinHandle<()>>,
}

impl AccrualSimulator {
    /// Start simulating from `baseline` at `rate` per second
    ///
    /// Emits the baseline itself immediately (the value visible right after
    /// a reseed is exactly the baseline, with no residual interpolation),
    /// then one incremented value per tick.
    pub fn start(
        tick_period: Duration,
        ticks_per_second: u32,
        baseline: Decimal,
        rate: Decimal,
        tick_tx: mpsc::UnboundedSender<Decimal>,
    ) -> Self {
        let mut simulator = AccrualSimulator {
            tick_period,
            ticks_per_second,
            state: AccrualState { baseline, rate },
            tick_tx,
            task: None,
        };
        simulator.spawn_task();
        simulator
    }

    /// Replace the baseline and rate
    ///
    /// The previous timer is cancelled and a fresh one starts from the new
    /// values. No interpolation across the reseed: the visible number may
    /// jump.
    pub fn reseed(&mut self, baseline: Decimal, rate: Decimal) {
        self.stop();
        self.state = AccrualState { baseline, rate };
        self.spawn_task();
    }

    /// Cancel the tick task; no further values are emitted
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Whether the tick task is live
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// The current baseline and rate
    pub fn state(&self) -> AccrualState {
        self.state
    }

    fn spawn_task(&mut self) {
        let AccrualState { baseline, rate } = self.state;
        let per_tick = rate / Decimal::from(self.ticks_per_second);
        let tick_period = self.tick_period;
        let tick_tx = self.tick_tx.clone();

        self.task = Some(tokio::spawn(async move {
            if tick_tx.send(baseline.round_dp(DISPLAY_SCALE)).is_err() {
                return;
            }
            let mut ticker = time::interval_at(Instant::now() + tick_period, tick_period);
            let mut displayed = baseline;
            loop {
                ticker.tick().await;
                displayed += per_tick;
                // Commit, then publish: the subscriber only ever sees a
                // fully computed value, delivered on its own task.
                if tick_tx.send(displayed.round_dp(DISPLAY_SCALE)).is_err() {
                    break;
                }
            }
        }));
    }
}

impl Drop for AccrualSimulator {
    fn drop(&mut self) {
        self.stop();
    }
}
