//! Engine configuration
//!
//! Environment details (endpoint URL, contract identifier) and the timing
//! constants of the accrual simulation are injected here; nothing is read
//! from disk or the command line.

use rust_decimal::Decimal;
use std::time::Duration;

/// Per-action resource ceilings (gas limit analogs)
///
/// Sized for the expected complexity of each call: batched stream creation
/// is the heaviest, a pause toggle the lightest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GasCeilings {
    pub bonus: u64,
    pub refill: u64,
    pub create_stream: u64,
    pub claim: u64,
    pub toggle_pause: u64,
}

impl Default for GasCeilings {
    fn default() -> Self {
        GasCeilings {
            bonus: 300_000,
            refill: 300_000,
            create_stream: 800_000,
            claim: 500_000,
            toggle_pause: 200_000,
        }
    }
}

/// Configuration for the accrual and ledger-synchronization engine
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// RPC endpoint of the blockchain authority
    pub rpc_endpoint: String,

    /// Address of the payroll-streaming contract
    pub contract_address: String,

    /// Wall-clock period of one accrual tick
    pub tick_period: Duration,

    /// Number of ticks the per-second rate is distributed across
    pub ticks_per_second: u32,

    /// Maximum number of ledger entries kept in memory, most-recent-first
    pub ledger_depth: usize,

    /// Display rate applied while at least one stream is active
    ///
    /// The reference behavior uses this fixed constant instead of reading the
    /// real per-stream rate from the authority; preserved deliberately.
    pub display_rate: Decimal,

    /// Per-action gas ceilings
    pub gas: GasCeilings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            rpc_endpoint: "https://testnet-rpc.helachain.com".to_string(),
            contract_address: String::new(),
            tick_period: Duration::from_millis(50),
            ticks_per_second: 20,
            ledger_depth: 10,
            // 0.005787/sec
            display_rate: Decimal::new(5787, 6),
            gas: GasCeilings::default(),
        }
    }
}
