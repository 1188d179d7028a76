use std::path::PathBuf;

use clap::Parser;
use ledger::Address;

/// Immutable configuration, constructed once at startup. Every knob can
/// come from the environment; missing mandatory settings are a fatal
/// startup error.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "autospin",
    about = "Submits startSpin() on a fixed cadence with fee and balance guards",
    version
)]
pub struct SpinConfig {
    /// JSON-RPC endpoint of the ledger node
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: String,

    /// Expected chain id; a mismatch aborts startup
    #[arg(long, env = "CHAIN_ID")]
    pub chain_id: u64,

    /// Submitting account (managed by the node's keystore)
    #[arg(long, env = "SPIN_ACCOUNT")]
    pub account: Address,

    /// Spin contract address
    #[arg(long, env = "SPIN_CONTRACT")]
    pub contract: Address,

    /// Optional fee ceiling override, in gwei
    #[arg(long, env = "MAX_FEE_GWEI")]
    pub max_fee_gwei: Option<String>,

    /// Optional priority fee override, in gwei
    #[arg(long, env = "PRIORITY_FEE_GWEI")]
    pub priority_fee_gwei: Option<String>,

    /// Cadence between successful spins, in milliseconds
    #[arg(long, env = "INTERVAL_MS")]
    pub interval_ms: u64,

    /// Value sent with each spin, as a decimal string in token units
    #[arg(long, env = "SPIN_AMOUNT")]
    pub spin_amount: String,

    /// Decimal precision of the spin amount denomination
    #[arg(long, env = "TOKEN_DECIMALS")]
    pub token_decimals: u32,

    /// Where to persist the schedule state
    #[arg(long, env = "STATE_FILE", default_value = "spin-state.json")]
    pub state_file: PathBuf,

    /// Receipt polling interval while waiting for finality, in milliseconds
    #[arg(long, env = "RECEIPT_POLL_MS", default_value_t = 5_000)]
    pub receipt_poll_ms: u64,
}
