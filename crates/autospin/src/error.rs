use ledger::LedgerError;
use thiserror::Error;

/// Startup errors. These are configuration problems, not transient
/// conditions, and terminate the process instead of entering the retry
/// ladder.
#[derive(Debug, Error)]
pub enum FatalError {
    #[error("wrong network: node reports chain id {actual}, configured {expected}")]
    ChainIdMismatch { expected: u64, actual: u64 },

    #[error("cannot reach ledger endpoint: {0}")]
    Startup(#[source] LedgerError),
}

/// Why a single cycle failed. Every variant is recoverable and feeds the
/// retry ladder; none terminates the process.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("no fee signal available and no override configured")]
    FeeUnavailable,

    #[error("insufficient funds: balance {balance}, required {required}")]
    InsufficientFunds { balance: u128, required: u128 },

    #[error("read rpc failed: {0}")]
    Fetch(#[source] LedgerError),

    #[error("submission rejected: {0}")]
    Submission(#[source] LedgerError),

    #[error("call reverted on-chain: {tx_hash}")]
    Reverted { tx_hash: String },
}
