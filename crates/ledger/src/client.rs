use async_trait::async_trait;

use crate::LedgerError;
use crate::types::{Address, CallRequest, FeeSignals, FinalityReport};

/// Capability surface the scheduler consumes. Read RPCs plus submission;
/// signing is a capability of the implementation, never of the caller.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Network identity of the connected endpoint.
    async fn chain_id(&self) -> Result<u64, LedgerError>;

    /// Current pricing signals; individual signals may be absent.
    async fn fee_signals(&self) -> Result<FeeSignals, LedgerError>;

    /// Spendable balance of `account` in base units.
    async fn balance(&self, account: &Address) -> Result<u128, LedgerError>;

    /// Pending-inclusive transaction count, so chained submissions do
    /// not collide on a nonce.
    async fn pending_nonce(&self, account: &Address) -> Result<u64, LedgerError>;

    /// Dry-run the call, returning the measured gas units.
    async fn simulate(&self, call: &CallRequest) -> Result<u64, LedgerError>;

    /// Submit the call, returning the transaction hash.
    async fn submit(&self, call: &CallRequest) -> Result<String, LedgerError>;

    /// Block until the transaction is durably included, reporting its
    /// execution status.
    async fn await_finality(&self, tx_hash: &str) -> Result<FinalityReport, LedgerError>;
}
