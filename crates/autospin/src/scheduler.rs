use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use ledger::types::{Address, CallRequest};
use ledger::LedgerClient;
use tracing::{error, info, warn};

use crate::cost;
use crate::error::{CycleError, FatalError};
use crate::fees::{FeeEstimator, FeePlan};
use crate::state::{ScheduleState, StateStore};

/// Fixed backoff ladder after a failed cycle: 2, 5, then 10 minutes.
pub const RETRY_LADDER: [Duration; 3] = [
    Duration::from_secs(120),
    Duration::from_secs(300),
    Duration::from_secs(600),
];

/// Conservative gas limit used when simulation fails.
pub const FALLBACK_GAS_UNITS: u64 = 340_000;

/// keccak256("startSpin()")[..4]
pub const START_SPIN_SELECTOR: [u8; 4] = [0xac, 0x6b, 0xc8, 0x53];

/// Simulated gas estimates are inflated by 20% (integer truncation) before
/// use; state at send time can differ from state at simulation time.
pub fn inflate_gas(units: u64) -> u64 {
    ((units as u128 * 120) / 100) as u64
}

/// Time source for the scheduler. All suspension points go through this
/// seam so tests can drive the schedule with a virtual clock.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by `SystemTime` and tokio timers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Where the scheduler is in its loop. `Retrying(n)` past the end of the
/// ladder is the explicit "exhausted, next attempt is immediate" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting out the residual interval from a previous run.
    Idle,
    /// Normal cadence: attempt a cycle, then sleep the full interval.
    Cycling,
    /// Inside the backoff ladder after a failure.
    Retrying(usize),
}

/// Orchestrates one cycle (fees, gas, cost check, nonce, submit, finality)
/// and owns the outer cadence loop plus the retry ladder.
pub struct SpinScheduler<L, C> {
    client: L,
    clock: C,
    store: StateStore,
    fees: FeeEstimator,
    account: Address,
    contract: Address,
    value: u128,
    interval: Duration,
    chain_id: u64,
    state: ScheduleState,
    phase: Phase,
}

impl<L: LedgerClient, C: Clock> SpinScheduler<L, C> {
    pub fn new(
        client: L,
        clock: C,
        store: StateStore,
        fees: FeeEstimator,
        account: Address,
        contract: Address,
        value: u128,
        interval: Duration,
        chain_id: u64,
    ) -> Self {
        Self {
            client,
            clock,
            store,
            fees,
            account,
            contract,
            value,
            interval,
            chain_id,
            state: ScheduleState::default(),
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn schedule_state(&self) -> &ScheduleState {
        &self.state
    }

    /// Validate the network identity and load persisted state. A chain-id
    /// mismatch is a configuration error and is never retried.
    pub async fn startup(&mut self) -> Result<(), FatalError> {
        let actual = self.client.chain_id().await.map_err(FatalError::Startup)?;
        if actual != self.chain_id {
            return Err(FatalError::ChainIdMismatch {
                expected: self.chain_id,
                actual,
            });
        }
        info!(chain_id = actual, account = %self.account, "connected");

        self.state = self.store.load();
        if let Some(last_tx) = &self.state.last_tx {
            info!(%last_tx, last_ok_ms = self.state.last_ok_ms, "loaded schedule state");
        }
        self.phase = Phase::Idle;
        Ok(())
    }

    /// Run forever. Only startup errors escape; every cycle failure is
    /// absorbed by the retry ladder.
    pub async fn run(mut self) -> Result<(), FatalError> {
        self.startup().await?;
        loop {
            self.step().await;
        }
    }

    /// Advance the state machine by one transition.
    pub async fn step(&mut self) {
        match self.phase {
            Phase::Idle => {
                let interval_ms = self.interval.as_millis() as u64;
                let elapsed = self.clock.now_ms().saturating_sub(self.state.last_ok_ms);
                if self.state.last_ok_ms > 0 && elapsed < interval_ms {
                    let wait = interval_ms - elapsed;
                    info!(wait_ms = wait, "resuming previous cadence");
                    self.clock.sleep(Duration::from_millis(wait)).await;
                }
                self.phase = Phase::Cycling;
            }
            Phase::Cycling => {
                info!("starting spin cycle");
                match self.run_cycle().await {
                    Ok(tx_hash) => self.settle_success(tx_hash).await,
                    Err(err) => {
                        warn!(error = %err, "cycle failed, entering retry ladder");
                        self.phase = Phase::Retrying(0);
                    }
                }
            }
            Phase::Retrying(attempt) if attempt < RETRY_LADDER.len() => {
                let delay = RETRY_LADDER[attempt];
                info!(
                    attempt = attempt + 1,
                    delay_secs = delay.as_secs(),
                    "retrying after backoff"
                );
                self.clock.sleep(delay).await;
                match self.run_cycle().await {
                    Ok(tx_hash) => self.settle_success(tx_hash).await,
                    Err(err) => {
                        warn!(error = %err, attempt = attempt + 1, "retry failed");
                        self.phase = Phase::Retrying(attempt + 1);
                    }
                }
            }
            Phase::Retrying(_) => {
                // Ladder exhausted. The next attempt is immediate with no
                // further delay; if the failure is persistent this spins
                // through the ladder again back-to-back.
                warn!("retry ladder exhausted, attempting next cycle immediately");
                self.phase = Phase::Cycling;
            }
        }
    }

    /// One guarded attempt: price the call, size it, verify funds, sequence
    /// it, submit it, and wait for finality.
    pub async fn run_cycle(&self) -> Result<String, CycleError> {
        let signals = self.client.fee_signals().await.map_err(CycleError::Fetch)?;
        let plan = self.fees.plan(&signals)?;

        let mut call = self.call_request(&plan);
        let gas_limit = match self.client.simulate(&call).await {
            Ok(units) => inflate_gas(units),
            Err(err) => {
                // Simulation failures are common and often transient; only
                // the cost check or submission may fail the cycle.
                warn!(error = %err, fallback = FALLBACK_GAS_UNITS, "simulation failed, using fallback gas limit");
                FALLBACK_GAS_UNITS
            }
        };
        call.gas = Some(gas_limit);

        let balance = self
            .client
            .balance(&self.account)
            .await
            .map_err(CycleError::Fetch)?;
        let check = cost::check(balance, self.value, gas_limit, plan.max_fee_per_gas);
        if !check.sufficient {
            warn!(
                balance = check.balance,
                required = check.required,
                shortfall = check.shortfall(),
                "balance cannot cover value plus worst-case fee"
            );
            return Err(CycleError::InsufficientFunds {
                balance: check.balance,
                required: check.required,
            });
        }

        let nonce = self
            .client
            .pending_nonce(&self.account)
            .await
            .map_err(CycleError::Fetch)?;
        call.nonce = Some(nonce);

        info!(nonce, gas_limit, "submitting spin call");
        let tx_hash = self
            .client
            .submit(&call)
            .await
            .map_err(CycleError::Submission)?;
        info!(%tx_hash, "submitted, awaiting finality");

        let report = self
            .client
            .await_finality(&tx_hash)
            .await
            .map_err(CycleError::Fetch)?;
        if !report.ok {
            // Mined but failed on-chain: distinct from a submission error.
            return Err(CycleError::Reverted {
                tx_hash: report.tx_hash,
            });
        }

        info!(block = report.block_number, %tx_hash, "spin confirmed");
        Ok(tx_hash)
    }

    /// Persist the success strictly after finality, then sleep the full
    /// interval and resume the normal cadence.
    async fn settle_success(&mut self, tx_hash: String) {
        self.state = ScheduleState {
            last_ok_ms: self.clock.now_ms(),
            last_tx: Some(tx_hash),
        };
        if let Err(err) = self.store.save(&self.state) {
            error!(error = %err, path = %self.store.path().display(), "failed to persist schedule state");
        }
        info!(next_in_ms = self.interval.as_millis() as u64, "cycle complete");
        self.phase = Phase::Cycling;
        self.clock.sleep(self.interval).await;
    }

    fn call_request(&self, plan: &FeePlan) -> CallRequest {
        CallRequest {
            from: self.account,
            to: self.contract,
            value: self.value,
            data: START_SPIN_SELECTOR.to_vec(),
            gas: None,
            max_fee_per_gas: Some(plan.max_fee_per_gas),
            max_priority_fee_per_gas: Some(plan.max_priority_fee_per_gas),
            nonce: None,
        }
    }
}
