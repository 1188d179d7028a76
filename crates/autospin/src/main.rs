use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use ledger::{RpcLedger, parse_units};
use tracing::info;
use tracing_subscriber::prelude::*;

use autospin::{FeeEstimator, SpinConfig, SpinScheduler, StateStore, SystemClock};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let config = SpinConfig::parse();

    let fees = FeeEstimator::from_overrides(
        config.max_fee_gwei.as_deref(),
        config.priority_fee_gwei.as_deref(),
    )
    .context("invalid fee override")?;
    let value = parse_units(&config.spin_amount, config.token_decimals)
        .context("invalid spin amount")?;

    let client = RpcLedger::new(
        &config.rpc_url,
        Duration::from_millis(config.receipt_poll_ms),
    );
    let store = StateStore::new(config.state_file);

    info!(
        endpoint = %config.rpc_url,
        contract = %config.contract,
        interval_ms = config.interval_ms,
        "starting autospin"
    );

    let scheduler = SpinScheduler::new(
        client,
        SystemClock,
        store,
        fees,
        config.account,
        config.contract,
        value,
        Duration::from_millis(config.interval_ms),
        config.chain_id,
    );

    scheduler.run().await?;
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::layer())
        .try_init();
}
