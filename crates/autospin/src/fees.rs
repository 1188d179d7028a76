use ledger::types::FeeSignals;
use ledger::{LedgerError, parse_units};
use tracing::warn;

use crate::error::CycleError;

/// Fee overrides are human-denominated gwei strings; one gwei is 1e9 wei.
const GWEI_DECIMALS: u32 = 9;

/// Per-cycle fee ceiling and tip, in wei per gas unit. Derived fresh every
/// cycle and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeePlan {
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
}

/// Resolves a [`FeePlan`] from operator overrides and live signals.
///
/// Resolution order per field: override first, then the live recommended
/// value. A missing priority fee defaults to zero — a tip-less transaction
/// is still valid — but a transaction with no fee ceiling at all cannot be
/// priced, so that case fails the cycle.
#[derive(Debug, Clone, Default)]
pub struct FeeEstimator {
    max_fee_override: Option<u128>,
    priority_fee_override: Option<u128>,
}

impl FeeEstimator {
    /// Parse optional gwei-denominated override strings. Invalid strings
    /// are a configuration problem and surface at startup.
    pub fn from_overrides(
        max_fee_gwei: Option<&str>,
        priority_fee_gwei: Option<&str>,
    ) -> Result<Self, LedgerError> {
        let max_fee_override = max_fee_gwei
            .map(|raw| parse_units(raw, GWEI_DECIMALS))
            .transpose()?;
        let priority_fee_override = priority_fee_gwei
            .map(|raw| parse_units(raw, GWEI_DECIMALS))
            .transpose()?;
        Ok(Self {
            max_fee_override,
            priority_fee_override,
        })
    }

    pub fn plan(&self, signals: &FeeSignals) -> Result<FeePlan, CycleError> {
        let max_priority_fee_per_gas = self
            .priority_fee_override
            .or(signals.priority_fee)
            .unwrap_or(0);

        // The recommended ceiling mirrors what providers hand out for
        // EIP-1559 networks: twice the current base fee plus the tip.
        let recommended = signals
            .base_fee
            .map(|base| base.saturating_mul(2).saturating_add(signals.priority_fee.unwrap_or(0)));

        let max_fee_per_gas = self
            .max_fee_override
            .or(recommended)
            .or(signals.legacy_gas_price)
            .ok_or(CycleError::FeeUnavailable)?;

        if max_fee_per_gas < max_priority_fee_per_gas {
            warn!(
                max_fee_per_gas,
                max_priority_fee_per_gas, "fee ceiling below priority fee; node may reject"
            );
        }

        Ok(FeePlan {
            max_fee_per_gas,
            max_priority_fee_per_gas,
        })
    }
}
