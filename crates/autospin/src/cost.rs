/// Outcome of the pre-submission affordability check. Computed fresh every
/// cycle, never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostCheck {
    pub sufficient: bool,
    pub balance: u128,
    pub required: u128,
}

impl CostCheck {
    pub fn shortfall(&self) -> u128 {
        self.required.saturating_sub(self.balance)
    }
}

/// Verify the account can cover `value + gas_limit * max_fee_per_gas`.
///
/// The product of gas units and wei-per-gas can exceed 64 bits on its own,
/// so everything runs in u128 with checked arithmetic; an overflowing
/// requirement is unconditionally insufficient.
pub fn check(balance: u128, value: u128, gas_limit: u64, max_fee_per_gas: u128) -> CostCheck {
    match (gas_limit as u128)
        .checked_mul(max_fee_per_gas)
        .and_then(|fee| fee.checked_add(value))
    {
        Some(required) => CostCheck {
            sufficient: balance >= required,
            balance,
            required,
        },
        None => CostCheck {
            sufficient: false,
            balance,
            required: u128::MAX,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_value_plus_worst_case_fee() {
        let check = check(100, 50, 10, 4);
        assert_eq!(check.required, 90);
        assert!(check.sufficient);
        assert_eq!(check.shortfall(), 0);
    }

    #[test]
    fn reports_exact_shortfall() {
        let check = check(80, 50, 10, 4);
        assert_eq!(check.required, 90);
        assert!(!check.sufficient);
        assert_eq!(check.shortfall(), 10);
    }

    #[test]
    fn exact_balance_is_sufficient() {
        let check = check(90, 50, 10, 4);
        assert!(check.sufficient);
    }

    #[test]
    fn wide_products_do_not_overflow() {
        // ~30M gas at ~10k gwei: far beyond u64 when multiplied.
        let gas = 30_000_000u64;
        let fee = 10_000_000_000_000u128;
        let value = 1_000_000_000_000_000_000u128;
        let check = check(u128::MAX, value, gas, fee);
        assert_eq!(check.required, value + gas as u128 * fee);
        assert!(check.sufficient);
    }

    #[test]
    fn overflowing_requirement_is_insufficient() {
        let check = check(u128::MAX, u128::MAX, u64::MAX, u128::MAX);
        assert!(!check.sufficient);
        assert_eq!(check.required, u128::MAX);
    }
}
