use number::{Bfp, U256};

/// Pool share supply locked forever when a pool is initialized.
pub fn minimum_bpt() -> U256 {
    U256::exp10(6)
}

/// Limits applied by the vault to every pool.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Lowest static swap fee a pool may use (0.0001%).
    pub min_swap_fee: Bfp,
    /// Highest static swap fee a pool may use (10%).
    pub max_swap_fee: Bfp,
    /// Non-zero token and share amounts below this are rejected.
    pub minimum_trade_amount: U256,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_swap_fee: Bfp::from_wei(U256::exp10(12)),
            max_swap_fee: Bfp::from_wei(U256::exp10(17)),
            minimum_trade_amount: U256::exp10(6),
        }
    }
}

impl Config {
    pub fn ensure_valid_swap_fee(&self, fee: Bfp) -> Result<(), crate::ValidationError> {
        if fee < self.min_swap_fee || fee > self.max_swap_fee {
            return Err(crate::ValidationError::FeeOutOfBounds {
                fee,
                min: self.min_swap_fee,
                max: self.max_swap_fee,
            });
        }
        Ok(())
    }

    pub fn ensure_valid_trade_amount(&self, amount: U256) -> Result<(), crate::ValidationError> {
        if !amount.is_zero() && amount < self.minimum_trade_amount {
            return Err(crate::ValidationError::TradeAmountTooSmall(amount));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use {super::*, number::bfp};

    #[test]
    fn swap_fee_bounds_are_inclusive() {
        let config = Config::default();
        assert!(config.ensure_valid_swap_fee(bfp!("0.000001")).is_ok());
        assert!(config.ensure_valid_swap_fee(bfp!("0.1")).is_ok());
        assert!(config.ensure_valid_swap_fee(bfp!("0.0000009")).is_err());
        assert!(config.ensure_valid_swap_fee(bfp!("0.100000000000000001")).is_err());
    }

    #[test]
    fn zero_amounts_are_not_trades() {
        let config = Config::default();
        assert!(config.ensure_valid_trade_amount(U256::zero()).is_ok());
        assert!(config.ensure_valid_trade_amount(U256::exp10(6)).is_ok());
        assert!(config.ensure_valid_trade_amount(U256::exp10(6) - 1).is_err());
    }
}
