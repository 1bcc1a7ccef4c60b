//! Raw token balances and pool share supply of a single pool.

use {crate::error::LedgerError, number::U256};

/// Signed change of a balance or of the share supply.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Delta {
    Credit(U256),
    Debit(U256),
}

impl Default for Delta {
    fn default() -> Self {
        Self::Credit(U256::zero())
    }
}

impl Delta {
    pub fn amount(&self) -> U256 {
        match self {
            Self::Credit(amount) | Self::Debit(amount) => *amount,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.amount().is_zero()
    }

    fn apply(self, value: U256) -> Result<U256, Bound> {
        match self {
            Self::Credit(amount) => value.checked_add(amount).ok_or(Bound::Overflow),
            Self::Debit(amount) => value.checked_sub(amount).ok_or(Bound::Negative),
        }
    }
}

enum Bound {
    Negative,
    Overflow,
}

/// Delta of the token at `index` in the pool's token list.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TokenDelta {
    pub index: usize,
    pub delta: Delta,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Snapshot {
    pub balances: Vec<U256>,
    pub total_supply: U256,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Ledger {
    balances: Vec<U256>,
    total_supply: U256,
}

impl Ledger {
    pub fn new(num_tokens: usize) -> Self {
        Self {
            balances: vec![U256::zero(); num_tokens],
            total_supply: U256::zero(),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            balances: self.balances.clone(),
            total_supply: self.total_supply,
        }
    }

    pub fn balances(&self) -> &[U256] {
        &self.balances
    }

    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    /// Applies all deltas or none of them.
    pub fn apply_delta(
        &mut self,
        token_deltas: &[TokenDelta],
        share_delta: Delta,
    ) -> Result<(), LedgerError> {
        let mut balances = self.balances.clone();
        for TokenDelta { index, delta } in token_deltas {
            let balance = balances
                .get_mut(*index)
                .ok_or(LedgerError::TokenNotRegistered(*index))?;
            *balance = delta.apply(*balance).map_err(|bound| match bound {
                Bound::Negative => LedgerError::InsufficientBalance(*index),
                Bound::Overflow => LedgerError::BalanceOverflow(*index),
            })?;
        }
        let total_supply = share_delta
            .apply(self.total_supply)
            .map_err(|_| LedgerError::InsufficientSupply)?;

        self.balances = balances;
        self.total_supply = total_supply;
        Ok(())
    }

    /// Appends a token with its initial balance; the share supply is left
    /// untouched.
    pub fn push_token(&mut self, initial_balance: U256) {
        self.balances.push(initial_balance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credit(index: usize, amount: u64) -> TokenDelta {
        TokenDelta {
            index,
            delta: Delta::Credit(amount.into()),
        }
    }

    fn debit(index: usize, amount: u64) -> TokenDelta {
        TokenDelta {
            index,
            delta: Delta::Debit(amount.into()),
        }
    }

    #[test]
    fn applies_credits_and_debits() {
        let mut ledger = Ledger::new(2);
        ledger
            .apply_delta(&[credit(0, 100), credit(1, 50)], Delta::Credit(150.into()))
            .unwrap();
        ledger
            .apply_delta(&[debit(0, 40), credit(1, 10)], Delta::Debit(30.into()))
            .unwrap();
        assert_eq!(
            ledger.snapshot(),
            Snapshot {
                balances: vec![60.into(), 60.into()],
                total_supply: 120.into(),
            }
        );
    }

    #[test]
    fn failed_delta_leaves_ledger_untouched() {
        let mut ledger = Ledger::new(2);
        ledger
            .apply_delta(&[credit(0, 100), credit(1, 100)], Delta::Credit(200.into()))
            .unwrap();
        let before = ledger.snapshot();

        assert_eq!(
            ledger.apply_delta(&[debit(0, 10), debit(1, 101)], Delta::Debit(1.into())),
            Err(LedgerError::InsufficientBalance(1))
        );
        assert_eq!(
            ledger.apply_delta(&[debit(0, 10)], Delta::Debit(201.into())),
            Err(LedgerError::InsufficientSupply)
        );
        assert_eq!(
            ledger.apply_delta(&[credit(2, 1)], Delta::default()),
            Err(LedgerError::TokenNotRegistered(2))
        );
        assert_eq!(
            ledger.apply_delta(
                &[TokenDelta {
                    index: 0,
                    delta: Delta::Credit(U256::MAX),
                }],
                Delta::default()
            ),
            Err(LedgerError::BalanceOverflow(0))
        );
        assert_eq!(ledger.snapshot(), before);
    }

    #[test]
    fn pushed_token_keeps_supply() {
        let mut ledger = Ledger::new(2);
        ledger
            .apply_delta(&[credit(0, 5), credit(1, 5)], Delta::Credit(10.into()))
            .unwrap();
        ledger.push_token(7.into());
        assert_eq!(
            ledger.balances(),
            [U256::from(5), U256::from(5), U256::from(7)]
        );
        assert_eq!(ledger.total_supply(), 10.into());
    }
}
