//! Liquidity operations: request and result types plus the engine that
//! turns a request into ledger deltas.

pub(crate) mod engine;

use {
    crate::ledger::{Delta, TokenDelta},
    number::U256,
    primitive_types::H160,
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum OperationKind {
    Initialize,
    ProportionalAdd,
    UnbalancedAdd,
    SingleTokenAddExactOut,
    Donation,
    ProportionalRemove,
    UnbalancedRemove,
    SingleTokenRemoveExactIn,
    SingleTokenRemoveExactOut,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AddLiquidityKind {
    /// Mint exactly `exact_bpt_amount_out`, paying every token pro rata.
    Proportional {
        max_amounts_in: Vec<U256>,
        exact_bpt_amount_out: U256,
    },
    Unbalanced {
        exact_amounts_in: Vec<U256>,
        min_bpt_amount_out: U256,
    },
    SingleTokenExactOut {
        token_in: H160,
        max_amount_in: U256,
        exact_bpt_amount_out: U256,
    },
    /// Add tokens without minting shares.
    Donation { amounts_in: Vec<U256> },
}

impl AddLiquidityKind {
    pub fn operation(&self) -> OperationKind {
        match self {
            Self::Proportional { .. } => OperationKind::ProportionalAdd,
            Self::Unbalanced { .. } => OperationKind::UnbalancedAdd,
            Self::SingleTokenExactOut { .. } => OperationKind::SingleTokenAddExactOut,
            Self::Donation { .. } => OperationKind::Donation,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RemoveLiquidityKind {
    /// Burn exactly `exact_bpt_amount_in`, receiving every token pro rata.
    Proportional {
        exact_bpt_amount_in: U256,
        min_amounts_out: Vec<U256>,
    },
    Unbalanced {
        exact_amounts_out: Vec<U256>,
        max_bpt_amount_in: U256,
    },
    SingleTokenExactIn {
        token_out: H160,
        exact_bpt_amount_in: U256,
        min_amount_out: U256,
    },
    SingleTokenExactOut {
        token_out: H160,
        exact_amount_out: U256,
        max_bpt_amount_in: U256,
    },
}

impl RemoveLiquidityKind {
    pub fn operation(&self) -> OperationKind {
        match self {
            Self::Proportional { .. } => OperationKind::ProportionalRemove,
            Self::Unbalanced { .. } => OperationKind::UnbalancedRemove,
            Self::SingleTokenExactIn { .. } => OperationKind::SingleTokenRemoveExactIn,
            Self::SingleTokenExactOut { .. } => OperationKind::SingleTokenRemoveExactOut,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializeParams {
    pub pool: H160,
    pub recipient: H160,
    pub exact_amounts_in: Vec<U256>,
    pub min_bpt_amount_out: U256,
    pub user_data: Vec<u8>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AddLiquidityParams {
    pub pool: H160,
    /// Receiver of the minted pool shares.
    pub recipient: H160,
    pub kind: AddLiquidityKind,
    /// Opaque bytes handed through to event consumers.
    pub user_data: Vec<u8>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RemoveLiquidityParams {
    pub pool: H160,
    /// Receiver of the withdrawn tokens.
    pub recipient: H160,
    pub kind: RemoveLiquidityKind,
    pub user_data: Vec<u8>,
}

/// Amounts are raw token amounts, index aligned with the pool tokens.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AddLiquidityResult {
    pub amounts_in: Vec<U256>,
    pub bpt_amount_out: U256,
    pub swap_fee_amounts: Vec<U256>,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RemoveLiquidityResult {
    pub bpt_amount_in: U256,
    pub amounts_out: Vec<U256>,
    pub swap_fee_amounts: Vec<U256>,
}

/// Ledger changes of a solved operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settlement {
    pub token_deltas: Vec<TokenDelta>,
    pub share_delta: Delta,
}

impl Settlement {
    pub(crate) fn credit(amounts: &[U256], shares: U256) -> Self {
        Self {
            token_deltas: deltas(amounts, Delta::Credit),
            share_delta: Delta::Credit(shares),
        }
    }

    pub(crate) fn debit(amounts: &[U256], shares: U256) -> Self {
        Self {
            token_deltas: deltas(amounts, Delta::Debit),
            share_delta: Delta::Debit(shares),
        }
    }
}

fn deltas(amounts: &[U256], delta: fn(U256) -> Delta) -> Vec<TokenDelta> {
    amounts
        .iter()
        .enumerate()
        .map(|(index, amount)| TokenDelta {
            index,
            delta: delta(*amount),
        })
        .collect()
}
