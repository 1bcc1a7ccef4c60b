use {
    number::Bfp,
    primitive_types::{H160, U256},
};

/// Every way a vault operation can fail. No variant is returned after state
/// was mutated.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),
    #[error("slippage limit exceeded: {0}")]
    Slippage(#[from] SlippageError),
    #[error(transparent)]
    Convergence(#[from] ConvergenceError),
    #[error("pool lifecycle: {0}")]
    Lifecycle(#[from] LifecycleError),
    #[error("ledger: {0}")]
    Ledger(#[from] LedgerError),
    #[error("arithmetic: {0}")]
    Arithmetic(#[from] number::Error),
}

/// Coarse classification telling a caller how to react to an [`Error`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// The request can never succeed as given.
    Validation,
    /// The request may succeed with looser bounds or a fresh quote.
    Slippage,
    /// The math did not converge for these balances.
    Convergence,
    /// The pool is not in a state that allows the operation.
    Lifecycle,
    /// Internal bookkeeping failure, abort.
    Ledger,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::Arithmetic(_) => ErrorKind::Validation,
            Self::Slippage(_) => ErrorKind::Slippage,
            Self::Convergence(_) => ErrorKind::Convergence,
            Self::Lifecycle(_) => ErrorKind::Lifecycle,
            Self::Ledger(_) => ErrorKind::Ledger,
        }
    }

    /// Whether retrying with adjusted limits could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Slippage)
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("expected {expected} amounts, got {actual}")]
    AmountsLengthMismatch { expected: usize, actual: usize },
    #[error("pools hold between 2 and 5 tokens, got {0}")]
    TokenCount(usize),
    #[error("tokens must be sorted by address, token {0} is out of order")]
    UnsortedTokens(usize),
    #[error("token {0:?} is registered twice")]
    DuplicateToken(H160),
    #[error("token {token:?} has {decimals} decimals, at most 18 are supported")]
    UnsupportedDecimals { token: H160, decimals: u8 },
    #[error("token {0:?} has a rate provider inconsistent with its token type")]
    InvalidRateProvider(H160),
    #[error("rate provider {0:?} returned no usable rate")]
    MissingRate(H160),
    #[error("swap fee {fee} outside of [{min}, {max}]")]
    FeeOutOfBounds { fee: Bfp, min: Bfp, max: Bfp },
    #[error("amplification parameter precision must not be zero")]
    ZeroAmplificationPrecision,
    #[error("amplification parameter {0} outside of [1, 5000]")]
    AmplificationOutOfBounds(U256),
    #[error("token {0:?} is not part of the pool")]
    TokenNotInPool(H160),
    #[error("token {0:?} requires a non-zero amount")]
    ZeroAmount(H160),
    #[error("operation does not move any amount")]
    NoAmounts,
    #[error("amount {0} is below the minimum trade amount")]
    TradeAmountTooSmall(U256),
    #[error("amount {amount} of token {token:?} exceeds the pool balance {balance}")]
    AmountExceedsBalance {
        token: H160,
        amount: U256,
        balance: U256,
    },
    #[error("cannot remove the entire pool balance of token {0:?}")]
    FullBalanceRemoval(H160),
    #[error("invariant ratio {0} above the maximum")]
    InvariantRatioAboveMax(Bfp),
    #[error("invariant ratio {0} below the minimum")]
    InvariantRatioBelowMin(Bfp),
    #[error("initial invariant {0} does not exceed the minimum pool share supply")]
    BelowMinimumInit(U256),
    #[error("pool share supply {0} would fall below the minimum")]
    TotalSupplyTooLow(U256),
    #[error("pool does not allow unbalanced liquidity")]
    UnbalancedLiquidityDisabled,
    #[error("pool does not accept donations")]
    DonationDisabled,
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SlippageError {
    #[error("amount in {amount} of token {token:?} above maximum {limit}")]
    AmountInAboveMax {
        token: H160,
        amount: U256,
        limit: U256,
    },
    #[error("amount out {amount} of token {token:?} below minimum {limit}")]
    AmountOutBelowMin {
        token: H160,
        amount: U256,
        limit: U256,
    },
    #[error("pool shares out {amount} below minimum {limit}")]
    BptAmountOutBelowMin { amount: U256, limit: U256 },
    #[error("pool shares in {amount} above maximum {limit}")]
    BptAmountInAboveMax { amount: U256, limit: U256 },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ConvergenceError {
    #[error("stable invariant didn't converge")]
    Invariant,
    #[error("stable balance didn't converge")]
    Balance,
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum LifecycleError {
    #[error("pool {0:?} is not registered")]
    NotRegistered(H160),
    #[error("pool {0:?} is already registered")]
    AlreadyRegistered(H160),
    #[error("pool {0:?} is already initialized")]
    AlreadyInitialized(H160),
    #[error("pool {0:?} is not initialized")]
    PoolNotInitialized(H160),
    #[error("pool {0:?} is paused")]
    PoolPaused(H160),
    #[error("pause window of pool {0:?} has expired")]
    PauseWindowExpired(H160),
    #[error("{caller:?} is not allowed to manage pool {pool:?}")]
    SenderNotAllowed { pool: H160, caller: H160 },
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error("balance of token index {0} would become negative")]
    InsufficientBalance(usize),
    #[error("pool share supply would become negative")]
    InsufficientSupply,
    #[error("balance of token index {0} would overflow")]
    BalanceOverflow(usize),
    #[error("token index {0} is not registered")]
    TokenNotRegistered(usize),
}
