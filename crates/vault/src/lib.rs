//! Settlement core of a stable pool vault: the stable swap invariant, per
//! pool balance ledgers, the liquidity operation engine and the pool
//! lifecycle.

pub mod base_pool_math;
pub mod config;
pub mod error;
pub mod events;
pub mod ledger;
mod lifecycle;
pub mod liquidity;
pub mod pools;
pub mod rates;
pub mod stable_math;
mod vault;

pub use self::{
    config::Config,
    error::{
        ConvergenceError,
        Error,
        ErrorKind,
        LedgerError,
        LifecycleError,
        SlippageError,
        ValidationError,
    },
    events::{ChannelEventSink, EventSink, LiquidityEvent, TracingEventSink, VaultEvent},
    liquidity::{
        AddLiquidityKind,
        AddLiquidityParams,
        AddLiquidityResult,
        InitializeParams,
        OperationKind,
        RemoveLiquidityKind,
        RemoveLiquidityParams,
        RemoveLiquidityResult,
    },
    pools::{
        AmplificationParameter,
        LiquidityManagement,
        Pool,
        PoolRegistration,
        RegistrationState,
        RoleAccounts,
        TokenConfig,
        TokenType,
    },
    rates::{RateProviding, StaticRateProviders},
    vault::{PoolSnapshot, Vault},
};
