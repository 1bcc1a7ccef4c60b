//! Pool records kept by the vault and the invariant interface the liquidity
//! math is written against.

pub mod common;
pub mod stable;

pub use self::{
    common::{TokenConfig, TokenScaling, TokenType},
    stable::{AmplificationParameter, StablePool},
};
use {
    crate::error::Error,
    number::{Bfp, U256},
    primitive_types::H160,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Rounding {
    Up,
    Down,
}

/// Invariant curve of a pool, operating on balances scaled to 18 decimals.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait BasePool {
    fn compute_invariant(&self, balances: &[U256], rounding: Rounding) -> Result<U256, Error>;

    /// Balance of `token_index` for which the invariant of `balances` is
    /// multiplied by `invariant_ratio`, all other balances unchanged.
    fn compute_balance(
        &self,
        balances: &[U256],
        token_index: usize,
        invariant_ratio: Bfp,
    ) -> Result<U256, Error>;

    fn minimum_invariant_ratio(&self) -> Bfp;
    fn maximum_invariant_ratio(&self) -> Bfp;
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationState {
    #[default]
    Unregistered,
    Registered,
    Initialized,
}

/// Accounts allowed to manage a pool after registration.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RoleAccounts {
    pub pause_manager: H160,
    pub swap_fee_manager: H160,
    pub pool_creator: H160,
}

/// Liquidity flags chosen at registration. The custom flags are recorded
/// only; custom liquidity handlers live outside the vault.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LiquidityManagement {
    pub disable_unbalanced_liquidity: bool,
    pub enable_add_liquidity_custom: bool,
    pub enable_remove_liquidity_custom: bool,
    pub enable_donation: bool,
}

/// Everything needed to register a stable pool.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolRegistration {
    pub pool: H160,
    pub tokens: Vec<TokenConfig>,
    pub swap_fee: Bfp,
    pub amplification_parameter: AmplificationParameter,
    /// Unix timestamp after which the pool can no longer be paused.
    pub pause_window_end_time: u64,
    pub protocol_fee_exempt: bool,
    pub role_accounts: RoleAccounts,
    /// Hooks contract reference, stored but never called.
    pub hooks: Option<H160>,
    pub liquidity_management: LiquidityManagement,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pool {
    pub id: H160,
    pub tokens: Vec<TokenConfig>,
    pub swap_fee: Bfp,
    pub amplification_parameter: AmplificationParameter,
    pub pause_window_end_time: u64,
    pub paused: bool,
    pub protocol_fee_exempt: bool,
    pub role_accounts: RoleAccounts,
    pub hooks: Option<H160>,
    pub liquidity_management: LiquidityManagement,
    pub state: RegistrationState,
}

impl Pool {
    pub fn registered(registration: PoolRegistration) -> Self {
        Self {
            id: registration.pool,
            tokens: registration.tokens,
            swap_fee: registration.swap_fee,
            amplification_parameter: registration.amplification_parameter,
            pause_window_end_time: registration.pause_window_end_time,
            paused: false,
            protocol_fee_exempt: registration.protocol_fee_exempt,
            role_accounts: registration.role_accounts,
            hooks: registration.hooks,
            liquidity_management: registration.liquidity_management,
            state: RegistrationState::Registered,
        }
    }

    pub fn token_index(&self, token: H160) -> Option<usize> {
        self.tokens.iter().position(|config| config.token == token)
    }

    pub fn token_addresses(&self) -> Vec<H160> {
        self.tokens.iter().map(|config| config.token).collect()
    }

    pub fn curve(&self) -> Result<StablePool, Error> {
        Ok(StablePool::new(&self.amplification_parameter)?)
    }
}
