//! Checks guarding the pool state machine
//! `UNREGISTERED -> REGISTERED -> INITIALIZED` and the management actions
//! available on a registered pool.

use {
    crate::{
        config::{self, Config},
        error::{Error, LifecycleError, SlippageError, ValidationError},
        ledger::Ledger,
        liquidity::{
            Settlement,
            engine::{self, PoolContext},
        },
        pools::{
            BasePool,
            Pool,
            PoolRegistration,
            RegistrationState,
            Rounding,
            StablePool,
            TokenConfig,
            stable::{MAX_TOKENS, MIN_TOKENS},
        },
        rates::RateProviding,
    },
    number::{Bfp, U256},
    primitive_types::H160,
    std::cmp::Ordering,
};

pub(crate) fn validate_registration(
    config: &Config,
    registration: &PoolRegistration,
    rates: &dyn RateProviding,
) -> Result<(), Error> {
    let tokens = &registration.tokens;
    if !(MIN_TOKENS..=MAX_TOKENS).contains(&tokens.len()) {
        return Err(ValidationError::TokenCount(tokens.len()).into());
    }
    for (index, pair) in tokens.windows(2).enumerate() {
        match pair[0].token.cmp(&pair[1].token) {
            Ordering::Less => {}
            Ordering::Equal => return Err(ValidationError::DuplicateToken(pair[1].token).into()),
            Ordering::Greater => return Err(ValidationError::UnsortedTokens(index + 1).into()),
        }
    }
    for token in tokens {
        validate_token(token, rates)?;
    }
    config.ensure_valid_swap_fee(registration.swap_fee)?;
    StablePool::new(&registration.amplification_parameter)?;
    Ok(())
}

fn validate_token(token: &TokenConfig, rates: &dyn RateProviding) -> Result<(), Error> {
    token.validate()?;
    engine::token_scaling(token, rates)?;
    Ok(())
}

pub(crate) fn ensure_initialized(pool: &Pool) -> Result<(), LifecycleError> {
    match pool.state {
        RegistrationState::Initialized => Ok(()),
        RegistrationState::Registered => Err(LifecycleError::PoolNotInitialized(pool.id)),
        RegistrationState::Unregistered => Err(LifecycleError::NotRegistered(pool.id)),
    }
}

pub(crate) fn ensure_unpaused(pool: &Pool) -> Result<(), LifecycleError> {
    if pool.paused {
        return Err(LifecycleError::PoolPaused(pool.id));
    }
    Ok(())
}

/// Solves the first deposit. Returns the shares for the recipient; the
/// settlement mints the full invariant, locking [`config::minimum_bpt`].
pub(crate) fn initialize(
    config: &Config,
    ctx: &PoolContext,
    exact_amounts_in: &[U256],
    min_bpt_amount_out: U256,
) -> Result<(U256, Settlement), Error> {
    let pool = ctx.pool;
    match pool.state {
        RegistrationState::Registered => {}
        RegistrationState::Initialized => {
            return Err(LifecycleError::AlreadyInitialized(pool.id).into());
        }
        RegistrationState::Unregistered => {
            return Err(LifecycleError::NotRegistered(pool.id).into());
        }
    }
    ensure_unpaused(pool)?;
    if !ctx.snapshot.total_supply.is_zero() {
        return Err(LifecycleError::AlreadyInitialized(pool.id).into());
    }

    ctx.ensure_length(exact_amounts_in.len())?;
    for (token, amount) in pool.tokens.iter().zip(exact_amounts_in) {
        if amount.is_zero() {
            return Err(ValidationError::ZeroAmount(token.token).into());
        }
    }
    let scaled = ctx.to_scaled18(exact_amounts_in, Rounding::Down)?;
    engine::ensure_valid_trade_amounts(config, &scaled)?;

    let invariant = ctx.curve.compute_invariant(&scaled, Rounding::Down)?;
    if invariant <= config::minimum_bpt() {
        return Err(ValidationError::BelowMinimumInit(invariant).into());
    }
    let bpt_amount_out = invariant - config::minimum_bpt();
    if bpt_amount_out < min_bpt_amount_out {
        return Err(SlippageError::BptAmountOutBelowMin {
            amount: bpt_amount_out,
            limit: min_bpt_amount_out,
        }
        .into());
    }

    Ok((bpt_amount_out, Settlement::credit(exact_amounts_in, invariant)))
}

/// Checks an append of `token` seeded with `initial_balance`. The pool with
/// the token appended must still have a solvable invariant, since tokens can
/// never be removed again.
pub(crate) fn validate_token_addition(
    config: &Config,
    pool: &Pool,
    ledger: &Ledger,
    token: &TokenConfig,
    initial_balance: U256,
    rates: &dyn RateProviding,
) -> Result<(), Error> {
    ensure_initialized(pool)?;
    ensure_unpaused(pool)?;
    if pool.tokens.len() >= MAX_TOKENS {
        return Err(ValidationError::TokenCount(pool.tokens.len() + 1).into());
    }
    if pool.token_index(token.token).is_some() {
        return Err(ValidationError::DuplicateToken(token.token).into());
    }
    validate_token(token, rates)?;
    if initial_balance.is_zero() {
        return Err(ValidationError::ZeroAmount(token.token).into());
    }
    let seed = engine::token_scaling(token, rates)?.to_scaled18_round_down(initial_balance)?;
    config.ensure_valid_trade_amount(seed)?;

    let mut appended = pool.clone();
    appended.tokens.push(token.clone());
    let mut ledger = ledger.clone();
    ledger.push_token(initial_balance);
    let ctx = PoolContext::new(&appended, &ledger, rates)?;
    ctx.curve.compute_invariant(&ctx.live_balances, Rounding::Down)?;
    Ok(())
}

/// Only the pause manager may pause or unpause, and pausing is only possible
/// until the pause window ends. `now` is a unix timestamp in seconds.
pub(crate) fn ensure_can_set_paused(
    pool: &Pool,
    caller: H160,
    paused: bool,
    now: u64,
) -> Result<(), LifecycleError> {
    if caller != pool.role_accounts.pause_manager {
        return Err(LifecycleError::SenderNotAllowed {
            pool: pool.id,
            caller,
        });
    }
    if paused && now > pool.pause_window_end_time {
        return Err(LifecycleError::PauseWindowExpired(pool.id));
    }
    Ok(())
}

pub(crate) fn ensure_can_set_swap_fee(
    config: &Config,
    pool: &Pool,
    caller: H160,
    swap_fee: Bfp,
) -> Result<(), Error> {
    if caller != pool.role_accounts.swap_fee_manager {
        return Err(LifecycleError::SenderNotAllowed {
            pool: pool.id,
            caller,
        }
        .into());
    }
    config.ensure_valid_swap_fee(swap_fee)?;
    Ok(())
}
