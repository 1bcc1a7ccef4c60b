//! Solves liquidity operations against a frozen pool state. Nothing in here
//! mutates the ledger; the vault applies the returned [`Settlement`].

use {
    super::{
        AddLiquidityKind,
        AddLiquidityResult,
        RemoveLiquidityKind,
        RemoveLiquidityResult,
        Settlement,
    },
    crate::{
        base_pool_math,
        config::{self, Config},
        error::{Error, SlippageError, ValidationError},
        ledger::{Ledger, Snapshot},
        pools::{Pool, Rounding, StablePool, TokenConfig, TokenScaling, TokenType},
        rates::RateProviding,
    },
    itertools::izip,
    number::{Bfp, U256},
    primitive_types::H160,
};

/// Pool state frozen for the duration of one operation.
pub(crate) struct PoolContext<'a> {
    pub pool: &'a Pool,
    pub snapshot: Snapshot,
    pub scaling: Vec<TokenScaling>,
    /// Balances scaled to 18 decimals with rates applied.
    pub live_balances: Vec<U256>,
    pub curve: StablePool,
}

impl<'a> PoolContext<'a> {
    pub fn new(pool: &'a Pool, ledger: &Ledger, rates: &dyn RateProviding) -> Result<Self, Error> {
        let snapshot = ledger.snapshot();
        let scaling = pool
            .tokens
            .iter()
            .map(|token| token_scaling(token, rates))
            .collect::<Result<Vec<_>, _>>()?;
        let live_balances = snapshot
            .balances
            .iter()
            .zip(&scaling)
            .map(|(balance, scaling)| scaling.to_scaled18_round_down(*balance))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            pool,
            snapshot,
            scaling,
            live_balances,
            curve: pool.curve()?,
        })
    }

    pub fn num_tokens(&self) -> usize {
        self.pool.tokens.len()
    }

    fn total_supply(&self) -> U256 {
        self.snapshot.total_supply
    }

    pub fn to_scaled18(&self, raw: &[U256], rounding: Rounding) -> Result<Vec<U256>, Error> {
        Ok(raw
            .iter()
            .zip(&self.scaling)
            .map(|(amount, scaling)| match rounding {
                Rounding::Up => scaling.to_scaled18_round_up(*amount),
                Rounding::Down => scaling.to_scaled18_round_down(*amount),
            })
            .collect::<Result<_, _>>()?)
    }

    pub fn to_raw(&self, scaled18: &[U256], rounding: Rounding) -> Result<Vec<U256>, Error> {
        Ok(scaled18
            .iter()
            .zip(&self.scaling)
            .map(|(amount, scaling)| match rounding {
                Rounding::Up => scaling.to_raw_round_up(*amount),
                Rounding::Down => scaling.to_raw_round_down(*amount),
            })
            .collect::<Result<_, _>>()?)
    }

    pub fn ensure_length(&self, actual: usize) -> Result<(), ValidationError> {
        if actual != self.num_tokens() {
            return Err(ValidationError::AmountsLengthMismatch {
                expected: self.num_tokens(),
                actual,
            });
        }
        Ok(())
    }

    fn token_index(&self, token: H160) -> Result<usize, ValidationError> {
        self.pool
            .token_index(token)
            .ok_or(ValidationError::TokenNotInPool(token))
    }

    fn ensure_unbalanced_allowed(&self) -> Result<(), ValidationError> {
        if self.pool.liquidity_management.disable_unbalanced_liquidity {
            return Err(ValidationError::UnbalancedLiquidityDisabled);
        }
        Ok(())
    }

    fn single(&self, index: usize, amount: U256) -> Vec<U256> {
        let mut amounts = vec![U256::zero(); self.num_tokens()];
        amounts[index] = amount;
        amounts
    }
}

/// Resolves the decimal scaling and the current rate of a token. A missing or
/// zero rate makes every operation on the pool fail.
pub(crate) fn token_scaling(
    token: &TokenConfig,
    rates: &dyn RateProviding,
) -> Result<TokenScaling, Error> {
    let rate = match (token.token_type, token.rate_provider) {
        (TokenType::Standard, _) => Bfp::one(),
        (TokenType::WithRate, Some(provider)) => rates
            .rate(provider)
            .filter(|rate| !rate.is_zero())
            .ok_or(ValidationError::MissingRate(provider))?,
        (TokenType::WithRate, None) => {
            return Err(ValidationError::InvalidRateProvider(token.token).into());
        }
    };
    Ok(TokenScaling::new(token.decimals, rate)?)
}

pub(crate) fn ensure_valid_trade_amounts(config: &Config, amounts: &[U256]) -> Result<(), Error> {
    amounts
        .iter()
        .try_for_each(|amount| config.ensure_valid_trade_amount(*amount))?;
    Ok(())
}

fn ensure_any_nonzero(amounts: &[U256]) -> Result<(), ValidationError> {
    if amounts.iter().all(U256::is_zero) {
        return Err(ValidationError::NoAmounts);
    }
    Ok(())
}

fn ensure_nonzero_shares(amount: U256) -> Result<(), ValidationError> {
    if amount.is_zero() {
        return Err(ValidationError::NoAmounts);
    }
    Ok(())
}

/// Burning `bpt_amount_in` must leave at least the locked minimum supply.
fn ensure_remaining_supply(total_supply: U256, bpt_amount_in: U256) -> Result<(), ValidationError> {
    match total_supply.checked_sub(bpt_amount_in) {
        Some(remaining) if remaining >= config::minimum_bpt() => Ok(()),
        remaining => Err(ValidationError::TotalSupplyTooLow(
            remaining.unwrap_or_default(),
        )),
    }
}

pub(crate) fn add_liquidity(
    config: &Config,
    ctx: &PoolContext,
    kind: &AddLiquidityKind,
) -> Result<(AddLiquidityResult, Settlement), Error> {
    let supply = ctx.total_supply();
    let swap_fee = ctx.pool.swap_fee;
    let no_fees = || vec![U256::zero(); ctx.num_tokens()];

    let (amounts_in, bpt_amount_out, swap_fees) = match kind {
        AddLiquidityKind::Proportional {
            max_amounts_in,
            exact_bpt_amount_out,
        } => {
            ctx.ensure_length(max_amounts_in.len())?;
            ensure_nonzero_shares(*exact_bpt_amount_out)?;
            let scaled = base_pool_math::compute_proportional_amounts_in(
                &ctx.live_balances,
                supply,
                *exact_bpt_amount_out,
            )?;
            ensure_valid_trade_amounts(config, &scaled)?;
            let amounts_in = ctx.to_raw(&scaled, Rounding::Up)?;
            for (token, amount, limit) in izip!(&ctx.pool.tokens, &amounts_in, max_amounts_in) {
                if amount > limit {
                    return Err(SlippageError::AmountInAboveMax {
                        token: token.token,
                        amount: *amount,
                        limit: *limit,
                    }
                    .into());
                }
            }
            (amounts_in, *exact_bpt_amount_out, no_fees())
        }
        AddLiquidityKind::Unbalanced {
            exact_amounts_in,
            min_bpt_amount_out,
        } => {
            ctx.ensure_unbalanced_allowed()?;
            ctx.ensure_length(exact_amounts_in.len())?;
            ensure_any_nonzero(exact_amounts_in)?;
            let scaled = ctx.to_scaled18(exact_amounts_in, Rounding::Down)?;
            ensure_valid_trade_amounts(config, &scaled)?;
            let (bpt_amount_out, swap_fees) = base_pool_math::compute_add_liquidity_unbalanced(
                &ctx.live_balances,
                &scaled,
                supply,
                swap_fee,
                &ctx.curve,
            )?;
            if bpt_amount_out < *min_bpt_amount_out {
                return Err(SlippageError::BptAmountOutBelowMin {
                    amount: bpt_amount_out,
                    limit: *min_bpt_amount_out,
                }
                .into());
            }
            (exact_amounts_in.clone(), bpt_amount_out, swap_fees)
        }
        AddLiquidityKind::SingleTokenExactOut {
            token_in,
            max_amount_in,
            exact_bpt_amount_out,
        } => {
            ctx.ensure_unbalanced_allowed()?;
            let index = ctx.token_index(*token_in)?;
            ensure_nonzero_shares(*exact_bpt_amount_out)?;
            let (scaled, swap_fees) = base_pool_math::compute_add_liquidity_single_token_exact_out(
                &ctx.live_balances,
                index,
                *exact_bpt_amount_out,
                supply,
                swap_fee,
                &ctx.curve,
            )?;
            config.ensure_valid_trade_amount(scaled)?;
            let amount_in = ctx.scaling[index].to_raw_round_up(scaled)?;
            if amount_in > *max_amount_in {
                return Err(SlippageError::AmountInAboveMax {
                    token: *token_in,
                    amount: amount_in,
                    limit: *max_amount_in,
                }
                .into());
            }
            (ctx.single(index, amount_in), *exact_bpt_amount_out, swap_fees)
        }
        AddLiquidityKind::Donation { amounts_in } => {
            if !ctx.pool.liquidity_management.enable_donation {
                return Err(ValidationError::DonationDisabled.into());
            }
            ctx.ensure_length(amounts_in.len())?;
            ensure_any_nonzero(amounts_in)?;
            (amounts_in.clone(), U256::zero(), no_fees())
        }
    };
    config.ensure_valid_trade_amount(bpt_amount_out)?;

    let swap_fee_amounts = ctx.to_raw(&swap_fees, Rounding::Down)?;
    let settlement = Settlement::credit(&amounts_in, bpt_amount_out);
    Ok((
        AddLiquidityResult {
            amounts_in,
            bpt_amount_out,
            swap_fee_amounts,
        },
        settlement,
    ))
}

pub(crate) fn remove_liquidity(
    config: &Config,
    ctx: &PoolContext,
    kind: &RemoveLiquidityKind,
) -> Result<(RemoveLiquidityResult, Settlement), Error> {
    let supply = ctx.total_supply();

    let (bpt_amount_in, amounts_out, swap_fees) = match kind {
        RemoveLiquidityKind::Proportional {
            exact_bpt_amount_in,
            min_amounts_out,
        } => {
            ctx.ensure_length(min_amounts_out.len())?;
            ensure_nonzero_shares(*exact_bpt_amount_in)?;
            ensure_remaining_supply(supply, *exact_bpt_amount_in)?;
            let scaled = base_pool_math::compute_proportional_amounts_out(
                &ctx.live_balances,
                supply,
                *exact_bpt_amount_in,
            )?;
            ensure_valid_trade_amounts(config, &scaled)?;
            let amounts_out = ctx.to_raw(&scaled, Rounding::Down)?;
            for (token, amount, limit) in izip!(&ctx.pool.tokens, &amounts_out, min_amounts_out) {
                if amount < limit {
                    return Err(SlippageError::AmountOutBelowMin {
                        token: token.token,
                        amount: *amount,
                        limit: *limit,
                    }
                    .into());
                }
            }
            (
                *exact_bpt_amount_in,
                amounts_out,
                vec![U256::zero(); ctx.num_tokens()],
            )
        }
        RemoveLiquidityKind::Unbalanced {
            exact_amounts_out,
            max_bpt_amount_in,
        } => {
            ctx.ensure_unbalanced_allowed()?;
            ctx.ensure_length(exact_amounts_out.len())?;
            ensure_any_nonzero(exact_amounts_out)?;
            remove_exact_out(config, ctx, exact_amounts_out.clone(), *max_bpt_amount_in)?
        }
        RemoveLiquidityKind::SingleTokenExactIn {
            token_out,
            exact_bpt_amount_in,
            min_amount_out,
        } => {
            ctx.ensure_unbalanced_allowed()?;
            let index = ctx.token_index(*token_out)?;
            ensure_nonzero_shares(*exact_bpt_amount_in)?;
            ensure_remaining_supply(supply, *exact_bpt_amount_in)?;
            let (scaled, swap_fees) =
                base_pool_math::compute_remove_liquidity_single_token_exact_in(
                    &ctx.live_balances,
                    index,
                    *exact_bpt_amount_in,
                    supply,
                    ctx.pool.swap_fee,
                    &ctx.curve,
                )?;
            config.ensure_valid_trade_amount(scaled)?;
            let amount_out = ctx.scaling[index].to_raw_round_down(scaled)?;
            if amount_out < *min_amount_out {
                return Err(SlippageError::AmountOutBelowMin {
                    token: *token_out,
                    amount: amount_out,
                    limit: *min_amount_out,
                }
                .into());
            }
            (*exact_bpt_amount_in, ctx.single(index, amount_out), swap_fees)
        }
        RemoveLiquidityKind::SingleTokenExactOut {
            token_out,
            exact_amount_out,
            max_bpt_amount_in,
        } => {
            ctx.ensure_unbalanced_allowed()?;
            let index = ctx.token_index(*token_out)?;
            if exact_amount_out.is_zero() {
                return Err(ValidationError::ZeroAmount(*token_out).into());
            }
            remove_exact_out(
                config,
                ctx,
                ctx.single(index, *exact_amount_out),
                *max_bpt_amount_in,
            )?
        }
    };
    config.ensure_valid_trade_amount(bpt_amount_in)?;
    ensure_remaining_supply(supply, bpt_amount_in)?;

    let swap_fee_amounts = ctx.to_raw(&swap_fees, Rounding::Down)?;
    let settlement = Settlement::debit(&amounts_out, bpt_amount_in);
    Ok((
        RemoveLiquidityResult {
            bpt_amount_in,
            amounts_out,
            swap_fee_amounts,
        },
        settlement,
    ))
}

/// Shares to burn for exact raw amounts out, bounded by `max_bpt_amount_in`.
fn remove_exact_out(
    config: &Config,
    ctx: &PoolContext,
    amounts_out: Vec<U256>,
    max_bpt_amount_in: U256,
) -> Result<(U256, Vec<U256>, Vec<U256>), Error> {
    for (token, amount, balance) in izip!(&ctx.pool.tokens, &amounts_out, &ctx.snapshot.balances) {
        if amount > balance {
            return Err(ValidationError::AmountExceedsBalance {
                token: token.token,
                amount: *amount,
                balance: *balance,
            }
            .into());
        }
        if !amount.is_zero() && amount == balance {
            return Err(ValidationError::FullBalanceRemoval(token.token).into());
        }
    }
    // The pool pays these amounts, so it values them generously.
    let scaled = ctx.to_scaled18(&amounts_out, Rounding::Up)?;
    ensure_valid_trade_amounts(config, &scaled)?;
    let (bpt_amount_in, swap_fees) = base_pool_math::compute_remove_liquidity_unbalanced(
        &ctx.live_balances,
        &scaled,
        ctx.total_supply(),
        ctx.pool.swap_fee,
        &ctx.curve,
    )?;
    if bpt_amount_in > max_bpt_amount_in {
        return Err(SlippageError::BptAmountInAboveMax {
            amount: bpt_amount_in,
            limit: max_bpt_amount_in,
        }
        .into());
    }
    Ok((bpt_amount_in, amounts_out, swap_fees))
}
