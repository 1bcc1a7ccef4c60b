//! Stable swap invariant solver working on balances scaled to 18 decimals.
//!
//! Both solvers iterate with Newton's method, stop once two consecutive
//! approximations are at most 1 wei apart, and give up after
//! [`MAX_ITERATIONS`] rounds.

use {
    crate::error::{ConvergenceError, Error},
    number::{BalU256, U256},
};

/// Precision the amplification parameter is carried with.
pub const AMP_PRECISION: u64 = 1000;

pub const MAX_ITERATIONS: usize = 255;

fn amp_precision() -> U256 {
    U256::from(AMP_PRECISION)
}

fn within_one_wei(a: U256, b: U256) -> bool {
    if a > b {
        a - b <= U256::one()
    } else {
        b - a <= U256::one()
    }
}

/// Computes the invariant `D` of
/// `A·n^n·Σb + D = A·D·n^n + D^(n+1) / (n^n·Πb)`.
///
/// `amplification_parameter` already includes [`AMP_PRECISION`]. The result
/// is rounded down; an all-zero pool has an invariant of zero.
pub fn compute_invariant(amplification_parameter: U256, balances: &[U256]) -> Result<U256, Error> {
    let num_tokens = U256::from(balances.len());
    let sum = balances
        .iter()
        .try_fold(U256::zero(), |sum, balance| sum.badd(*balance))?;
    if sum.is_zero() {
        return Ok(U256::zero());
    }

    let amp_times_total = amplification_parameter.bmul(num_tokens)?;
    let mut invariant = sum;
    for _ in 0..MAX_ITERATIONS {
        let mut d_p = invariant;
        for balance in balances {
            d_p = d_p
                .bmul(invariant)?
                .bdiv_down(balance.bmul(num_tokens)?)?;
        }

        let previous = invariant;
        let numerator = amp_times_total
            .bmul(sum)?
            .bdiv_down(amp_precision())?
            .badd(d_p.bmul(num_tokens)?)?
            .bmul(invariant)?;
        let denominator = amp_times_total
            .bsub(amp_precision())?
            .bmul(invariant)?
            .bdiv_down(amp_precision())?
            .badd(num_tokens.badd(U256::one())?.bmul(d_p)?)?;
        invariant = numerator.bdiv_down(denominator)?;

        if within_one_wei(invariant, previous) {
            return Ok(invariant);
        }
    }

    Err(ConvergenceError::Invariant.into())
}

/// Solves the balance of `token_index` that yields `invariant` when every
/// other balance stays fixed. The result is rounded up.
///
/// # Panics
///
/// Panics if `token_index` is out of bounds of `balances`.
pub fn compute_balance(
    amplification_parameter: U256,
    balances: &[U256],
    invariant: U256,
    token_index: usize,
) -> Result<U256, Error> {
    let num_tokens = U256::from(balances.len());
    let amp_times_total = amplification_parameter.bmul(num_tokens)?;

    let mut sum = balances[0];
    let mut p_d = balances[0].bmul(num_tokens)?;
    for balance in &balances[1..] {
        p_d = p_d
            .bmul(*balance)?
            .bmul(num_tokens)?
            .bdiv_down(invariant)?;
        sum = sum.badd(*balance)?;
    }
    sum = sum.bsub(balances[token_index])?;

    let invariant_squared = invariant.bmul(invariant)?;
    let c = invariant_squared
        .bmul(amp_precision())?
        .bdiv_up(amp_times_total.bmul(p_d)?)?
        .bmul(balances[token_index])?;
    let b = sum.badd(
        invariant
            .bmul(amp_precision())?
            .bdiv_down(amp_times_total)?,
    )?;

    let mut token_balance = invariant_squared.badd(c)?.bdiv_up(invariant.badd(b)?)?;
    for _ in 0..MAX_ITERATIONS {
        let previous = token_balance;
        token_balance = token_balance
            .bmul(token_balance)?
            .badd(c)?
            .bdiv_up(
                token_balance
                    .bmul(U256::from(2))?
                    .badd(b)?
                    .bsub(invariant)?,
            )?;

        if within_one_wei(token_balance, previous) {
            return Ok(token_balance);
        }
    }

    Err(ConvergenceError::Balance.into())
}
