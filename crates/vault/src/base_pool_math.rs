//! Add and remove liquidity math shared by every pool type. All amounts are
//! live balances scaled to 18 decimals. Each function rounds in favour of
//! the pool: amounts the pool receives round up, amounts it pays round down.

use {
    crate::{
        error::{Error, ValidationError},
        pools::{BasePool, Rounding},
    },
    number::{BalU256, Bfp, U256, U256Ext},
};

fn mul_div(value: U256, mul: U256, div: U256, rounding: Rounding) -> Result<U256, number::Error> {
    if div.is_zero() {
        return Err(number::Error::ZeroDivision);
    }
    match rounding {
        Rounding::Up => value.mul_div_up(mul, div),
        Rounding::Down => value.mul_div_down(mul, div),
    }
    .ok_or(number::Error::MulOverflow)
}

/// `⌈balance · bpt_amount_out / total_supply⌉` for every token.
pub fn compute_proportional_amounts_in(
    balances: &[U256],
    total_supply: U256,
    bpt_amount_out: U256,
) -> Result<Vec<U256>, Error> {
    Ok(balances
        .iter()
        .map(|balance| mul_div(*balance, bpt_amount_out, total_supply, Rounding::Up))
        .collect::<Result<_, _>>()?)
}

/// `⌊balance · bpt_amount_in / total_supply⌋` for every token.
pub fn compute_proportional_amounts_out(
    balances: &[U256],
    total_supply: U256,
    bpt_amount_in: U256,
) -> Result<Vec<U256>, Error> {
    Ok(balances
        .iter()
        .map(|balance| mul_div(*balance, bpt_amount_in, total_supply, Rounding::Down))
        .collect::<Result<_, _>>()?)
}

fn ensure_ratio_at_most(pool: &dyn BasePool, ratio: Bfp) -> Result<(), Error> {
    if ratio > pool.maximum_invariant_ratio() {
        return Err(ValidationError::InvariantRatioAboveMax(ratio).into());
    }
    Ok(())
}

fn ensure_ratio_at_least(pool: &dyn BasePool, ratio: Bfp) -> Result<(), Error> {
    if ratio < pool.minimum_invariant_ratio() {
        return Err(ValidationError::InvariantRatioBelowMin(ratio).into());
    }
    Ok(())
}

/// Shares minted for exact, possibly unbalanced, amounts in.
///
/// The part of every amount exceeding a proportional deposit is charged the
/// swap fee before the invariant growth is turned into shares.
pub fn compute_add_liquidity_unbalanced(
    current_balances: &[U256],
    exact_amounts: &[U256],
    total_supply: U256,
    swap_fee: Bfp,
    pool: &dyn BasePool,
) -> Result<(U256, Vec<U256>), Error> {
    let mut new_balances = current_balances
        .iter()
        .zip(exact_amounts)
        .map(|(balance, amount)| balance.badd(*amount))
        .collect::<Result<Vec<_>, _>>()?;

    let current_invariant = pool.compute_invariant(current_balances, Rounding::Up)?;
    let new_invariant = pool.compute_invariant(&new_balances, Rounding::Down)?;
    let invariant_ratio = Bfp::from_wei(new_invariant).div_down(Bfp::from_wei(current_invariant))?;
    ensure_ratio_at_most(pool, invariant_ratio)?;

    let mut swap_fee_amounts = vec![U256::zero(); current_balances.len()];
    for (index, current) in current_balances.iter().enumerate() {
        let proportional = invariant_ratio.mul_down(Bfp::from_wei(*current))?.as_uint256();
        if new_balances[index] > proportional {
            let taxable = new_balances[index] - proportional;
            let fee = Bfp::from_wei(taxable).mul_up(swap_fee)?.as_uint256();
            swap_fee_amounts[index] = fee;
            new_balances[index] = new_balances[index].bsub(fee)?;
        }
    }

    let invariant_with_fees = pool.compute_invariant(&new_balances, Rounding::Down)?;
    let bpt_amount_out = mul_div(
        total_supply,
        invariant_with_fees.bsub(current_invariant)?,
        current_invariant,
        Rounding::Down,
    )?;

    Ok((bpt_amount_out, swap_fee_amounts))
}

/// Amount of `token_in_index` needed to mint exactly `bpt_amount_out`.
pub fn compute_add_liquidity_single_token_exact_out(
    current_balances: &[U256],
    token_in_index: usize,
    bpt_amount_out: U256,
    total_supply: U256,
    swap_fee: Bfp,
    pool: &dyn BasePool,
) -> Result<(U256, Vec<U256>), Error> {
    let new_supply = bpt_amount_out.badd(total_supply)?;
    let invariant_ratio = Bfp::from_wei(new_supply).div_up(Bfp::from_wei(total_supply))?;
    ensure_ratio_at_most(pool, invariant_ratio)?;

    let current = current_balances[token_in_index];
    let new_balance = pool.compute_balance(current_balances, token_in_index, invariant_ratio)?;
    let amount_in = new_balance.bsub(current)?;

    // Growing every balance proportionally is free, the rest is a swap.
    let non_taxable_balance = mul_div(new_supply, current, total_supply, Rounding::Up)?;
    let taxable_amount = new_balance.saturating_sub(non_taxable_balance);
    let fee = Bfp::from_wei(taxable_amount)
        .div_up(swap_fee.complement())?
        .as_uint256()
        .bsub(taxable_amount)?;

    let mut swap_fee_amounts = vec![U256::zero(); current_balances.len()];
    swap_fee_amounts[token_in_index] = fee;
    Ok((amount_in.badd(fee)?, swap_fee_amounts))
}

/// Shares burned for exact, possibly unbalanced, amounts out.
///
/// Every token whose new balance falls short of a proportional withdrawal
/// pays the swap fee on the shortfall, grossed up so the pool keeps the fee.
pub fn compute_remove_liquidity_unbalanced(
    current_balances: &[U256],
    exact_amounts: &[U256],
    total_supply: U256,
    swap_fee: Bfp,
    pool: &dyn BasePool,
) -> Result<(U256, Vec<U256>), Error> {
    let mut new_balances = current_balances
        .iter()
        .zip(exact_amounts)
        .map(|(balance, amount)| balance.bsub(*amount))
        .collect::<Result<Vec<_>, _>>()?;

    let current_invariant = pool.compute_invariant(current_balances, Rounding::Up)?;
    let new_invariant = pool.compute_invariant(&new_balances, Rounding::Up)?;
    let invariant_ratio = Bfp::from_wei(new_invariant).div_up(Bfp::from_wei(current_invariant))?;
    ensure_ratio_at_least(pool, invariant_ratio)?;

    let mut swap_fee_amounts = vec![U256::zero(); current_balances.len()];
    for (index, current) in current_balances.iter().enumerate() {
        let proportional = invariant_ratio.mul_up(Bfp::from_wei(*current))?.as_uint256();
        if proportional > new_balances[index] {
            let taxable = proportional - new_balances[index];
            let fee = Bfp::from_wei(taxable)
                .div_up(swap_fee.complement())?
                .as_uint256()
                .bsub(taxable)?;
            swap_fee_amounts[index] = fee;
            new_balances[index] = new_balances[index].bsub(fee)?;
        }
    }

    let invariant_with_fees = pool.compute_invariant(&new_balances, Rounding::Down)?;
    let bpt_amount_in = mul_div(
        total_supply,
        current_invariant.bsub(invariant_with_fees)?,
        current_invariant,
        Rounding::Up,
    )?;

    Ok((bpt_amount_in, swap_fee_amounts))
}

/// Amount of `token_out_index` paid out for burning exactly `bpt_amount_in`.
pub fn compute_remove_liquidity_single_token_exact_in(
    current_balances: &[U256],
    token_out_index: usize,
    bpt_amount_in: U256,
    total_supply: U256,
    swap_fee: Bfp,
    pool: &dyn BasePool,
) -> Result<(U256, Vec<U256>), Error> {
    let new_supply = total_supply.bsub(bpt_amount_in)?;
    let invariant_ratio = Bfp::from_wei(new_supply).div_up(Bfp::from_wei(total_supply))?;
    ensure_ratio_at_least(pool, invariant_ratio)?;

    let current = current_balances[token_out_index];
    let new_balance = pool.compute_balance(current_balances, token_out_index, invariant_ratio)?;
    let amount_out = current.bsub(new_balance)?;

    let new_balance_before_tax = mul_div(new_supply, current, total_supply, Rounding::Up)?;
    let taxable_amount = new_balance_before_tax.saturating_sub(new_balance);
    let fee = Bfp::from_wei(taxable_amount).mul_up(swap_fee)?.as_uint256();

    let mut swap_fee_amounts = vec![U256::zero(); current_balances.len()];
    swap_fee_amounts[token_out_index] = fee;
    Ok((amount_out.bsub(fee)?, swap_fee_amounts))
}
