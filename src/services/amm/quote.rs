// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::AppError;
use crate::common::parsing::canonical_hex;
use crate::domain::constants::{FEE_DENOMINATOR, FEE_NUMERATOR};
use crate::domain::pool::Pool;
use alloy::primitives::{Address, U256};

/// Swap quote derived from one pool snapshot. Never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapQuote {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: U256,
    pub amount_out: U256,
    pub reserve_in: U256,
    pub reserve_out: U256,
    pub is_token0_in: bool,
}

fn overflow(field: &str) -> AppError {
    AppError::Validation {
        field: field.to_string(),
        message: "amount overflows 256-bit arithmetic".to_string(),
    }
}

/// Constant-product output with the 0.3% input fee, floored.
pub fn quote(amount_in: U256, reserve_in: U256, reserve_out: U256) -> Result<U256, AppError> {
    if reserve_in.is_zero() {
        return Err(AppError::NoLiquidity("input reserve is zero".to_string()));
    }
    let amount_in_with_fee = amount_in
        .checked_mul(U256::from(FEE_NUMERATOR))
        .ok_or_else(|| overflow("amount_in"))?;
    let numerator = amount_in_with_fee
        .checked_mul(reserve_out)
        .ok_or_else(|| overflow("amount_in"))?;
    let denominator = reserve_in
        .checked_mul(U256::from(FEE_DENOMINATOR))
        .and_then(|scaled| scaled.checked_add(amount_in_with_fee))
        .ok_or_else(|| overflow("amount_in"))?;
    Ok(numerator / denominator)
}

/// Paired deposit keeping the pool ratio: `floor(amount_a * reserve_b / reserve_a)`.
pub fn quote_liquidity(amount_a: U256, reserve_a: U256, reserve_b: U256) -> Result<U256, AppError> {
    if reserve_a.is_zero() {
        return Err(AppError::NoLiquidity(
            "pool is empty; any ratio is accepted".to_string(),
        ));
    }
    let numerator = amount_a
        .checked_mul(reserve_b)
        .ok_or_else(|| overflow("amount"))?;
    Ok(numerator / reserve_a)
}

/// Quote `amount_in` of `token_in` against `pool`, oriented by the pool's own token0.
pub fn quote_swap(pool: &Pool, token_in: Address, amount_in: U256) -> Result<SwapQuote, AppError> {
    let orientation = pool.orient(token_in).ok_or_else(|| {
        AppError::NoLiquidity(format!(
            "pool {} does not trade {}",
            canonical_hex(pool.pair),
            canonical_hex(token_in)
        ))
    })?;
    let amount_out = quote(amount_in, orientation.reserve_in, orientation.reserve_out)?;
    tracing::trace!(
        target: "quote",
        pair = %canonical_hex(pool.pair),
        is_token0_in = orientation.is_token0_in,
        %amount_in,
        %amount_out,
        "Quoted swap"
    );
    Ok(SwapQuote {
        token_in,
        token_out: orientation.token_out,
        amount_in,
        amount_out,
        reserve_in: orientation.reserve_in,
        reserve_out: orientation.reserve_out,
        is_token0_in: orientation.is_token0_in,
    })
}
