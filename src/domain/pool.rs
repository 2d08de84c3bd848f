// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::parsing::canonical_hex;
use crate::common::units::format_base_units;
use crate::domain::constants::LP_DECIMALS;
use alloy::primitives::{Address, U256};
use serde::Serialize;

/// Static token metadata resolved by the token directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMeta {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

/// Token snapshot for one account. Replaced wholesale on refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
    pub balance: U256,
}

impl Token {
    pub fn from_meta(meta: &TokenMeta, balance: U256) -> Self {
        Self {
            address: meta.address,
            symbol: meta.symbol.clone(),
            decimals: meta.decimals,
            balance,
        }
    }

    pub fn view(&self) -> TokenView {
        TokenView {
            address: canonical_hex(self.address),
            symbol: self.symbol.clone(),
            balance: format_base_units(self.balance, self.decimals),
        }
    }
}

/// Pool snapshot. `reserve0`/`reserve1` always follow the pair's own
/// `token0`/`token1`, never the order a caller asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pool {
    pub pair: Address,
    pub token0: Address,
    pub token1: Address,
    pub symbol0: String,
    pub symbol1: String,
    pub decimals0: u8,
    pub decimals1: u8,
    pub reserve0: U256,
    pub reserve1: U256,
    pub user_lp: U256,
}

/// Token order as reported by the pair contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenOrder {
    pub token0: Address,
    pub token1: Address,
}

impl TokenOrder {
    pub fn new(token0: Address, token1: Address) -> Self {
        Self { token0, token1 }
    }

    /// `None` when `token_in` is not one of the pair's tokens.
    pub fn is_token0_in(&self, token_in: Address) -> Option<bool> {
        if token_in == self.token0 {
            Some(true)
        } else if token_in == self.token1 {
            Some(false)
        } else {
            None
        }
    }

    /// `(amount0Out, amount1Out)` for `pair.swap`: output leaves on the side not paid in.
    pub fn amounts_out(&self, token_in: Address, amount_out: U256) -> Option<(U256, U256)> {
        self.is_token0_in(token_in).map(|token0_in| {
            if token0_in {
                (U256::ZERO, amount_out)
            } else {
                (amount_out, U256::ZERO)
            }
        })
    }
}

/// Reserves oriented for a trade entering through `token_in`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Orientation {
    pub token_in: Address,
    pub token_out: Address,
    pub reserve_in: U256,
    pub reserve_out: U256,
    pub is_token0_in: bool,
}

impl Orientation {
    pub fn amounts_out(&self, amount_out: U256) -> (U256, U256) {
        if self.is_token0_in {
            (U256::ZERO, amount_out)
        } else {
            (amount_out, U256::ZERO)
        }
    }
}

impl Pool {
    pub fn order(&self) -> TokenOrder {
        TokenOrder::new(self.token0, self.token1)
    }

    pub fn symbol(&self) -> String {
        format!("{}/{}", self.symbol0, self.symbol1)
    }

    pub fn has_liquidity(&self) -> bool {
        !self.reserve0.is_zero() && !self.reserve1.is_zero()
    }

    pub fn decimals_of(&self, token: Address) -> Option<u8> {
        if token == self.token0 {
            Some(self.decimals0)
        } else if token == self.token1 {
            Some(self.decimals1)
        } else {
            None
        }
    }

    /// Direction is decided against the observed `token0` only.
    pub fn orient(&self, token_in: Address) -> Option<Orientation> {
        let is_token0_in = self.order().is_token0_in(token_in)?;
        Some(if is_token0_in {
            Orientation {
                token_in,
                token_out: self.token1,
                reserve_in: self.reserve0,
                reserve_out: self.reserve1,
                is_token0_in,
            }
        } else {
            Orientation {
                token_in,
                token_out: self.token0,
                reserve_in: self.reserve1,
                reserve_out: self.reserve0,
                is_token0_in,
            }
        })
    }

    pub fn view(&self) -> PoolView {
        PoolView {
            pair_address: canonical_hex(self.pair),
            token0: canonical_hex(self.token0),
            token1: canonical_hex(self.token1),
            symbol0: self.symbol0.clone(),
            symbol1: self.symbol1.clone(),
            symbol: self.symbol(),
            reserve0: format_base_units(self.reserve0, self.decimals0),
            reserve1: format_base_units(self.reserve1, self.decimals1),
            user_lp: format_base_units(self.user_lp, LP_DECIMALS),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolView {
    pub pair_address: String,
    pub token0: String,
    pub token1: String,
    pub symbol0: String,
    pub symbol1: String,
    pub symbol: String,
    pub reserve0: String,
    pub reserve1: String,
    pub user_lp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenView {
    pub address: String,
    pub symbol: String,
    pub balance: String,
}
