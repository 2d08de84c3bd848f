// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::AppError;
use crate::common::parsing::canonical_hex;
use crate::domain::pool::{Pool, Token, TokenOrder};
use crate::infrastructure::data::token_directory::{TokenDirectory, TokenLookup};
use crate::network::chain::ChainReader;
use alloy::primitives::{Address, U256};
use std::sync::Arc;

const SCAN_PREALLOC: u64 = 1024;

/// Result of one full factory scan.
#[derive(Debug, Clone, Default)]
pub struct PoolScan {
    /// One pool per factory index, in index order.
    pub pools: Vec<Pool>,
    /// Distinct tokens across all pools, first-seen order.
    pub tokens: Vec<Token>,
}

/// Enumerates pools from the factory and owns the authoritative token order
/// of every pair. Nothing downstream derives `token0`/`token1` on its own.
pub struct PoolRegistry<R> {
    reader: Arc<R>,
    factory: Address,
    tokens: Arc<TokenDirectory>,
}

impl<R: ChainReader> PoolRegistry<R> {
    pub fn new(reader: Arc<R>, factory: Address, tokens: Arc<TokenDirectory>) -> Self {
        Self {
            reader,
            factory,
            tokens,
        }
    }

    pub fn factory(&self) -> Address {
        self.factory
    }

    /// Full scan over `0..allPairsLength()`. Any failed read aborts the whole
    /// scan with that error; no partial result is returned.
    pub async fn scan(&self, account: Option<Address>) -> Result<PoolScan, AppError> {
        let reader = self.reader.as_ref();
        let length = reader.all_pairs_length(self.factory).await?;
        tracing::debug!(
            target: "registry",
            factory = %canonical_hex(self.factory),
            length,
            "Scanning pools"
        );

        let mut lookup = self.tokens.lookup(reader);
        // Chain-reported length; never trusted as an allocation size.
        let capacity = usize::try_from(length.min(SCAN_PREALLOC)).unwrap_or_default();
        let mut pools = Vec::with_capacity(capacity);
        for index in 0..length {
            let pair = reader.all_pairs(self.factory, index).await?;
            let pool = self
                .read_pool(pair, account, &mut lookup)
                .await
                .inspect_err(|e| {
                    tracing::warn!(
                        target: "registry",
                        index,
                        pair = %canonical_hex(pair),
                        error = %e,
                        "Pool read failed; aborting scan"
                    );
                })?;
            pools.push(pool);
        }

        let tokens = lookup.into_tokens(account).await?;
        tracing::info!(
            target: "registry",
            pools = pools.len(),
            tokens = tokens.len(),
            "Pool scan complete"
        );
        Ok(PoolScan { pools, tokens })
    }

    /// Convenience wrapper returning only the pools.
    pub async fn scan_pools(&self, account: Option<Address>) -> Result<Vec<Pool>, AppError> {
        Ok(self.scan(account).await?.pools)
    }

    /// Fresh snapshot of a single pair.
    pub async fn load_pool(&self, pair: Address, account: Option<Address>) -> Result<Pool, AppError> {
        let mut lookup = self.tokens.lookup(self.reader.as_ref());
        self.read_pool(pair, account, &mut lookup).await
    }

    pub async fn load_token(
        &self,
        token: Address,
        account: Option<Address>,
    ) -> Result<Token, AppError> {
        self.tokens
            .load_token(self.reader.as_ref(), token, account)
            .await
    }

    /// `(token0, token1)` exactly as the pair reports them.
    pub async fn token_order(&self, pair: Address) -> Result<TokenOrder, AppError> {
        let token0 = self.reader.token0(pair).await?;
        let token1 = self.reader.token1(pair).await?;
        Ok(TokenOrder::new(token0, token1))
    }

    /// Pair for two tokens in either order; `None` when the factory has none.
    pub async fn find_pair(
        &self,
        token_a: Address,
        token_b: Address,
    ) -> Result<Option<Address>, AppError> {
        let pair = self
            .reader
            .get_pair(self.factory, token_a, token_b)
            .await?;
        Ok((!pair.is_zero()).then_some(pair))
    }

    async fn read_pool(
        &self,
        pair: Address,
        account: Option<Address>,
        lookup: &mut TokenLookup<'_, R>,
    ) -> Result<Pool, AppError> {
        let TokenOrder { token0, token1 } = self.token_order(pair).await?;
        let (reserve0, reserve1) = self.reader.get_reserves(pair).await?;
        let user_lp = match account {
            Some(owner) => self.reader.balance_of(pair, owner).await?,
            None => U256::ZERO,
        };
        let meta0 = lookup.meta(token0).await?;
        let meta1 = lookup.meta(token1).await?;

        Ok(Pool {
            pair,
            token0,
            token1,
            symbol0: meta0.symbol,
            symbol1: meta1.symbol,
            decimals0: meta0.decimals,
            decimals1: meta1.decimals,
            reserve0,
            reserve1,
            user_lp,
        })
    }
}
