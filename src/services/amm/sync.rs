// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::AppError;
use crate::common::parsing::canonical_hex;
use crate::network::chain::ChainReader;
use crate::services::amm::registry::PoolRegistry;
use crate::services::amm::snapshot::SnapshotStore;
use alloy::primitives::Address;
use std::sync::Arc;

/// Entities touched by one action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshScope {
    pub pair: Option<Address>,
    pub tokens: Vec<Address>,
}

impl RefreshScope {
    pub fn pool(pair: Address, tokens: impl IntoIterator<Item = Address>) -> Self {
        Self {
            pair: Some(pair),
            tokens: tokens.into_iter().collect(),
        }
    }

    pub fn tokens(tokens: impl IntoIterator<Item = Address>) -> Self {
        Self {
            pair: None,
            tokens: tokens.into_iter().collect(),
        }
    }
}

/// Re-reads the entities an action touched and republishes them whole.
pub struct BalanceSynchronizer<R> {
    registry: Arc<PoolRegistry<R>>,
    store: Arc<SnapshotStore>,
    account: Option<Address>,
}

impl<R: ChainReader> BalanceSynchronizer<R> {
    pub fn new(
        registry: Arc<PoolRegistry<R>>,
        store: Arc<SnapshotStore>,
        account: Option<Address>,
    ) -> Self {
        Self {
            registry,
            store,
            account,
        }
    }

    /// All reads complete before anything is published, so a failed refresh
    /// leaves the previous snapshots untouched.
    pub async fn refresh(&self, scope: &RefreshScope) -> Result<(), AppError> {
        let pool = match scope.pair {
            Some(pair) => Some(self.registry.load_pool(pair, self.account).await?),
            None => None,
        };

        let mut tokens = Vec::with_capacity(scope.tokens.len());
        let mut seen = Vec::with_capacity(scope.tokens.len());
        for &address in &scope.tokens {
            if seen.contains(&address) {
                continue;
            }
            seen.push(address);
            tokens.push(self.registry.load_token(address, self.account).await?);
        }

        if let Some(pool) = pool {
            tracing::debug!(
                target: "sync",
                pair = %canonical_hex(pool.pair),
                reserve0 = %pool.reserve0,
                reserve1 = %pool.reserve1,
                "Republishing pool"
            );
            self.store.replace_pool(pool);
        }
        let refreshed_tokens = tokens.len();
        for token in tokens {
            self.store.replace_token(token);
        }
        tracing::debug!(target: "sync", tokens = refreshed_tokens, "Refresh complete");
        Ok(())
    }
}
