// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::domain::pool::{Pool, Token};
use crate::services::amm::registry::PoolScan;
use alloy::primitives::Address;
use dashmap::DashMap;
use std::sync::RwLock;

/// Latest published Pool/Token snapshots. Entities are replaced whole, never
/// patched; concurrent publishers race and the last write wins.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    pools: DashMap<Address, Pool>,
    pool_order: RwLock<Vec<Address>>,
    tokens: DashMap<Address, Token>,
    token_order: RwLock<Vec<Address>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything with the result of a full scan.
    pub fn publish_scan(&self, scan: &PoolScan) {
        let mut pool_order = self.pool_order.write().unwrap_or_else(|e| e.into_inner());
        let mut token_order = self.token_order.write().unwrap_or_else(|e| e.into_inner());
        self.pools.clear();
        self.tokens.clear();
        pool_order.clear();
        token_order.clear();
        for pool in &scan.pools {
            pool_order.push(pool.pair);
            self.pools.insert(pool.pair, pool.clone());
        }
        for token in &scan.tokens {
            token_order.push(token.address);
            self.tokens.insert(token.address, token.clone());
        }
    }

    /// Replace one pool; unseen pairs are appended after existing ones.
    pub fn replace_pool(&self, pool: Pool) {
        let mut order = self.pool_order.write().unwrap_or_else(|e| e.into_inner());
        if !order.contains(&pool.pair) {
            order.push(pool.pair);
        }
        self.pools.insert(pool.pair, pool);
    }

    pub fn replace_token(&self, token: Token) {
        let mut order = self.token_order.write().unwrap_or_else(|e| e.into_inner());
        if !order.contains(&token.address) {
            order.push(token.address);
        }
        self.tokens.insert(token.address, token);
    }

    pub fn pool(&self, pair: Address) -> Option<Pool> {
        self.pools.get(&pair).map(|entry| entry.value().clone())
    }

    pub fn token(&self, address: Address) -> Option<Token> {
        self.tokens.get(&address).map(|entry| entry.value().clone())
    }

    pub fn pools(&self) -> Vec<Pool> {
        let order = self.pool_order.read().unwrap_or_else(|e| e.into_inner());
        order.iter().filter_map(|pair| self.pool(*pair)).collect()
    }

    pub fn tokens(&self) -> Vec<Token> {
        let order = self.token_order.read().unwrap_or_else(|e| e.into_inner());
        order.iter().filter_map(|addr| self.token(*addr)).collect()
    }

    /// Drop all snapshots when the owning context goes away.
    pub fn clear(&self) {
        self.publish_scan(&PoolScan::default());
    }
}
