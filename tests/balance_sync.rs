// SPDX-License-Identifier: MIT
// Post-action refresh: entities are re-read and replaced whole, and a failed
// refresh leaves the previous snapshots in place.

mod support;

use alloy::primitives::Address;
use amm_client::infrastructure::data::token_directory::TokenDirectory;
use amm_client::services::amm::{
    BalanceSynchronizer, PoolRegistry, RefreshScope, SnapshotStore, TransactionOrchestrator,
};
use std::sync::Arc;
use support::{FACTORY, FakeChain, ROUTER, USER, units};

const TKA: Address = Address::repeat_byte(0x0a);
const TKB: Address = Address::repeat_byte(0x0b);
const PAIR: Address = Address::repeat_byte(0x10);
const OTHER_PAIR: Address = Address::repeat_byte(0x20);

struct Harness {
    chain: Arc<FakeChain>,
    registry: Arc<PoolRegistry<FakeChain>>,
    store: Arc<SnapshotStore>,
}

fn harness() -> Harness {
    let chain = FakeChain::new();
    chain.add_token(TKA, "TKA", 18);
    chain.add_token(TKB, "TKB", 18);
    chain.add_pair(PAIR, TKA, TKB, units(100), units(200));
    chain.add_pair(OTHER_PAIR, TKB, TKA, units(1), units(1));
    chain.set_balance(TKA, USER, units(50));
    let chain = Arc::new(chain);
    let registry = Arc::new(PoolRegistry::new(
        chain.clone(),
        FACTORY,
        Arc::new(TokenDirectory::new()),
    ));
    Harness {
        chain,
        registry,
        store: Arc::new(SnapshotStore::new()),
    }
}

impl Harness {
    fn sync(&self) -> BalanceSynchronizer<FakeChain> {
        BalanceSynchronizer::new(self.registry.clone(), self.store.clone(), Some(USER))
    }

    async fn publish_scan(&self) {
        let scan = self.registry.scan(Some(USER)).await.unwrap();
        self.store.publish_scan(&scan);
    }
}

#[tokio::test]
async fn refresh_replaces_touched_pool_and_tokens_only() {
    let h = harness();
    h.publish_scan().await;
    let untouched = h.store.pool(OTHER_PAIR).unwrap();

    h.chain.set_balance(TKA, PAIR, units(110));
    h.chain.set_balance(TKA, USER, units(40));
    h.sync()
        .refresh(&RefreshScope::pool(PAIR, [TKA, TKB]))
        .await
        .unwrap();

    let pool = h.store.pool(PAIR).unwrap();
    assert_eq!(pool.reserve0, units(110));
    assert_eq!(pool.reserve1, units(200));
    assert_eq!(h.store.token(TKA).unwrap().balance, units(40));
    assert_eq!(h.store.pool(OTHER_PAIR).unwrap(), untouched);
    // Index order survives a per-pool replacement.
    let pairs: Vec<Address> = h.store.pools().iter().map(|p| p.pair).collect();
    assert_eq!(pairs, vec![PAIR, OTHER_PAIR]);
}

#[tokio::test]
async fn duplicate_scope_tokens_are_read_once() {
    let h = harness();
    h.sync()
        .refresh(&RefreshScope::tokens([TKA, TKA, TKB]))
        .await
        .unwrap();
    assert_eq!(h.chain.reads("symbol", TKA), 1);
    assert_eq!(h.store.tokens().len(), 2);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_snapshots() {
    let h = harness();
    h.publish_scan().await;
    let before_pool = h.store.pool(PAIR).unwrap();
    let before_token = h.store.token(TKA).unwrap();

    h.chain.set_balance(TKA, PAIR, units(999));
    h.chain.set_balance(TKA, USER, units(1));
    // Pool reads succeed; the second token balance read fails afterwards.
    h.chain.fail_read("balanceOf", Some(TKB));

    let result = h
        .sync()
        .refresh(&RefreshScope::pool(PAIR, [TKA, TKB]))
        .await;
    assert!(result.is_err());
    assert_eq!(h.store.pool(PAIR).unwrap(), before_pool);
    assert_eq!(h.store.token(TKA).unwrap(), before_token);
}

#[tokio::test]
async fn action_survives_a_failed_refresh() {
    let h = harness();
    h.publish_scan().await;
    let orchestrator =
        TransactionOrchestrator::new(h.chain.clone(), h.registry.clone(), h.sync(), ROUTER);
    h.chain.fail_read("balanceOf", None);

    let report = orchestrator.faucet_mint(TKA, USER, units(100)).await.unwrap();

    assert!(!report.refreshed);
    assert_eq!(report.steps.len(), 1);
    assert_eq!(h.store.token(TKA).unwrap().balance, units(50));
    h.chain.clear_read_faults();
    assert_eq!(h.chain.balance(TKA, USER), units(150));
}
