// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::AppError;
use crate::common::parsing::canonical_hex;
use crate::domain::constants::{DEFAULT_DECIMALS, DEFAULT_FAUCET_TOKENS};
use crate::domain::pool::Pool;
use crate::domain::step::ActionReport;
use crate::infrastructure::data::token_directory::TokenDirectory;
use crate::network::chain::{ChainReader, ChainWriter};
use crate::services::amm::orchestrator::TransactionOrchestrator;
use crate::services::amm::quote::{self, SwapQuote};
use crate::services::amm::registry::PoolRegistry;
use crate::services::amm::snapshot::SnapshotStore;
use crate::services::amm::sync::BalanceSynchronizer;
use alloy::primitives::{Address, U256};
use std::sync::Arc;
use std::time::Duration;

/// Caller-facing surface: scan, quote and the orchestrated actions, all bound
/// to one signer and one snapshot store.
pub struct AmmClient<R, W> {
    registry: Arc<PoolRegistry<R>>,
    store: Arc<SnapshotStore>,
    orchestrator: TransactionOrchestrator<R, W>,
    account: Address,
    faucet_amount: U256,
}

impl<R: ChainReader, W: ChainWriter> AmmClient<R, W> {
    pub fn new(
        reader: Arc<R>,
        writer: Arc<W>,
        tokens: Arc<TokenDirectory>,
        factory: Address,
        router: Address,
    ) -> Self {
        let account = writer.signer();
        let registry = Arc::new(PoolRegistry::new(reader, factory, tokens));
        let store = Arc::new(SnapshotStore::new());
        let sync = BalanceSynchronizer::new(registry.clone(), store.clone(), Some(account));
        let orchestrator = TransactionOrchestrator::new(writer, registry.clone(), sync, router);
        Self {
            registry,
            store,
            orchestrator,
            account,
            faucet_amount: U256::from(DEFAULT_FAUCET_TOKENS)
                * U256::from(10u64).pow(U256::from(DEFAULT_DECIMALS)),
        }
    }

    pub fn with_receipt_budget(mut self, budget: Option<Duration>) -> Self {
        self.orchestrator = self.orchestrator.with_receipt_budget(budget);
        self
    }

    /// Amount minted by `run_faucet`, in base units. Defaults to 100 tokens
    /// at 18 decimals.
    pub fn with_faucet_amount(mut self, amount: U256) -> Self {
        self.faucet_amount = amount;
        self
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn registry(&self) -> &PoolRegistry<R> {
        self.registry.as_ref()
    }

    pub fn snapshot(&self) -> &SnapshotStore {
        self.store.as_ref()
    }

    /// Full scan for the bound account; the result replaces the store.
    pub async fn scan_pools(&self) -> Result<Vec<Pool>, AppError> {
        let scan = self.registry.scan(Some(self.account)).await?;
        self.store.publish_scan(&scan);
        Ok(scan.pools)
    }

    pub fn quote_swap(
        &self,
        pool: &Pool,
        token_in: Address,
        amount_in: U256,
    ) -> Result<SwapQuote, AppError> {
        quote::quote_swap(pool, token_in, amount_in)
    }

    /// Latest known snapshot of `pair`, read fresh when the store has none.
    pub async fn pool(&self, pair: Address) -> Result<Pool, AppError> {
        match self.store.pool(pair) {
            Some(pool) => Ok(pool),
            None => {
                let pool = self.registry.load_pool(pair, Some(self.account)).await?;
                self.store.replace_pool(pool.clone());
                Ok(pool)
            }
        }
    }

    pub async fn run_add_liquidity(
        &self,
        token0: Address,
        token1: Address,
        amount0: U256,
        amount1: U256,
    ) -> Result<ActionReport, AppError> {
        self.check_token_balance(token0, amount0)?;
        self.check_token_balance(token1, amount1)?;
        self.orchestrator
            .add_liquidity(token0, token1, amount0, amount1, self.account)
            .await
    }

    pub async fn run_remove_liquidity(
        &self,
        pair: Address,
        lp_amount: U256,
    ) -> Result<ActionReport, AppError> {
        if let Some(pool) = self.store.pool(pair) {
            check_available(&pool.symbol(), lp_amount, pool.user_lp)?;
        }
        self.orchestrator
            .remove_liquidity(pair, lp_amount, self.account)
            .await
    }

    /// Quotes against the latest snapshot of `pair` and swaps for exactly that output.
    pub async fn run_swap(
        &self,
        token_in: Address,
        pair: Address,
        amount_in: U256,
    ) -> Result<(SwapQuote, ActionReport), AppError> {
        let pool = self.pool(pair).await?;
        let quote = quote::quote_swap(&pool, token_in, amount_in)?;
        if quote.amount_out.is_zero() {
            return Err(AppError::NoLiquidity(format!(
                "swap of {amount_in} into {} yields nothing",
                canonical_hex(pair)
            )));
        }
        self.check_token_balance(token_in, amount_in)?;
        let report = self
            .orchestrator
            .swap(token_in, pair, amount_in, quote.amount_out, self.account)
            .await?;
        Ok((quote, report))
    }

    pub async fn run_create_pair(
        &self,
        token_a: Address,
        token_b: Address,
    ) -> Result<(Address, ActionReport), AppError> {
        self.orchestrator.create_pair(token_a, token_b).await
    }

    pub async fn run_faucet(&self, token: Address) -> Result<ActionReport, AppError> {
        self.orchestrator
            .faucet_mint(token, self.account, self.faucet_amount)
            .await
    }

    // Advisory only; skipped when the token has no snapshot yet.
    fn check_token_balance(&self, token: Address, required: U256) -> Result<(), AppError> {
        match self.store.token(token) {
            Some(known) => check_available(&known.symbol, required, known.balance),
            None => Ok(()),
        }
    }
}

fn check_available(token: &str, required: U256, available: U256) -> Result<(), AppError> {
    if required > available {
        tracing::debug!(
            target: "orchestrator",
            token,
            %required,
            %available,
            "Rejecting action on last-known balance"
        );
        return Err(AppError::InsufficientBalance {
            token: token.to_string(),
            required: required.to_string(),
            available: available.to_string(),
        });
    }
    Ok(())
}
