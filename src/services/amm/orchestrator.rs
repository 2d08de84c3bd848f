// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::AppError;
use crate::common::parsing::canonical_hex;
use crate::domain::step::{ActionKind, ActionReport, ContractCall, StepReceipt, TransactionStep};
use crate::network::chain::{ChainReader, ChainWriter};
use crate::services::amm::registry::PoolRegistry;
use crate::services::amm::sync::{BalanceSynchronizer, RefreshScope};
use alloy::primitives::{Address, U256};
use std::sync::Arc;
use std::time::Duration;

/// Runs each action as a strict sequence: a step is only submitted after the
/// previous step's receipt confirmed. On failure the remaining steps are
/// abandoned; approvals that already landed stay on chain and are listed in
/// the error's partial report.
pub struct TransactionOrchestrator<R, W> {
    writer: Arc<W>,
    registry: Arc<PoolRegistry<R>>,
    sync: BalanceSynchronizer<R>,
    router: Address,
    receipt_budget: Option<Duration>,
}

impl<R: ChainReader, W: ChainWriter> TransactionOrchestrator<R, W> {
    pub fn new(
        writer: Arc<W>,
        registry: Arc<PoolRegistry<R>>,
        sync: BalanceSynchronizer<R>,
        router: Address,
    ) -> Self {
        Self {
            writer,
            registry,
            sync,
            router,
            receipt_budget: None,
        }
    }

    /// Upper bound on each receipt wait. `None` waits indefinitely.
    pub fn with_receipt_budget(mut self, budget: Option<Duration>) -> Self {
        self.receipt_budget = budget;
        self
    }

    /// approve(token0) -> approve(token1) -> router.addLiquidity
    pub async fn add_liquidity(
        &self,
        token0: Address,
        token1: Address,
        amount0: U256,
        amount1: U256,
        recipient: Address,
    ) -> Result<ActionReport, AppError> {
        require_positive("amount0", amount0)?;
        require_positive("amount1", amount1)?;
        let mut report = ActionReport::new(ActionKind::AddLiquidity);

        self.run_step(
            &mut report,
            "approve token0",
            ContractCall::Approve {
                token: token0,
                spender: self.router,
                amount: amount0,
            },
        )
        .await?;
        self.run_step(
            &mut report,
            "approve token1",
            ContractCall::Approve {
                token: token1,
                spender: self.router,
                amount: amount1,
            },
        )
        .await?;
        self.run_step(
            &mut report,
            "addLiquidity",
            ContractCall::AddLiquidity {
                router: self.router,
                token_a: token0,
                token_b: token1,
                amount_a: amount0,
                amount_b: amount1,
                to: recipient,
            },
        )
        .await?;

        let scope = self
            .registry
            .find_pair(token0, token1)
            .await
            .map(|pair| match pair {
                Some(pair) => RefreshScope::pool(pair, [token0, token1]),
                None => RefreshScope::tokens([token0, token1]),
            });
        Ok(self.finish(report, scope).await)
    }

    /// approve(LP) -> read pair token order -> router.removeLiquidity
    pub async fn remove_liquidity(
        &self,
        pair: Address,
        lp_amount: U256,
        recipient: Address,
    ) -> Result<ActionReport, AppError> {
        require_positive("lp_amount", lp_amount)?;
        let mut report = ActionReport::new(ActionKind::RemoveLiquidity);

        self.run_step(
            &mut report,
            "approve LP",
            ContractCall::Approve {
                token: pair,
                spender: self.router,
                amount: lp_amount,
            },
        )
        .await?;

        let order = self.registry.token_order(pair).await?;
        self.run_step(
            &mut report,
            "removeLiquidity",
            ContractCall::RemoveLiquidity {
                router: self.router,
                token_a: order.token0,
                token_b: order.token1,
                liquidity: lp_amount,
                to: recipient,
            },
        )
        .await?;

        let scope = RefreshScope::pool(pair, [order.token0, order.token1]);
        Ok(self.finish(report, Ok(scope)).await)
    }

    /// approve(pair) -> transfer(pair) -> pair.swap with the output slot picked
    /// from the pair's own token0.
    pub async fn swap(
        &self,
        token_in: Address,
        pair: Address,
        amount_in: U256,
        amount_out: U256,
        recipient: Address,
    ) -> Result<ActionReport, AppError> {
        require_positive("amount_in", amount_in)?;
        require_positive("amount_out", amount_out)?;

        let order = self.registry.token_order(pair).await?;
        let (amount0_out, amount1_out) = order.amounts_out(token_in, amount_out).ok_or_else(|| {
            AppError::NoLiquidity(format!(
                "pair {} does not trade {}",
                canonical_hex(pair),
                canonical_hex(token_in)
            ))
        })?;
        let mut report = ActionReport::new(ActionKind::Swap);

        self.run_step(
            &mut report,
            "approve tokenIn",
            ContractCall::Approve {
                token: token_in,
                spender: pair,
                amount: amount_in,
            },
        )
        .await?;
        self.run_step(
            &mut report,
            "transfer tokenIn",
            ContractCall::Transfer {
                token: token_in,
                to: pair,
                amount: amount_in,
            },
        )
        .await?;
        self.run_step(
            &mut report,
            "swap",
            ContractCall::PairSwap {
                pair,
                amount0_out,
                amount1_out,
                to: recipient,
            },
        )
        .await?;

        let scope = RefreshScope::pool(pair, [order.token0, order.token1]);
        Ok(self.finish(report, Ok(scope)).await)
    }

    /// factory.createPair, then getPair for the address the call does not return.
    pub async fn create_pair(
        &self,
        token_a: Address,
        token_b: Address,
    ) -> Result<(Address, ActionReport), AppError> {
        if token_a == token_b {
            return Err(AppError::Validation {
                field: "token_b".to_string(),
                message: "pair tokens must differ".to_string(),
            });
        }
        let mut report = ActionReport::new(ActionKind::CreatePair);

        self.run_step(
            &mut report,
            "createPair",
            ContractCall::CreatePair {
                factory: self.registry.factory(),
                token_a,
                token_b,
            },
        )
        .await?;

        let pair = self
            .registry
            .find_pair(token_a, token_b)
            .await?
            .ok_or_else(|| {
                AppError::NoLiquidity(format!(
                    "factory reports no pair for {} / {} after createPair",
                    canonical_hex(token_a),
                    canonical_hex(token_b)
                ))
            })?;
        tracing::info!(target: "orchestrator", pair = %canonical_hex(pair), "Pair created");

        let scope = RefreshScope::pool(pair, [token_a, token_b]);
        Ok((pair, self.finish(report, Ok(scope)).await))
    }

    /// Single mint call.
    pub async fn faucet_mint(
        &self,
        token: Address,
        recipient: Address,
        amount: U256,
    ) -> Result<ActionReport, AppError> {
        require_positive("amount", amount)?;
        let mut report = ActionReport::new(ActionKind::FaucetMint);
        self.run_step(
            &mut report,
            "mint",
            ContractCall::Mint {
                token,
                to: recipient,
                amount,
            },
        )
        .await?;
        Ok(self
            .finish(report, Ok(RefreshScope::tokens([token])))
            .await)
    }

    async fn run_step(
        &self,
        report: &mut ActionReport,
        label: &str,
        call: ContractCall,
    ) -> Result<StepReceipt, AppError> {
        let action = report.action;
        let mut step = TransactionStep::new(label, call);
        tracing::info!(
            target: "orchestrator",
            %action,
            step = label,
            method = step.call.method(),
            contract = %canonical_hex(step.call.target()),
            "Submitting step"
        );

        let hash = match self.writer.submit(&step.call).await {
            Ok(hash) => hash,
            Err(e) => {
                let reason = e.chain_message();
                tracing::warn!(target: "orchestrator", %action, step = label, %reason, "Step rejected");
                return Err(AppError::TransactionRejected {
                    action: action.to_string(),
                    step: label.to_string(),
                    reason,
                    report: abandon(report, step),
                });
            }
        };
        step.submitted(hash);

        let waited = match self.receipt_budget {
            Some(budget) => {
                match tokio::time::timeout(budget, self.writer.wait_for_receipt(hash)).await {
                    Ok(result) => result,
                    Err(_) => {
                        tracing::warn!(
                            target: "orchestrator",
                            %action,
                            step = label,
                            hash = %format!("{:#x}", hash),
                            "Receipt wait budget exhausted"
                        );
                        return Err(AppError::ReceiptTimeout {
                            action: action.to_string(),
                            step: label.to_string(),
                            hash: format!("{:#x}", hash),
                            waited_ms: u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
                            report: abandon(report, step),
                        });
                    }
                }
            }
            None => self.writer.wait_for_receipt(hash).await,
        };

        let receipt = match waited {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::warn!(
                    target: "orchestrator",
                    %action,
                    step = label,
                    hash = %format!("{:#x}", hash),
                    error = %e,
                    "Receipt lookup failed"
                );
                return Err(AppError::ReceiptUnavailable {
                    action: action.to_string(),
                    step: label.to_string(),
                    hash: format!("{:#x}", hash),
                    reason: e.to_string(),
                    report: abandon(report, step),
                });
            }
        };

        if !receipt.success {
            tracing::warn!(
                target: "orchestrator",
                %action,
                step = label,
                hash = %format!("{:#x}", hash),
                "Step reverted"
            );
            return Err(AppError::TransactionRejected {
                action: action.to_string(),
                step: label.to_string(),
                reason: format!("transaction {:#x} reverted", hash),
                report: abandon(report, step),
            });
        }

        step.confirmed();
        tracing::debug!(
            target: "orchestrator",
            %action,
            step = label,
            block = ?receipt.block_number,
            "Step confirmed"
        );
        report.steps.push(step);
        Ok(receipt)
    }

    /// Refresh the touched entities; a failed refresh is reported, not raised.
    async fn finish(
        &self,
        mut report: ActionReport,
        scope: Result<RefreshScope, AppError>,
    ) -> ActionReport {
        let refreshed = match scope {
            Ok(scope) => self.sync.refresh(&scope).await,
            Err(e) => Err(e),
        };
        match refreshed {
            Ok(()) => report.refreshed = true,
            Err(e) => {
                tracing::warn!(
                    target: "orchestrator",
                    action = %report.action,
                    error = %e,
                    "Post-action refresh failed; keeping previous snapshots"
                );
            }
        }
        tracing::info!(
            target: "orchestrator",
            action = %report.action,
            steps = report.steps.len(),
            refreshed = report.refreshed,
            "Action complete"
        );
        report
    }
}

/// Marks `step` failed and moves everything recorded so far out of `report`.
fn abandon(report: &mut ActionReport, mut step: TransactionStep) -> Box<ActionReport> {
    step.failed();
    report.steps.push(step);
    let action = report.action;
    Box::new(std::mem::replace(report, ActionReport::new(action)))
}

fn require_positive(field: &str, amount: U256) -> Result<(), AppError> {
    if amount.is_zero() {
        return Err(AppError::Validation {
            field: field.to_string(),
            message: "amount must be greater than zero".to_string(),
        });
    }
    Ok(())
}
