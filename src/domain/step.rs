// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::parsing::canonical_hex;
use alloy::primitives::{Address, TxHash, U256};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    AddLiquidity,
    RemoveLiquidity,
    Swap,
    FaucetMint,
    CreatePair,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionKind::AddLiquidity => "addLiquidity",
            ActionKind::RemoveLiquidity => "removeLiquidity",
            ActionKind::Swap => "swap",
            ActionKind::FaucetMint => "faucetMint",
            ActionKind::CreatePair => "createPair",
        };
        f.write_str(name)
    }
}

/// One state-changing contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractCall {
    Approve {
        token: Address,
        spender: Address,
        amount: U256,
    },
    Transfer {
        token: Address,
        to: Address,
        amount: U256,
    },
    Mint {
        token: Address,
        to: Address,
        amount: U256,
    },
    PairSwap {
        pair: Address,
        amount0_out: U256,
        amount1_out: U256,
        to: Address,
    },
    AddLiquidity {
        router: Address,
        token_a: Address,
        token_b: Address,
        amount_a: U256,
        amount_b: U256,
        to: Address,
    },
    RemoveLiquidity {
        router: Address,
        token_a: Address,
        token_b: Address,
        liquidity: U256,
        to: Address,
    },
    CreatePair {
        factory: Address,
        token_a: Address,
        token_b: Address,
    },
}

impl ContractCall {
    /// Contract method name.
    pub fn method(&self) -> &'static str {
        match self {
            ContractCall::Approve { .. } => "approve",
            ContractCall::Transfer { .. } => "transfer",
            ContractCall::Mint { .. } => "mint",
            ContractCall::PairSwap { .. } => "swap",
            ContractCall::AddLiquidity { .. } => "addLiquidity",
            ContractCall::RemoveLiquidity { .. } => "removeLiquidity",
            ContractCall::CreatePair { .. } => "createPair",
        }
    }

    /// Contract the call is sent to.
    pub fn target(&self) -> Address {
        match *self {
            ContractCall::Approve { token, .. }
            | ContractCall::Transfer { token, .. }
            | ContractCall::Mint { token, .. } => token,
            ContractCall::PairSwap { pair, .. } => pair,
            ContractCall::AddLiquidity { router, .. }
            | ContractCall::RemoveLiquidity { router, .. } => router,
            ContractCall::CreatePair { factory, .. } => factory,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepState {
    Pending,
    Submitted,
    Confirmed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionStep {
    pub label: String,
    pub call: ContractCall,
    pub state: StepState,
    pub hash: Option<TxHash>,
}

impl TransactionStep {
    pub fn new(label: impl Into<String>, call: ContractCall) -> Self {
        Self {
            label: label.into(),
            call,
            state: StepState::Pending,
            hash: None,
        }
    }

    pub fn submitted(&mut self, hash: TxHash) {
        self.hash = Some(hash);
        self.state = StepState::Submitted;
    }

    pub fn confirmed(&mut self) {
        self.state = StepState::Confirmed;
    }

    pub fn failed(&mut self) {
        self.state = StepState::Failed;
    }
}

/// Outcome of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReceipt {
    pub hash: TxHash,
    pub block_number: Option<u64>,
    pub success: bool,
}

/// Steps of one action in submission order. A failed action returns this
/// inside its error, with the failing step last.
#[derive(Debug, Clone)]
pub struct ActionReport {
    pub action: ActionKind,
    pub steps: Vec<TransactionStep>,
    /// False when the post-action refresh failed; prior snapshots were kept.
    pub refreshed: bool,
}

impl ActionReport {
    pub fn new(action: ActionKind) -> Self {
        Self {
            action,
            steps: Vec::new(),
            refreshed: false,
        }
    }

    pub fn view(&self) -> ActionReportView {
        ActionReportView {
            action: self.action,
            refreshed: self.refreshed,
            steps: self
                .steps
                .iter()
                .map(|step| StepView {
                    label: step.label.clone(),
                    method: step.call.method(),
                    target: canonical_hex(step.call.target()),
                    state: step.state,
                    hash: step.hash.map(|h| format!("{:#x}", h)),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionReportView {
    pub action: ActionKind,
    pub refreshed: bool,
    pub steps: Vec<StepView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepView {
    pub label: String,
    pub method: &'static str,
    pub target: String,
    pub state: StepState,
    pub hash: Option<String>,
}
