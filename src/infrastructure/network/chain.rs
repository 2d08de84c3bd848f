// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

//! Explicit chain client handles. Components receive these at construction
//! instead of reaching for a process-wide provider.

use crate::common::error::AppError;
use crate::domain::step::{ContractCall, StepReceipt};
use alloy::primitives::{Address, TxHash, U256};
use std::future::Future;

/// Read-only contract calls. Every call is one RPC round trip.
pub trait ChainReader: Send + Sync {
    fn all_pairs_length(
        &self,
        factory: Address,
    ) -> impl Future<Output = Result<u64, AppError>> + Send;

    fn all_pairs(
        &self,
        factory: Address,
        index: u64,
    ) -> impl Future<Output = Result<Address, AppError>> + Send;

    /// Zero address when no pair exists.
    fn get_pair(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
    ) -> impl Future<Output = Result<Address, AppError>> + Send;

    fn token0(&self, pair: Address) -> impl Future<Output = Result<Address, AppError>> + Send;

    fn token1(&self, pair: Address) -> impl Future<Output = Result<Address, AppError>> + Send;

    /// `(reserve0, reserve1)` in the pair's own token order.
    fn get_reserves(
        &self,
        pair: Address,
    ) -> impl Future<Output = Result<(U256, U256), AppError>> + Send;

    fn balance_of(
        &self,
        token: Address,
        owner: Address,
    ) -> impl Future<Output = Result<U256, AppError>> + Send;

    fn symbol(&self, token: Address) -> impl Future<Output = Result<String, AppError>> + Send;

    fn decimals(&self, token: Address) -> impl Future<Output = Result<u8, AppError>> + Send;
}

/// Signer-bound submission. Nonces are assigned by the signer, so one writer
/// must not run two sequences at once without outside serialization.
pub trait ChainWriter: Send + Sync {
    fn signer(&self) -> Address;

    /// Broadcast `call`; resolves once the node accepted it.
    fn submit(&self, call: &ContractCall)
    -> impl Future<Output = Result<TxHash, AppError>> + Send;

    /// Resolves when the receipt is observed. Never times out on its own.
    fn wait_for_receipt(
        &self,
        hash: TxHash,
    ) -> impl Future<Output = Result<StepReceipt, AppError>> + Send;
}
