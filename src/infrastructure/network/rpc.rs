// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use crate::common::error::AppError;
use crate::domain::step::{ContractCall, StepReceipt};
use crate::infrastructure::data::abi::{MiniRouter, MintableErc20, UniswapV2Factory, UniswapV2Pair};
use crate::network::chain::{ChainReader, ChainWriter};
use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::providers::Provider;
use std::time::Duration;

/// `ChainReader` over any alloy provider.
#[derive(Clone)]
pub struct RpcChainReader<P> {
    provider: P,
}

impl<P> RpcChainReader<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P> ChainReader for RpcChainReader<P>
where
    P: Provider + Clone + 'static,
{
    async fn all_pairs_length(&self, factory: Address) -> Result<u64, AppError> {
        let contract = UniswapV2Factory::new(factory, self.provider.clone());
        let length: U256 = contract
            .allPairsLength()
            .call()
            .await
            .map_err(|e| AppError::read_failure("allPairsLength", factory, e))?;
        u64::try_from(length).map_err(|_| {
            AppError::read_failure("allPairsLength", factory, format!("{length} exceeds u64"))
        })
    }

    async fn all_pairs(&self, factory: Address, index: u64) -> Result<Address, AppError> {
        let contract = UniswapV2Factory::new(factory, self.provider.clone());
        contract
            .allPairs(U256::from(index))
            .call()
            .await
            .map_err(|e| AppError::read_failure("allPairs", factory, e))
    }

    async fn get_pair(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
    ) -> Result<Address, AppError> {
        let contract = UniswapV2Factory::new(factory, self.provider.clone());
        contract
            .getPair(token_a, token_b)
            .call()
            .await
            .map_err(|e| AppError::read_failure("getPair", factory, e))
    }

    async fn token0(&self, pair: Address) -> Result<Address, AppError> {
        let contract = UniswapV2Pair::new(pair, self.provider.clone());
        contract
            .token0()
            .call()
            .await
            .map_err(|e| AppError::read_failure("token0", pair, e))
    }

    async fn token1(&self, pair: Address) -> Result<Address, AppError> {
        let contract = UniswapV2Pair::new(pair, self.provider.clone());
        contract
            .token1()
            .call()
            .await
            .map_err(|e| AppError::read_failure("token1", pair, e))
    }

    async fn get_reserves(&self, pair: Address) -> Result<(U256, U256), AppError> {
        let contract = UniswapV2Pair::new(pair, self.provider.clone());
        let reserves = contract
            .getReserves()
            .call()
            .await
            .map_err(|e| AppError::read_failure("getReserves", pair, e))?;
        Ok((U256::from(reserves.reserve0), U256::from(reserves.reserve1)))
    }

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, AppError> {
        let contract = MintableErc20::new(token, self.provider.clone());
        contract
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| AppError::read_failure("balanceOf", token, e))
    }

    async fn symbol(&self, token: Address) -> Result<String, AppError> {
        let contract = MintableErc20::new(token, self.provider.clone());
        contract
            .symbol()
            .call()
            .await
            .map_err(|e| AppError::read_failure("symbol", token, e))
    }

    async fn decimals(&self, token: Address) -> Result<u8, AppError> {
        let contract = MintableErc20::new(token, self.provider.clone());
        contract
            .decimals()
            .call()
            .await
            .map_err(|e| AppError::read_failure("decimals", token, e))
    }
}

/// `ChainWriter` over a wallet-filled alloy provider.
#[derive(Clone)]
pub struct RpcChainWriter<P> {
    provider: P,
    signer: Address,
    poll_interval: Duration,
}

impl<P> RpcChainWriter<P> {
    pub fn new(provider: P, signer: Address, poll_interval: Duration) -> Self {
        Self {
            provider,
            signer,
            poll_interval: poll_interval.max(Duration::from_millis(1)),
        }
    }
}

impl<P> ChainWriter for RpcChainWriter<P>
where
    P: Provider + Clone + 'static,
{
    fn signer(&self) -> Address {
        self.signer
    }

    async fn submit(&self, call: &ContractCall) -> Result<TxHash, AppError> {
        let sent = match *call {
            ContractCall::Approve {
                token,
                spender,
                amount,
            } => {
                let erc20 = MintableErc20::new(token, self.provider.clone());
                erc20.approve(spender, amount).from(self.signer).send().await
            }
            ContractCall::Transfer { token, to, amount } => {
                let erc20 = MintableErc20::new(token, self.provider.clone());
                erc20.transfer(to, amount).from(self.signer).send().await
            }
            ContractCall::Mint { token, to, amount } => {
                let erc20 = MintableErc20::new(token, self.provider.clone());
                erc20.mint(to, amount).from(self.signer).send().await
            }
            ContractCall::PairSwap {
                pair,
                amount0_out,
                amount1_out,
                to,
            } => {
                let contract = UniswapV2Pair::new(pair, self.provider.clone());
                contract
                    .swap(amount0_out, amount1_out, to, Bytes::new())
                    .from(self.signer)
                    .send()
                    .await
            }
            ContractCall::AddLiquidity {
                router,
                token_a,
                token_b,
                amount_a,
                amount_b,
                to,
            } => {
                let contract = MiniRouter::new(router, self.provider.clone());
                contract
                    .addLiquidity(token_a, token_b, amount_a, amount_b, to)
                    .from(self.signer)
                    .send()
                    .await
            }
            ContractCall::RemoveLiquidity {
                router,
                token_a,
                token_b,
                liquidity,
                to,
            } => {
                let contract = MiniRouter::new(router, self.provider.clone());
                contract
                    .removeLiquidity(token_a, token_b, liquidity, to)
                    .from(self.signer)
                    .send()
                    .await
            }
            ContractCall::CreatePair {
                factory,
                token_a,
                token_b,
            } => {
                let contract = UniswapV2Factory::new(factory, self.provider.clone());
                contract
                    .createPair(token_a, token_b)
                    .from(self.signer)
                    .send()
                    .await
            }
        };

        let pending = sent.map_err(|e| AppError::Submission(e.to_string()))?;
        let hash = *pending.tx_hash();
        tracing::debug!(
            target: "provider",
            method = call.method(),
            target_address = %format!("{:#x}", call.target()),
            hash = %format!("{:#x}", hash),
            "Transaction submitted"
        );
        Ok(hash)
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<StepReceipt, AppError> {
        loop {
            let receipt = self
                .provider
                .get_transaction_receipt(hash)
                .await
                .map_err(|e| {
                    AppError::Connection(format!("receipt lookup for {:#x} failed: {}", hash, e))
                })?;
            if let Some(rcpt) = receipt {
                return Ok(StepReceipt {
                    hash,
                    block_number: rcpt.block_number,
                    success: rcpt.status(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }
}
