// SPDX-License-Identifier: MIT
// In-memory chain double implementing both ChainReader and ChainWriter.
// Calls are recorded in order; faults can be injected per method or per
// submission index (1-based, counting every submit attempt).

#![allow(dead_code)]

use alloy::primitives::{Address, B256, TxHash, U256};
use amm_client::domain::error::AppError;
use amm_client::domain::step::{ContractCall, StepReceipt};
use amm_client::network::{ChainReader, ChainWriter};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

pub const FACTORY: Address = Address::repeat_byte(0xfa);
pub const ROUTER: Address = Address::repeat_byte(0xab);
pub const USER: Address = Address::repeat_byte(0x99);

pub fn units(whole: u64) -> U256 {
    U256::from(whole) * U256::from(10u64).pow(U256::from(18u64))
}

#[derive(Debug, Clone)]
struct PairInfo {
    token0: Address,
    token1: Address,
}

#[derive(Debug, Clone)]
struct TokenInfo {
    symbol: String,
    decimals: u8,
}

#[derive(Default)]
struct State {
    pairs: Vec<Address>,
    pair_info: HashMap<Address, PairInfo>,
    tokens: HashMap<Address, TokenInfo>,
    balances: HashMap<(Address, Address), U256>,
    lp_supply: HashMap<Address, U256>,
    pending: HashMap<TxHash, ContractCall>,
    next_tx: u64,
    log: Vec<String>,
    read_counts: HashMap<(String, Address), usize>,
    fail_reads: HashSet<(String, Option<Address>)>,
    reject_on: HashMap<String, String>,
    revert_on: HashSet<String>,
    hang_on: HashSet<String>,
    submit_count: usize,
    reject_nth: HashMap<usize, String>,
    revert_nth: HashSet<usize>,
    lost_receipts: HashSet<String>,
    pending_index: HashMap<TxHash, usize>,
    pairs_length: Option<u64>,
}

pub struct FakeChain {
    signer: Address,
    state: Mutex<State>,
}

impl FakeChain {
    pub fn new() -> Self {
        Self {
            signer: USER,
            state: Mutex::new(State::default()),
        }
    }

    pub fn add_token(&self, token: Address, symbol: &str, decimals: u8) {
        self.state.lock().unwrap().tokens.insert(
            token,
            TokenInfo {
                symbol: symbol.to_string(),
                decimals,
            },
        );
    }

    /// Registers a pair at the next factory index; reserves are the pair's own balances.
    pub fn add_pair(
        &self,
        pair: Address,
        token0: Address,
        token1: Address,
        reserve0: U256,
        reserve1: U256,
    ) {
        let mut state = self.state.lock().unwrap();
        state.pairs.push(pair);
        state.pair_info.insert(pair, PairInfo { token0, token1 });
        state.balances.insert((token0, pair), reserve0);
        state.balances.insert((token1, pair), reserve1);
        state.tokens.entry(pair).or_insert(TokenInfo {
            symbol: "UNI-V2".to_string(),
            decimals: 18,
        });
    }

    pub fn set_balance(&self, token: Address, owner: Address, amount: U256) {
        self.state
            .lock()
            .unwrap()
            .balances
            .insert((token, owner), amount);
    }

    pub fn set_lp(&self, pair: Address, owner: Address, amount: U256) {
        let mut state = self.state.lock().unwrap();
        state.balances.insert((pair, owner), amount);
        *state.lp_supply.entry(pair).or_default() += amount;
    }

    pub fn balance(&self, token: Address, owner: Address) -> U256 {
        self.state
            .lock()
            .unwrap()
            .balances
            .get(&(token, owner))
            .copied()
            .unwrap_or_default()
    }

    /// Fail `method` reads, on every target when `target` is `None`.
    pub fn fail_read(&self, method: &str, target: Option<Address>) {
        self.state
            .lock()
            .unwrap()
            .fail_reads
            .insert((method.to_string(), target));
    }

    pub fn clear_read_faults(&self) {
        self.state.lock().unwrap().fail_reads.clear();
    }

    /// Signer declines submissions of `method` with `message`.
    pub fn reject_on(&self, method: &str, message: &str) {
        self.state
            .lock()
            .unwrap()
            .reject_on
            .insert(method.to_string(), message.to_string());
    }

    pub fn revert_on(&self, method: &str) {
        self.state
            .lock()
            .unwrap()
            .revert_on
            .insert(method.to_string());
    }

    /// Receipts for `method` never arrive.
    pub fn hang_on(&self, method: &str) {
        self.state.lock().unwrap().hang_on.insert(method.to_string());
    }

    /// Signer declines the `n`th submission with `message`.
    pub fn reject_nth(&self, n: usize, message: &str) {
        self.state
            .lock()
            .unwrap()
            .reject_nth
            .insert(n, message.to_string());
    }

    /// The `n`th submission is mined but reverts.
    pub fn revert_nth(&self, n: usize) {
        self.state.lock().unwrap().revert_nth.insert(n);
    }

    /// Receipt lookups for `method` fail at the node.
    pub fn lose_receipt_on(&self, method: &str) {
        self.state
            .lock()
            .unwrap()
            .lost_receipts
            .insert(method.to_string());
    }

    /// Factory reports `length` pairs regardless of what is registered.
    pub fn set_pairs_length(&self, length: u64) {
        self.state.lock().unwrap().pairs_length = Some(length);
    }

    /// Ordered `submit <method>` / `receipt <method>` entries.
    pub fn log(&self) -> Vec<String> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn submitted_methods(&self) -> Vec<String> {
        self.log()
            .into_iter()
            .filter_map(|entry| entry.strip_prefix("submit ").map(str::to_string))
            .collect()
    }

    pub fn submitted_calls(&self) -> Vec<ContractCall> {
        let state = self.state.lock().unwrap();
        let mut calls: Vec<(TxHash, ContractCall)> = state
            .pending
            .iter()
            .map(|(hash, call)| (*hash, call.clone()))
            .collect();
        calls.sort_by_key(|(hash, _)| *hash);
        calls.into_iter().map(|(_, call)| call).collect()
    }

    pub fn reads(&self, method: &str, target: Address) -> usize {
        self.state
            .lock()
            .unwrap()
            .read_counts
            .get(&(method.to_string(), target))
            .copied()
            .unwrap_or_default()
    }

    fn read(&self, method: &str, target: Address) -> Result<(), AppError> {
        let mut state = self.state.lock().unwrap();
        *state
            .read_counts
            .entry((method.to_string(), target))
            .or_default() += 1;
        if state.fail_reads.contains(&(method.to_string(), Some(target)))
            || state.fail_reads.contains(&(method.to_string(), None))
        {
            return Err(AppError::read_failure(method, target, "injected read fault"));
        }
        Ok(())
    }

    fn pair_info(&self, pair: Address, method: &str) -> Result<PairInfo, AppError> {
        self.state
            .lock()
            .unwrap()
            .pair_info
            .get(&pair)
            .cloned()
            .ok_or_else(|| AppError::read_failure(method, pair, "execution reverted"))
    }

    fn apply(&self, call: &ContractCall) {
        let mut state = self.state.lock().unwrap();
        let signer = self.signer;
        match *call {
            ContractCall::Approve { .. } => {}
            ContractCall::Transfer { token, to, amount } => {
                move_balance(&mut state, token, signer, to, amount);
            }
            ContractCall::Mint { token, to, amount } => {
                *state.balances.entry((token, to)).or_default() += amount;
            }
            ContractCall::PairSwap {
                pair,
                amount0_out,
                amount1_out,
                to,
            } => {
                if let Some(info) = state.pair_info.get(&pair).cloned() {
                    move_balance(&mut state, info.token0, pair, to, amount0_out);
                    move_balance(&mut state, info.token1, pair, to, amount1_out);
                }
            }
            ContractCall::AddLiquidity {
                token_a,
                token_b,
                amount_a,
                amount_b,
                to,
                ..
            } => {
                if let Some(pair) = find_pair(&state, token_a, token_b) {
                    move_balance(&mut state, token_a, signer, pair, amount_a);
                    move_balance(&mut state, token_b, signer, pair, amount_b);
                    let minted = amount_a.min(amount_b);
                    *state.balances.entry((pair, to)).or_default() += minted;
                    *state.lp_supply.entry(pair).or_default() += minted;
                }
            }
            ContractCall::RemoveLiquidity {
                token_a,
                token_b,
                liquidity,
                to,
                ..
            } => {
                if let Some(pair) = find_pair(&state, token_a, token_b) {
                    let supply = state.lp_supply.get(&pair).copied().unwrap_or_default();
                    if supply.is_zero() {
                        return;
                    }
                    let reserve_a = state.balances.get(&(token_a, pair)).copied().unwrap_or_default();
                    let reserve_b = state.balances.get(&(token_b, pair)).copied().unwrap_or_default();
                    let out_a = reserve_a * liquidity / supply;
                    let out_b = reserve_b * liquidity / supply;
                    move_balance(&mut state, pair, signer, Address::ZERO, liquidity);
                    state.lp_supply.insert(pair, supply - liquidity);
                    move_balance(&mut state, token_a, pair, to, out_a);
                    move_balance(&mut state, token_b, pair, to, out_b);
                }
            }
            ContractCall::CreatePair {
                token_a, token_b, ..
            } => {
                if find_pair(&state, token_a, token_b).is_none() {
                    let (token0, token1) = if token_a < token_b {
                        (token_a, token_b)
                    } else {
                        (token_b, token_a)
                    };
                    let index = u8::try_from(state.pairs.len()).unwrap_or(u8::MAX);
                    let pair = Address::with_last_byte(0xe0_u8.wrapping_add(index));
                    state.pairs.push(pair);
                    state.pair_info.insert(pair, PairInfo { token0, token1 });
                }
            }
        }
    }
}

fn move_balance(state: &mut State, token: Address, from: Address, to: Address, amount: U256) {
    let source = state.balances.entry((token, from)).or_default();
    *source = source.saturating_sub(amount);
    *state.balances.entry((token, to)).or_default() += amount;
}

fn find_pair(state: &State, a: Address, b: Address) -> Option<Address> {
    state.pairs.iter().copied().find(|pair| {
        state.pair_info.get(pair).is_some_and(|info| {
            (info.token0 == a && info.token1 == b) || (info.token0 == b && info.token1 == a)
        })
    })
}

impl ChainReader for FakeChain {
    async fn all_pairs_length(&self, factory: Address) -> Result<u64, AppError> {
        self.read("allPairsLength", factory)?;
        let state = self.state.lock().unwrap();
        Ok(state.pairs_length.unwrap_or(state.pairs.len() as u64))
    }

    async fn all_pairs(&self, factory: Address, index: u64) -> Result<Address, AppError> {
        self.read("allPairs", factory)?;
        let state = self.state.lock().unwrap();
        state
            .pairs
            .get(index as usize)
            .copied()
            .ok_or_else(|| AppError::read_failure("allPairs", factory, "index out of range"))
    }

    async fn get_pair(
        &self,
        factory: Address,
        token_a: Address,
        token_b: Address,
    ) -> Result<Address, AppError> {
        self.read("getPair", factory)?;
        let state = self.state.lock().unwrap();
        Ok(find_pair(&state, token_a, token_b).unwrap_or(Address::ZERO))
    }

    async fn token0(&self, pair: Address) -> Result<Address, AppError> {
        self.read("token0", pair)?;
        Ok(self.pair_info(pair, "token0")?.token0)
    }

    async fn token1(&self, pair: Address) -> Result<Address, AppError> {
        self.read("token1", pair)?;
        Ok(self.pair_info(pair, "token1")?.token1)
    }

    async fn get_reserves(&self, pair: Address) -> Result<(U256, U256), AppError> {
        self.read("getReserves", pair)?;
        let info = self.pair_info(pair, "getReserves")?;
        Ok((self.balance(info.token0, pair), self.balance(info.token1, pair)))
    }

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256, AppError> {
        self.read("balanceOf", token)?;
        Ok(self.balance(token, owner))
    }

    async fn symbol(&self, token: Address) -> Result<String, AppError> {
        self.read("symbol", token)?;
        self.state
            .lock()
            .unwrap()
            .tokens
            .get(&token)
            .map(|info| info.symbol.clone())
            .ok_or_else(|| AppError::read_failure("symbol", token, "execution reverted"))
    }

    async fn decimals(&self, token: Address) -> Result<u8, AppError> {
        self.read("decimals", token)?;
        self.state
            .lock()
            .unwrap()
            .tokens
            .get(&token)
            .map(|info| info.decimals)
            .ok_or_else(|| AppError::read_failure("decimals", token, "execution reverted"))
    }
}

impl ChainWriter for FakeChain {
    fn signer(&self) -> Address {
        self.signer
    }

    async fn submit(&self, call: &ContractCall) -> Result<TxHash, AppError> {
        let method = call.method();
        let mut state = self.state.lock().unwrap();
        state.log.push(format!("submit {method}"));
        state.submit_count += 1;
        let index = state.submit_count;
        if let Some(message) = state
            .reject_on
            .get(method)
            .or_else(|| state.reject_nth.get(&index))
        {
            return Err(AppError::Submission(message.clone()));
        }
        state.next_tx += 1;
        let hash = B256::from(U256::from(state.next_tx));
        state.pending.insert(hash, call.clone());
        state.pending_index.insert(hash, index);
        Ok(hash)
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> Result<StepReceipt, AppError> {
        let (call, hang, revert) = {
            let state = self.state.lock().unwrap();
            let call = state
                .pending
                .get(&hash)
                .cloned()
                .ok_or_else(|| AppError::Connection(format!("unknown tx {hash:#x}")))?;
            let method = call.method();
            if state.lost_receipts.contains(method) {
                return Err(AppError::Connection(format!(
                    "receipt lookup for {hash:#x} failed: node unavailable"
                )));
            }
            let index = state.pending_index.get(&hash).copied().unwrap_or_default();
            (
                call,
                state.hang_on.contains(method),
                state.revert_on.contains(method) || state.revert_nth.contains(&index),
            )
        };
        if hang {
            std::future::pending::<()>().await;
        }
        let success = !revert;
        if success {
            self.apply(&call);
        }
        let mut state = self.state.lock().unwrap();
        state.log.push(format!("receipt {}", call.method()));
        Ok(StepReceipt {
            hash,
            block_number: Some(state.next_tx),
            success,
        })
    }
}
