// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@oxidity.com>

use std::collections::HashMap;
use std::fs;

use alloy::primitives::{Address, U256};
use serde::Deserialize;

use crate::common::parsing::parse_address_hex;
use crate::domain::constants::DEFAULT_DECIMALS;
use crate::domain::error::AppError;
use crate::domain::pool::{Token, TokenMeta};
use crate::network::chain::ChainReader;

/// Token metadata source: an optional preloaded token list, with RPC reads
/// (`symbol`, `decimals`) for anything not listed.
#[derive(Debug, Clone, Default)]
pub struct TokenDirectory {
    preset: HashMap<Address, TokenMeta>,
}

#[derive(Deserialize)]
struct TokenEntry {
    address: String,
    symbol: String,
    #[serde(default = "default_decimals")]
    decimals: u8,
}

fn default_decimals() -> u8 {
    DEFAULT_DECIMALS
}

impl TokenDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// `[{"address": "0x..", "symbol": "TKA", "decimals": 18}, ...]`
    pub fn load_from_file(path: &str) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read tokenlist {path}: {e}")))?;
        let entries: Vec<TokenEntry> = serde_json::from_str(&raw)
            .map_err(|e| AppError::Config(format!("Invalid tokenlist JSON {path}: {e}")))?;

        let mut metas = Vec::with_capacity(entries.len());
        for entry in entries {
            let address = parse_address_hex(&entry.address).map_err(|_| {
                AppError::Config(format!(
                    "Invalid token address {} in tokenlist {path}",
                    entry.address
                ))
            })?;
            metas.push(TokenMeta {
                address,
                symbol: entry.symbol,
                decimals: entry.decimals,
            });
        }
        tracing::info!(target: "tokens", path, count = metas.len(), "Loaded tokenlist");
        Ok(Self::from_entries(metas))
    }

    pub fn from_entries(entries: impl IntoIterator<Item = TokenMeta>) -> Self {
        Self {
            preset: entries
                .into_iter()
                .map(|meta| (meta.address, meta))
                .collect(),
        }
    }

    pub fn preset(&self, address: Address) -> Option<&TokenMeta> {
        self.preset.get(&address)
    }

    /// Uncached resolution; each call costs up to two reads.
    pub async fn resolve<R: ChainReader>(
        &self,
        reader: &R,
        token: Address,
    ) -> Result<TokenMeta, AppError> {
        if let Some(meta) = self.preset(token) {
            return Ok(meta.clone());
        }
        let symbol = reader.symbol(token).await?;
        let decimals = reader.decimals(token).await?;
        tracing::trace!(
            target: "tokens",
            token = %format!("{:#x}", token),
            %symbol,
            decimals,
            "Resolved token metadata"
        );
        Ok(TokenMeta {
            address: token,
            symbol,
            decimals,
        })
    }

    /// Token snapshot for `account`; zero balance when no account is given.
    pub async fn load_token<R: ChainReader>(
        &self,
        reader: &R,
        token: Address,
        account: Option<Address>,
    ) -> Result<Token, AppError> {
        let meta = self.resolve(reader, token).await?;
        let balance = match account {
            Some(owner) => reader.balance_of(token, owner).await?,
            None => U256::ZERO,
        };
        Ok(Token::from_meta(&meta, balance))
    }

    /// Per-scan memo so a token shared by many pools is resolved once.
    pub fn lookup<'a, R: ChainReader>(&'a self, reader: &'a R) -> TokenLookup<'a, R> {
        TokenLookup {
            directory: self,
            reader,
            seen: HashMap::new(),
            order: Vec::new(),
        }
    }
}

pub struct TokenLookup<'a, R> {
    directory: &'a TokenDirectory,
    reader: &'a R,
    seen: HashMap<Address, TokenMeta>,
    order: Vec<Address>,
}

impl<R: ChainReader> TokenLookup<'_, R> {
    pub async fn meta(&mut self, token: Address) -> Result<TokenMeta, AppError> {
        if let Some(meta) = self.seen.get(&token) {
            return Ok(meta.clone());
        }
        let meta = self.directory.resolve(self.reader, token).await?;
        self.order.push(token);
        self.seen.insert(token, meta.clone());
        Ok(meta)
    }

    /// Distinct tokens in first-seen order.
    pub fn resolved(&self) -> Vec<TokenMeta> {
        self.order
            .iter()
            .filter_map(|addr| self.seen.get(addr).cloned())
            .collect()
    }

    /// Token snapshots for every distinct token seen, one balance read each.
    pub async fn into_tokens(self, account: Option<Address>) -> Result<Vec<Token>, AppError> {
        let mut tokens = Vec::with_capacity(self.order.len());
        for meta in self.resolved() {
            let balance = match account {
                Some(owner) => self.reader.balance_of(meta.address, owner).await?,
                None => U256::ZERO,
            };
            tokens.push(Token::from_meta(&meta, balance));
        }
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn tokenlist_presets_are_keyed_by_address() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"address":"0x0101010101010101010101010101010101010101","symbol":"TKA","decimals":6}},
               {{"address":"0X0202020202020202020202020202020202020202","symbol":"TKB"}}]"#
        )
        .unwrap();

        let directory = TokenDirectory::load_from_file(file.path().to_str().unwrap()).unwrap();
        let a = directory.preset(Address::repeat_byte(1)).unwrap();
        assert_eq!(a.symbol, "TKA");
        assert_eq!(a.decimals, 6);
        let b = directory.preset(Address::repeat_byte(2)).unwrap();
        assert_eq!(b.decimals, DEFAULT_DECIMALS);
        assert!(directory.preset(Address::repeat_byte(3)).is_none());
    }

    #[test]
    fn tokenlist_with_bad_address_is_a_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"address":"0x1234","symbol":"BAD"}}]"#).unwrap();
        match TokenDirectory::load_from_file(file.path().to_str().unwrap()) {
            Err(AppError::Config(msg)) => assert!(msg.contains("0x1234")),
            other => panic!("Unexpected result: {other:?}"),
        }
    }
}
