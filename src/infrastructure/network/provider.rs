// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@on1.no>

use crate::common::error::AppError;
use alloy::network::{Ethereum, EthereumWallet};
use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder, RootProvider};
use alloy::signers::local::PrivateKeySigner;
use std::str::FromStr;
use url::Url;

pub type HttpProvider = RootProvider<Ethereum>;
pub type SignerProvider = DynProvider<Ethereum>;

pub struct ConnectionFactory;

impl ConnectionFactory {
    pub fn http(rpc_url: &str) -> Result<HttpProvider, AppError> {
        let url = parse_url(rpc_url)?;
        Ok(RootProvider::new_http(url))
    }

    /// Wallet-filled HTTP provider; nonce, gas and chain id are filled per call.
    pub fn signer(rpc_url: &str, wallet_key: &str) -> Result<(SignerProvider, Address), AppError> {
        let url = parse_url(rpc_url)?;
        let signer = PrivateKeySigner::from_str(wallet_key.trim())
            .map_err(|e| AppError::Config(format!("Invalid wallet key: {}", e)))?;
        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(url)
            .erased();
        tracing::debug!(
            target: "provider",
            signer = %format!("{:#x}", address),
            "Signer provider ready"
        );
        Ok((provider, address))
    }
}

fn parse_url(rpc_url: &str) -> Result<Url, AppError> {
    Url::parse(rpc_url).map_err(|e| AppError::Config(format!("Invalid RPC URL: {}", e)))
}
