// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use crate::common::units::to_base_units;
use crate::domain::constants;
use crate::domain::error::AppError;
use alloy::primitives::{Address, U256};
use alloy::signers::local::PrivateKeySigner;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

#[derive(Debug, Deserialize, Clone)]
pub struct GlobalSettings {
    // General
    #[serde(default = "default_debug")]
    pub debug: bool,
    #[serde(default = "default_debug")]
    pub log_json: bool,

    // Chain
    pub rpc_url: String,
    /// Resolved once at startup; every registry scan and createPair targets it.
    pub factory_address: Address,
    pub router_address: Address,

    // Identity
    pub wallet_key: Option<String>,
    pub wallet_address: Option<Address>,

    // Receipts
    #[serde(default = "default_receipt_poll_ms")]
    pub receipt_poll_ms: u64,
    /// 0 waits indefinitely.
    #[serde(default = "default_receipt_timeout_ms")]
    pub receipt_timeout_ms: u64,

    // Tokens
    #[serde(default = "default_faucet_amount")]
    pub faucet_amount: String,
    pub tokenlist_path: Option<String>,
}

fn default_debug() -> bool {
    false
}
fn default_receipt_poll_ms() -> u64 {
    constants::DEFAULT_RECEIPT_POLL_MS
}
fn default_receipt_timeout_ms() -> u64 {
    constants::DEFAULT_RECEIPT_TIMEOUT_MS
}
fn default_faucet_amount() -> String {
    constants::DEFAULT_FAUCET_TOKENS.to_string()
}

impl GlobalSettings {
    pub fn load_with_path(path: Option<&str>) -> Result<Self, AppError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let mut builder = Config::builder();
        if let Some(selected_path) = path {
            builder = builder.add_source(File::from(Path::new(selected_path)).required(true));
        } else {
            builder = builder.add_source(File::with_name("config").required(false));
        }
        // Precedence: CLI (in main) > env/.env > config file.
        builder = builder.add_source(Environment::default());

        let settings: GlobalSettings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        tracing::debug!(
            target: "config",
            factory = %format!("{:#x}", settings.factory_address),
            router = %format!("{:#x}", settings.router_address),
            wallet = settings.wallet_key.is_some(),
            "Settings loaded"
        );
        Ok(settings)
    }

    pub fn load() -> Result<Self, AppError> {
        Self::load_with_path(None)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.factory_address.is_zero() {
            return Err(AppError::Config("FACTORY_ADDRESS is missing".to_string()));
        }
        if self.router_address.is_zero() {
            return Err(AppError::Config("ROUTER_ADDRESS is missing".to_string()));
        }
        if self.receipt_poll_ms == 0 {
            return Err(AppError::Config(
                "RECEIPT_POLL_MS must be greater than zero".to_string(),
            ));
        }
        self.rpc_url()?;
        self.faucet_amount_units()?;
        Ok(())
    }

    pub fn rpc_url(&self) -> Result<Url, AppError> {
        Url::parse(self.rpc_url.trim())
            .map_err(|e| AppError::Config(format!("Invalid RPC_URL {}: {}", self.rpc_url, e)))
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_ms)
    }

    /// Caller-imposed wait budget per receipt, `None` when disabled.
    pub fn receipt_budget(&self) -> Option<Duration> {
        (self.receipt_timeout_ms > 0).then(|| Duration::from_millis(self.receipt_timeout_ms))
    }

    pub fn faucet_amount_units(&self) -> Result<U256, AppError> {
        to_base_units(
            "faucet_amount",
            &self.faucet_amount,
            constants::DEFAULT_DECIMALS,
        )
        .map_err(|e| AppError::Config(format!("Invalid FAUCET_AMOUNT: {e}")))
    }

    /// Wallet key, required by every state-changing command.
    pub fn wallet_key_value(&self) -> Result<String, AppError> {
        self.wallet_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(ToString::to_string)
            .ok_or_else(|| AppError::Config("WALLET_KEY is missing".to_string()))
    }

    /// Signer address for the configured key; must match WALLET_ADDRESS when set.
    pub fn signer_address(&self) -> Result<Address, AppError> {
        let key = self.wallet_key_value()?;
        let signer = PrivateKeySigner::from_str(&key)
            .map_err(|e| AppError::Config(format!("Invalid wallet key: {}", e)))?;
        let derived = signer.address();
        if let Some(expected) = self.wallet_address
            && expected != derived
        {
            return Err(AppError::Config(format!(
                "WALLET_ADDRESS {:#x} does not match wallet key address {:#x}",
                expected, derived
            )));
        }
        Ok(derived)
    }
}
