// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 ® John Hauger Mitander <john@mitander.dev>

use alloy::primitives::{Address, U256};
use amm_client::app::config::GlobalSettings;
use amm_client::app::logging::setup_logging;
use amm_client::common::parsing::{canonical_hex, parse_address_hex};
use amm_client::common::units::{format_base_units, to_base_units};
use amm_client::domain::constants::LP_DECIMALS;
use amm_client::domain::error::AppError;
use amm_client::domain::step::ActionReport;
use amm_client::infrastructure::data::token_directory::TokenDirectory;
use amm_client::infrastructure::network::provider::{ConnectionFactory, HttpProvider, SignerProvider};
use amm_client::infrastructure::network::rpc::{RpcChainReader, RpcChainWriter};
use amm_client::services::amm::quote::{quote_liquidity, quote_swap};
use amm_client::services::amm::{AmmClient, PoolRegistry};
use clap::{Parser, Subcommand};
use serde_json::json;
use std::sync::Arc;

type Reader = RpcChainReader<HttpProvider>;
type Writer = RpcChainWriter<SignerProvider>;

#[derive(Parser, Debug)]
#[command(author, version, about = "constant-product AMM client")]
struct Cli {
    /// Path to config file (default: config.{toml,yaml,...})
    #[arg(long, env = "AMM_CONFIG")]
    config: Option<String>,

    /// RPC endpoint (overrides config/env)
    #[arg(long)]
    rpc_url: Option<String>,

    /// Emit JSON logs on stderr
    #[arg(long, default_value_t = false)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every pool known to the factory
    Pools {
        /// Account whose LP and token balances are read
        #[arg(long, value_parser = parse_address_hex)]
        account: Option<Address>,
    },
    /// Quote a swap against the current reserves
    Quote {
        #[arg(long, value_parser = parse_address_hex)]
        token_in: Address,
        #[arg(long, value_parser = parse_address_hex)]
        token_out: Address,
        /// Human-decimal amount of token_in
        #[arg(long)]
        amount: String,
    },
    #[command(flatten)]
    Action(ActionCommand),
}

/// Commands that sign and submit transactions.
#[derive(Subcommand, Debug)]
enum ActionCommand {
    /// approve both tokens, then router.addLiquidity
    AddLiquidity {
        #[arg(long, value_parser = parse_address_hex)]
        token0: Address,
        #[arg(long, value_parser = parse_address_hex)]
        token1: Address,
        #[arg(long)]
        amount0: String,
        /// Derived from the pool ratio when omitted
        #[arg(long)]
        amount1: Option<String>,
    },
    /// approve LP, then router.removeLiquidity
    RemoveLiquidity {
        #[arg(long, value_parser = parse_address_hex)]
        pair: Address,
        /// Human-decimal LP amount
        #[arg(long)]
        amount: String,
    },
    /// approve, transfer, pair.swap for the quoted output
    Swap {
        #[arg(long, value_parser = parse_address_hex)]
        token_in: Address,
        #[arg(long, value_parser = parse_address_hex)]
        pair: Address,
        #[arg(long)]
        amount: String,
    },
    /// factory.createPair, then getPair
    CreatePair {
        #[arg(long, value_parser = parse_address_hex)]
        token_a: Address,
        #[arg(long, value_parser = parse_address_hex)]
        token_b: Address,
    },
    /// Mint the configured faucet amount to the wallet
    Faucet {
        #[arg(long, value_parser = parse_address_hex)]
        token: Address,
    },
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let cli = Cli::parse();

    let mut settings = GlobalSettings::load_with_path(cli.config.as_deref())?;
    if let Some(url) = cli.rpc_url.clone() {
        settings.rpc_url = url;
        settings.validate()?;
    }
    setup_logging(
        if settings.debug { "debug" } else { "info" },
        cli.log_json || settings.log_json,
    );

    let tokens = Arc::new(match settings.tokenlist_path.as_deref() {
        Some(path) => TokenDirectory::load_from_file(path)?,
        None => TokenDirectory::new(),
    });
    let reader = Arc::new(RpcChainReader::new(ConnectionFactory::http(
        &settings.rpc_url,
    )?));

    match cli.command {
        Command::Pools { account } => {
            let registry = PoolRegistry::new(reader, settings.factory_address, tokens);
            let scan = registry.scan(account).await?;
            print_json(&json!({
                "pools": scan.pools.iter().map(|p| p.view()).collect::<Vec<_>>(),
                "tokens": scan.tokens.iter().map(|t| t.view()).collect::<Vec<_>>(),
            }))
        }
        Command::Quote {
            token_in,
            token_out,
            amount,
        } => {
            let registry = PoolRegistry::new(reader, settings.factory_address, tokens);
            let pair = registry
                .find_pair(token_in, token_out)
                .await?
                .ok_or_else(|| no_pool(token_in, token_out))?;
            let pool = registry.load_pool(pair, None).await?;
            let decimals_in = pool.decimals_of(token_in).unwrap_or_default();
            let decimals_out = pool.decimals_of(token_out).unwrap_or_default();
            let amount_in = to_base_units("amount", &amount, decimals_in)?;
            let quote = quote_swap(&pool, token_in, amount_in)?;
            print_json(&json!({
                "pairAddress": canonical_hex(pair),
                "tokenIn": canonical_hex(token_in),
                "tokenOut": canonical_hex(quote.token_out),
                "amountIn": format_base_units(quote.amount_in, decimals_in),
                "amountOut": format_base_units(quote.amount_out, decimals_out),
                "isToken0In": quote.is_token0_in,
            }))
        }
        Command::Action(action) => {
            let client = connect_client(&settings, reader, tokens)?;
            let result = run_action(&client, action).await;
            // Confirmed steps of a failed action stay on chain; show them.
            if let Some(report) = result.as_ref().err().and_then(AppError::partial_report) {
                print_report(report)?;
            }
            result
        }
    }
}

fn connect_client(
    settings: &GlobalSettings,
    reader: Arc<Reader>,
    tokens: Arc<TokenDirectory>,
) -> Result<AmmClient<Reader, Writer>, AppError> {
    let wallet_address = settings.signer_address()?;
    let (provider, signer) =
        ConnectionFactory::signer(&settings.rpc_url, &settings.wallet_key_value()?)?;
    if signer != wallet_address {
        return Err(AppError::Config(format!(
            "signer {:#x} does not match wallet address {:#x}",
            signer, wallet_address
        )));
    }
    let writer = Arc::new(RpcChainWriter::new(
        provider,
        signer,
        settings.receipt_poll_interval(),
    ));
    tracing::info!(
        target: "config",
        signer = %canonical_hex(signer),
        factory = %canonical_hex(settings.factory_address),
        router = %canonical_hex(settings.router_address),
        receipt_budget_ms = settings.receipt_timeout_ms,
        "Client ready"
    );
    Ok(AmmClient::new(
        reader,
        writer,
        tokens,
        settings.factory_address,
        settings.router_address,
    )
    .with_receipt_budget(settings.receipt_budget())
    .with_faucet_amount(settings.faucet_amount_units()?))
}

async fn run_action(
    client: &AmmClient<Reader, Writer>,
    action: ActionCommand,
) -> Result<(), AppError> {
    match action {
        ActionCommand::AddLiquidity {
            token0,
            token1,
            amount0,
            amount1,
        } => {
            client.scan_pools().await?;
            let token_a = client.registry().load_token(token0, None).await?;
            let token_b = client.registry().load_token(token1, None).await?;
            let amount0 = to_base_units("amount0", &amount0, token_a.decimals)?;
            let amount1 = match amount1 {
                Some(raw) => to_base_units("amount1", &raw, token_b.decimals)?,
                None => paired_amount(client, token0, token1, amount0).await?,
            };
            let report = client
                .run_add_liquidity(token0, token1, amount0, amount1)
                .await?;
            print_report(&report)
        }
        ActionCommand::RemoveLiquidity { pair, amount } => {
            client.scan_pools().await?;
            let lp_amount = to_base_units("amount", &amount, LP_DECIMALS)?;
            let report = client.run_remove_liquidity(pair, lp_amount).await?;
            print_report(&report)
        }
        ActionCommand::Swap {
            token_in,
            pair,
            amount,
        } => {
            client.scan_pools().await?;
            let pool = client.pool(pair).await?;
            let decimals_in = pool
                .decimals_of(token_in)
                .ok_or_else(|| no_pool(token_in, pair))?;
            let amount_in = to_base_units("amount", &amount, decimals_in)?;
            let (quote, report) = client.run_swap(token_in, pair, amount_in).await?;
            let decimals_out = pool.decimals_of(quote.token_out).unwrap_or_default();
            print_json(&json!({
                "amountIn": format_base_units(quote.amount_in, decimals_in),
                "amountOut": format_base_units(quote.amount_out, decimals_out),
                "report": report.view(),
            }))
        }
        ActionCommand::CreatePair { token_a, token_b } => {
            let (pair, report) = client.run_create_pair(token_a, token_b).await?;
            print_json(&json!({
                "pairAddress": canonical_hex(pair),
                "report": report.view(),
            }))
        }
        ActionCommand::Faucet { token } => {
            let report = client.run_faucet(token).await?;
            print_report(&report)
        }
    }
}

/// token1 amount matching the pool ratio for `amount0` of token0.
async fn paired_amount(
    client: &AmmClient<Reader, Writer>,
    token0: Address,
    token1: Address,
    amount0: U256,
) -> Result<U256, AppError> {
    let pair = client
        .registry()
        .find_pair(token0, token1)
        .await?
        .ok_or_else(|| no_pool(token0, token1))?;
    let pool = client.pool(pair).await?;
    let orientation = pool.orient(token0).ok_or_else(|| no_pool(token0, token1))?;
    quote_liquidity(amount0, orientation.reserve_in, orientation.reserve_out)
}

fn no_pool(a: Address, b: Address) -> AppError {
    AppError::NoLiquidity(format!(
        "no pool for {} / {}",
        canonical_hex(a),
        canonical_hex(b)
    ))
}

fn print_report(report: &ActionReport) -> Result<(), AppError> {
    print_json(&json!({ "report": report.view() }))
}

fn print_json(value: &serde_json::Value) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Initialization(format!("Failed to render output: {e}")))?;
    println!("{rendered}");
    Ok(())
}
