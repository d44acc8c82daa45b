//! Centralized configuration (environment variables + defaults).
//!
//! Credentials (database URL, indexer API key) are only ever read from the environment; a local
//! `.env` file is honoured through `dotenv`.

use crate::domain::balance::units::parse_units;
use crate::domain::balance::DEFAULT_SOURCE_TIMEOUT;
use crate::domain::payment::PaymentPolicy;
use anyhow::{anyhow, bail, Context};
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_ETH_RPC_URL: &str = "https://eth.llamarpc.com";
pub const DEFAULT_BSC_RPC_URL: &str = "https://bsc-dataseed.binance.org";
pub const DEFAULT_POLYGON_RPC_URL: &str = "https://polygon-rpc.com";
pub const DEFAULT_SOLANA_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_TRON_API_URL: &str = "https://api.trongrid.io";
pub const DEFAULT_TON_API_URL: &str = "https://toncenter.com";
pub const DEFAULT_BTC_API_URL: &str = "https://blockchain.info";
pub const DEFAULT_INDEXER_API_URL: &str = "https://deep-index.moralis.io/api/v2.2";
/// BNB Smart Chain mainnet.
pub const DEFAULT_INDEXER_CHAIN: &str = "0x38";
/// BEP20 USDT on BNB Smart Chain.
pub const DEFAULT_PAYMENT_TOKEN_CONTRACT: &str = "0x55d398326f99059fF775485246999027B3197955";
pub const DEFAULT_PAYMENT_TOKEN_SYMBOL: &str = "USDT";
pub const DEFAULT_PAYMENT_TOKEN_DECIMALS: u8 = 18;
pub const DEFAULT_PAYMENT_TIERS: &str = "standard=70,premium=150";

#[derive(Debug, Clone)]
pub struct ChainEndpoints {
    pub eth_rpc_url: String,
    pub bsc_rpc_url: String,
    pub polygon_rpc_url: String,
    pub solana_rpc_url: String,
    pub tron_api_url: String,
    pub ton_api_url: String,
    pub btc_api_url: String,
}

impl Default for ChainEndpoints {
    fn default() -> Self {
        Self {
            eth_rpc_url: DEFAULT_ETH_RPC_URL.to_string(),
            bsc_rpc_url: DEFAULT_BSC_RPC_URL.to_string(),
            polygon_rpc_url: DEFAULT_POLYGON_RPC_URL.to_string(),
            solana_rpc_url: DEFAULT_SOLANA_RPC_URL.to_string(),
            tron_api_url: DEFAULT_TRON_API_URL.to_string(),
            ton_api_url: DEFAULT_TON_API_URL.to_string(),
            btc_api_url: DEFAULT_BTC_API_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct IndexerSettings {
    pub api_url: String,
    pub api_key: String,
    pub chain: String,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: String,
    pub database_url: String,
    pub balance_timeout: Duration,
    pub chains: ChainEndpoints,
    pub indexer: IndexerSettings,
    pub payment: PaymentPolicy,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let balance_timeout = match std::env::var("BALANCE_TIMEOUT_SECS") {
            Ok(v) => Duration::from_secs(
                v.parse::<u64>()
                    .context("BALANCE_TIMEOUT_SECS must be a valid u64")?
                    .max(1),
            ),
            Err(_) => DEFAULT_SOURCE_TIMEOUT,
        };

        let token_decimals = match std::env::var("PAYMENT_TOKEN_DECIMALS") {
            Ok(v) => v
                .parse::<u8>()
                .context("PAYMENT_TOKEN_DECIMALS must be a valid u8")?,
            Err(_) => DEFAULT_PAYMENT_TOKEN_DECIMALS,
        };

        let payment = PaymentPolicy {
            token_contract: optional("PAYMENT_TOKEN_CONTRACT", DEFAULT_PAYMENT_TOKEN_CONTRACT),
            token_symbol: optional("PAYMENT_TOKEN_SYMBOL", DEFAULT_PAYMENT_TOKEN_SYMBOL),
            token_decimals,
            recipient: payment_recipient()?,
            tiers: parse_tiers(&optional("PAYMENT_TIERS", DEFAULT_PAYMENT_TIERS), token_decimals)?,
        };

        Ok(Self {
            bind_addr: optional("BIND_ADDR", DEFAULT_BIND_ADDR),
            database_url: database_url()?,
            balance_timeout,
            chains: chain_endpoints(),
            indexer: IndexerSettings {
                api_url: optional("INDEXER_API_URL", DEFAULT_INDEXER_API_URL),
                api_key: indexer_api_key()?,
                chain: optional("INDEXER_CHAIN", DEFAULT_INDEXER_CHAIN),
            },
            payment,
        })
    }
}

/// Database URL must be provided (no default) for safety.
pub fn database_url() -> anyhow::Result<String> {
    required("DATABASE_URL")
}

/// Indexer API key (required). Never has a built-in fallback.
pub fn indexer_api_key() -> anyhow::Result<String> {
    required("INDEXER_API_KEY")
}

/// Address that payments must be sent to (required).
pub fn payment_recipient() -> anyhow::Result<String> {
    required("PAYMENT_RECIPIENT")
}

/// Public chain endpoints; every one can be overridden, none is secret.
pub fn chain_endpoints() -> ChainEndpoints {
    ChainEndpoints {
        eth_rpc_url: optional("ETH_RPC_URL", DEFAULT_ETH_RPC_URL),
        bsc_rpc_url: optional("BSC_RPC_URL", DEFAULT_BSC_RPC_URL),
        polygon_rpc_url: optional("POLYGON_RPC_URL", DEFAULT_POLYGON_RPC_URL),
        solana_rpc_url: optional("SOLANA_RPC_URL", DEFAULT_SOLANA_RPC_URL),
        tron_api_url: optional("TRON_API_URL", DEFAULT_TRON_API_URL),
        ton_api_url: optional("TON_API_URL", DEFAULT_TON_API_URL),
        btc_api_url: optional("BTC_API_URL", DEFAULT_BTC_API_URL),
    }
}

/// Parses `name=amount,name=amount` into a lower-cased tier table. Amounts are whole-token
/// decimal strings and must fit the token's precision.
pub fn parse_tiers(raw: &str, token_decimals: u8) -> anyhow::Result<BTreeMap<String, String>> {
    let mut tiers = BTreeMap::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, amount) = entry
            .split_once('=')
            .ok_or_else(|| anyhow!("PAYMENT_TIERS entry '{}' is not name=amount", entry))?;
        let name = name.trim().to_lowercase();
        let amount = amount.trim().to_string();
        if name.is_empty() {
            bail!("PAYMENT_TIERS entry '{}' has an empty name", entry);
        }
        if parse_units(&amount, token_decimals).is_none() {
            bail!("PAYMENT_TIERS amount '{}' for tier '{}' is not a valid amount", amount, name);
        }
        tiers.insert(name, amount);
    }
    if tiers.is_empty() {
        bail!("PAYMENT_TIERS must define at least one tier");
    }
    Ok(tiers)
}

fn required(name: &str) -> anyhow::Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => bail!("{} must be set", name),
    }
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
