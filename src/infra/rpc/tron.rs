// TronGrid `v1/accounts/{address}`: TRX balance in sun plus a list of TRC20 holdings.

use crate::domain::balance::units::format_units_fixed;
use crate::domain::balance::{Asset, BalanceSource, FetchError};
use async_trait::async_trait;
use primitive_types::U256;
use serde::Deserialize;
use std::collections::HashMap;

const SUN_DECIMALS: u8 = 6;
const TRC20_USDT_DECIMALS: u8 = 6;

#[derive(Debug, Deserialize)]
pub struct AccountsResponse {
    #[serde(default)]
    pub data: Vec<TronAccount>,
}

#[derive(Debug, Deserialize)]
pub struct TronAccount {
    #[serde(default)]
    pub balance: u64,
    /// Each entry maps one token contract to its raw balance string.
    #[serde(default)]
    pub trc20: Vec<HashMap<String, String>>,
}

impl AccountsResponse {
    /// Unactivated accounts come back with an empty `data` array: that is a zero balance.
    pub fn sun(&self) -> u64 {
        self.data.first().map(|a| a.balance).unwrap_or(0)
    }

    pub fn trc20_raw(&self, contract: &str) -> Result<U256, FetchError> {
        let found = self
            .data
            .first()
            .into_iter()
            .flat_map(|a| a.trc20.iter())
            .flat_map(|entry| entry.iter())
            .find(|(token, _)| token.eq_ignore_ascii_case(contract));

        match found {
            Some((_, raw)) => U256::from_dec_str(raw.trim())
                .map_err(|_| FetchError::Malformed(format!("trc20 balance '{}'", raw))),
            None => Ok(U256::zero()),
        }
    }
}

async fn fetch_account(http: &reqwest::Client, base_url: &str, address: &str) -> Result<AccountsResponse, FetchError> {
    let url = format!("{}/v1/accounts/{}", base_url, address);
    Ok(http.get(&url).send().await?.error_for_status()?.json().await?)
}

pub struct TrxSource {
    http: reqwest::Client,
    base_url: String,
}

impl TrxSource {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BalanceSource for TrxSource {
    fn asset(&self) -> Asset {
        Asset::Trx
    }

    async fn fetch(&self, address: &str) -> Result<String, FetchError> {
        let account = fetch_account(&self.http, &self.base_url, address).await?;
        Ok(format_units_fixed(U256::from(account.sun()), SUN_DECIMALS, SUN_DECIMALS as usize))
    }
}

pub struct Trc20Source {
    asset: Asset,
    http: reqwest::Client,
    base_url: String,
    contract: String,
}

impl Trc20Source {
    pub fn new(asset: Asset, http: reqwest::Client, base_url: &str, contract: &str) -> Self {
        Self {
            asset,
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            contract: contract.to_string(),
        }
    }
}

#[async_trait]
impl BalanceSource for Trc20Source {
    fn asset(&self) -> Asset {
        self.asset
    }

    async fn fetch(&self, address: &str) -> Result<String, FetchError> {
        let account = fetch_account(&self.http, &self.base_url, address).await?;
        let raw = account.trc20_raw(&self.contract)?;
        Ok(format_units_fixed(raw, TRC20_USDT_DECIMALS, TRC20_USDT_DECIMALS as usize))
    }
}
