use crate::domain::balance::units::format_units_fixed;
use crate::domain::balance::{Asset, BalanceSource, FetchError};
use async_trait::async_trait;
use primitive_types::U256;
use serde::Deserialize;
use serde_json::Value as JsonValue;

const NANOTON_DECIMALS: u8 = 9;

/// toncenter `api/v2/getAddressBalance` answer. `result` is the nanoton count, sent as a string
/// by toncenter but as a number by some mirrors.
#[derive(Debug, Deserialize)]
pub struct AddressBalanceResponse {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<JsonValue>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AddressBalanceResponse {
    pub fn nanotons(&self) -> Result<U256, FetchError> {
        if !self.ok {
            return Err(FetchError::Malformed(
                self.error.clone().unwrap_or_else(|| "ok=false".to_string()),
            ));
        }
        let raw = match &self.result {
            Some(JsonValue::String(s)) => s.trim().to_string(),
            Some(JsonValue::Number(n)) => n.to_string(),
            other => return Err(FetchError::Malformed(format!("unexpected result {:?}", other))),
        };
        U256::from_dec_str(&raw).map_err(|_| FetchError::Malformed(format!("result '{}'", raw)))
    }
}

pub struct TonSource {
    http: reqwest::Client,
    base_url: String,
}

impl TonSource {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BalanceSource for TonSource {
    fn asset(&self) -> Asset {
        Asset::Ton
    }

    async fn fetch(&self, address: &str) -> Result<String, FetchError> {
        let url = format!("{}/api/v2/getAddressBalance", self.base_url);
        let response: AddressBalanceResponse = self
            .http
            .get(&url)
            .query(&[("address", address)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let nanotons = response.nanotons()?;
        Ok(format_units_fixed(nanotons, NANOTON_DECIMALS, NANOTON_DECIMALS as usize))
    }
}
