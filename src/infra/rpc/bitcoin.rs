use crate::domain::balance::units::format_units_fixed;
use crate::domain::balance::{Asset, BalanceSource, FetchError};
use async_trait::async_trait;
use primitive_types::U256;

const SATOSHI_DECIMALS: u8 = 8;

/// BTC balance from a blockchain.info-compatible `q/addressbalance/{address}` endpoint, which
/// answers with a bare satoshi integer.
pub struct BitcoinSource {
    http: reqwest::Client,
    base_url: String,
}

impl BitcoinSource {
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BalanceSource for BitcoinSource {
    fn asset(&self) -> Asset {
        Asset::Btc
    }

    async fn fetch(&self, address: &str) -> Result<String, FetchError> {
        let url = format!("{}/q/addressbalance/{}", self.base_url, address);
        let body = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        let satoshis = parse_satoshis(&body)?;
        Ok(format_units_fixed(satoshis, SATOSHI_DECIMALS, SATOSHI_DECIMALS as usize))
    }
}

fn parse_satoshis(body: &str) -> Result<U256, FetchError> {
    U256::from_dec_str(body.trim())
        .map_err(|_| FetchError::Malformed(format!("addressbalance returned '{}'", body.trim())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_integer_body() {
        assert_eq!(parse_satoshis("250000000\n").unwrap(), U256::from(250_000_000u64));
        assert!(parse_satoshis("Checksum does not validate").is_err());
    }
}
