//! Multi-chain balance aggregation.
//!
//! The aggregator fans out to every configured [`BalanceSource`] whose address gate accepts the
//! input, bounds each one with its own timeout, and folds the settled results over a map that
//! starts with every asset at its zero value. A failing source only ever costs its own entry.

use crate::domain::balance::asset::Asset;
use crate::domain::balance::source::{BalanceSource, FetchError};
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// `symbol -> formatted balance`, always containing every [`Asset::ALL`] symbol.
pub type Balances = BTreeMap<String, String>;

pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(10);

pub struct BalanceAggregator {
    sources: Vec<Arc<dyn BalanceSource>>,
    source_timeout: Duration,
}

impl BalanceAggregator {
    pub fn new(sources: Vec<Arc<dyn BalanceSource>>, source_timeout: Duration) -> Self {
        Self {
            sources,
            source_timeout,
        }
    }

    pub fn with_default_timeout(sources: Vec<Arc<dyn BalanceSource>>) -> Self {
        Self::new(sources, DEFAULT_SOURCE_TIMEOUT)
    }

    pub fn source_timeout(&self) -> Duration {
        self.source_timeout
    }

    pub fn sources(&self) -> &[Arc<dyn BalanceSource>] {
        &self.sources
    }

    /// Fetches every asset balance for `address`. Infallible: failed, timed out and gated-out
    /// sources report their asset's zero value.
    pub async fn fetch_balances(&self, address: &str) -> Balances {
        let mut balances = zero_balances();

        let pending = self.sources.iter().filter_map(|source| {
            let asset = source.asset();
            if !asset.address_format().matches(address) {
                tracing::debug!(asset = %asset, "address format not accepted, skipping source");
                return None;
            }
            Some(async move { (asset, self.fetch_one(source.as_ref(), address).await) })
        });

        for (asset, outcome) in join_all(pending).await {
            match outcome {
                Ok(value) => {
                    tracing::debug!(asset = %asset, balance = %value, "balance fetched");
                    balances.insert(asset.symbol().to_string(), value);
                }
                Err(e) => {
                    tracing::warn!(asset = %asset, error = %e, "balance fetch failed, using zero");
                }
            }
        }

        balances
    }

    async fn fetch_one(&self, source: &dyn BalanceSource, address: &str) -> Result<String, FetchError> {
        match tokio::time::timeout(self.source_timeout, source.fetch(address)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.source_timeout)),
        }
    }
}

/// Every known asset at its zero value.
pub fn zero_balances() -> Balances {
    Asset::ALL
        .iter()
        .map(|asset| (asset.symbol().to_string(), asset.zero_value().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Fixed(Asset, &'static str);

    #[async_trait]
    impl BalanceSource for Fixed {
        fn asset(&self) -> Asset {
            self.0
        }

        async fn fetch(&self, _address: &str) -> Result<String, FetchError> {
            Ok(self.1.to_string())
        }
    }

    struct Broken(Asset);

    #[async_trait]
    impl BalanceSource for Broken {
        fn asset(&self) -> Asset {
            self.0
        }

        async fn fetch(&self, _address: &str) -> Result<String, FetchError> {
            Err(FetchError::Malformed("boom".into()))
        }
    }

    const EVM: &str = "0x742d35Cc6634C0532925a3b844Bc9e7595f2bD18";

    #[test]
    fn zero_balances_cover_every_asset() {
        let zeros = zero_balances();
        assert_eq!(zeros.len(), Asset::ALL.len());
        assert_eq!(zeros["BTC"], "0.00000000");
        assert_eq!(zeros["ETH"], "0.00");
    }

    #[tokio::test]
    async fn no_sources_still_returns_complete_map() {
        let aggregator = BalanceAggregator::with_default_timeout(Vec::new());
        assert_eq!(aggregator.fetch_balances(EVM).await, zero_balances());
    }

    #[tokio::test]
    async fn failed_source_does_not_affect_siblings() {
        let aggregator = BalanceAggregator::with_default_timeout(vec![
            Arc::new(Fixed(Asset::Eth, "1.5")),
            Arc::new(Broken(Asset::Bnb)),
            Arc::new(Fixed(Asset::Usdc, "12.0")),
        ]);

        let balances = aggregator.fetch_balances(EVM).await;
        assert_eq!(balances["ETH"], "1.5");
        assert_eq!(balances["BNB"], "0.00");
        assert_eq!(balances["USDC"], "12.0");
        assert_eq!(balances.len(), Asset::ALL.len());
    }
}
