use crate::domain::balance::asset::Asset;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Why a single balance lookup produced no value. Never leaves the aggregator.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

/// One named, fallible balance provider for one asset.
///
/// Implementations issue exactly one request (or a constant-size batch, e.g. balance +
/// decimals) and return the balance already formatted for display. Address validation is the
/// aggregator's job: `fetch` is only called with addresses that pass
/// `asset().address_format()`.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    fn asset(&self) -> Asset;

    async fn fetch(&self, address: &str) -> Result<String, FetchError>;
}
