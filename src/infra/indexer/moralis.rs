// Responsible for transaction lookups against the Moralis deep-index API.

use crate::domain::payment::{IndexedTransaction, TransactionIndexer};
use crate::infra::config::IndexerSettings;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;

pub struct MoralisIndexer {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    chain: String,
}

impl MoralisIndexer {
    pub fn new(http: reqwest::Client, settings: &IndexerSettings) -> Self {
        Self {
            http,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            chain: settings.chain.clone(),
        }
    }

    pub fn transaction_url(&self, hash: &str) -> String {
        format!("{}/transaction/{}", self.base_url, hash)
    }
}

#[async_trait]
impl TransactionIndexer for MoralisIndexer {
    async fn transaction(&self, hash: &str) -> anyhow::Result<Option<IndexedTransaction>> {
        let response = self
            .http
            .get(self.transaction_url(hash))
            .query(&[("chain", self.chain.as_str())])
            .header("accept", "application/json")
            .header("X-API-Key", &self.api_key)
            .send()
            .await
            .context("indexer request failed")?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            anyhow::bail!("indexer returned HTTP {}", response.status());
        }

        let tx = response
            .json::<IndexedTransaction>()
            .await
            .context("indexer returned an unexpected transaction payload")?;
        Ok(Some(tx))
    }
}
