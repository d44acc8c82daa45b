use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A transaction as reported by an indexing API (Moralis `transaction/{hash}` shape).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IndexedTransaction {
    pub hash: String,
    pub from_address: String,
    #[serde(default)]
    pub to_address: Option<String>,
    /// `"1"` for a successful receipt, `"0"` for a reverted one, absent while pending.
    #[serde(default)]
    pub receipt_status: Option<String>,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default, alias = "receipt_logs")]
    pub logs: Vec<IndexedLog>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IndexedLog {
    pub address: String,
    #[serde(default)]
    pub topic0: Option<String>,
    #[serde(default)]
    pub topic1: Option<String>,
    #[serde(default)]
    pub topic2: Option<String>,
    #[serde(default)]
    pub topic3: Option<String>,
    #[serde(default)]
    pub data: String,
}

/// Looks up a transaction by hash. `Ok(None)` means the indexer does not know the hash;
/// `Err` is reserved for transport / API failures.
#[async_trait]
pub trait TransactionIndexer: Send + Sync {
    async fn transaction(&self, hash: &str) -> anyhow::Result<Option<IndexedTransaction>>;
}
