use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Verified,
}

impl VerificationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Verified => "verified",
        }
    }

    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw {
            "pending" => Ok(VerificationStatus::Pending),
            "verified" => Ok(VerificationStatus::Verified),
            other => anyhow::bail!("unknown verification status '{}'", other),
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentVerification {
    pub id: i64,
    pub transaction_hash: String,
    pub wallet_address: String,
    pub email: String,
    pub tier: String,
    pub required_amount: String,
    pub amount: Option<String>,
    pub status: VerificationStatus,
    pub created_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewPaymentVerification {
    pub transaction_hash: String,
    pub wallet_address: String,
    pub email: String,
    pub tier: String,
    pub required_amount: String,
}

/// Verification records keyed by transaction hash.
///
/// A record only ever moves `pending -> verified`; once verified the hash is spent.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    async fn find_verification(&self, transaction_hash: &str) -> anyhow::Result<Option<PaymentVerification>>;

    /// Inserts a pending record, or refreshes an existing pending one with the latest
    /// submission. Returns `None` when the hash is already verified.
    async fn record_pending(&self, new: NewPaymentVerification) -> anyhow::Result<Option<PaymentVerification>>;

    /// Atomically flips a pending record to verified. Returns `None` if the record was not
    /// pending (a concurrent submission already verified it).
    async fn mark_verified(&self, transaction_hash: &str, amount: &str) -> anyhow::Result<Option<PaymentVerification>>;

    /// Oldest first.
    async fn list_verifications(&self) -> anyhow::Result<Vec<PaymentVerification>>;
}
