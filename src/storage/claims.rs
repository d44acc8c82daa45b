use crate::domain::balance::Balances;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One wallet's most recent connection and the balances fetched for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Claim {
    pub id: i64,
    pub wallet_address: String,
    pub balances: Balances,
    pub wallet_type: Option<String>,
    pub claimed_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ClaimUpsert {
    pub wallet_address: String,
    pub balances: Balances,
    pub wallet_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    Created(Claim),
    Updated(Claim),
}

impl UpsertOutcome {
    pub fn claim(&self) -> &Claim {
        match self {
            UpsertOutcome::Created(c) | UpsertOutcome::Updated(c) => c,
        }
    }

    pub fn into_claim(self) -> Claim {
        match self {
            UpsertOutcome::Created(c) | UpsertOutcome::Updated(c) => c,
        }
    }

    pub fn created(&self) -> bool {
        matches!(self, UpsertOutcome::Created(_))
    }
}

/// Claim persistence keyed by wallet address. Upserts are last-write-wins.
#[async_trait]
pub trait ClaimStore: Send + Sync {
    async fn upsert_claim(&self, claim: ClaimUpsert) -> anyhow::Result<UpsertOutcome>;

    async fn get_claim(&self, wallet_address: &str) -> anyhow::Result<Option<Claim>>;

    /// Oldest first.
    async fn list_claims(&self) -> anyhow::Result<Vec<Claim>>;

    /// Returns the number of deleted rows.
    async fn delete_all_claims(&self) -> anyhow::Result<u64>;

    /// Cheap reachability check for `/health`.
    async fn ping(&self) -> anyhow::Result<()>;
}
