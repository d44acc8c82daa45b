//! Claim registration.
//!
//! Sits between the HTTP layer and the claim store:
//! 1.  Resolves the wallet type (explicit value, else the injected-provider detection).
//! 2.  Uses the caller's balances when supplied, otherwise runs the aggregator.
//! 3.  Upserts the claim by wallet address.

use crate::domain::balance::{BalanceAggregator, Balances};
use crate::domain::wallet::{detect_provider, InjectedProviders};
use crate::storage::{Claim, ClaimStore, ClaimUpsert, UpsertOutcome};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ClaimRegistration {
    pub wallet_address: String,
    pub balances: Option<Balances>,
    pub wallet_type: Option<String>,
    pub providers: Option<InjectedProviders>,
}

pub struct ClaimService {
    store: Arc<dyn ClaimStore>,
    aggregator: Arc<BalanceAggregator>,
}

impl ClaimService {
    pub fn new(store: Arc<dyn ClaimStore>, aggregator: Arc<BalanceAggregator>) -> Self {
        Self { store, aggregator }
    }

    pub fn aggregator(&self) -> &BalanceAggregator {
        &self.aggregator
    }

    pub async fn register(&self, registration: ClaimRegistration) -> anyhow::Result<UpsertOutcome> {
        let wallet_address = registration.wallet_address.trim().to_string();
        if wallet_address.is_empty() {
            anyhow::bail!("Validation error: wallet_address cannot be empty");
        }

        let wallet_type = registration
            .wallet_type
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .or_else(|| {
                registration
                    .providers
                    .as_ref()
                    .and_then(detect_provider)
                    .map(|p| p.name.to_string())
            });

        let balances = match registration.balances {
            Some(balances) => balances,
            None => self.aggregator.fetch_balances(&wallet_address).await,
        };

        let outcome = self
            .store
            .upsert_claim(ClaimUpsert {
                wallet_address,
                balances,
                wallet_type,
            })
            .await?;

        tracing::info!(
            wallet_address = %outcome.claim().wallet_address,
            created = outcome.created(),
            "claim stored"
        );
        Ok(outcome)
    }

    pub async fn get(&self, wallet_address: &str) -> anyhow::Result<Option<Claim>> {
        self.store.get_claim(wallet_address.trim()).await
    }

    pub async fn list(&self) -> anyhow::Result<Vec<Claim>> {
        self.store.list_claims().await
    }

    pub async fn delete_all(&self) -> anyhow::Result<u64> {
        let deleted = self.store.delete_all_claims().await?;
        tracing::warn!(deleted, "all claims deleted");
        Ok(deleted)
    }

    pub async fn ping(&self) -> anyhow::Result<()> {
        self.store.ping().await
    }
}
