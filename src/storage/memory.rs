//! In-process store with the same semantics as [`PgStore`](crate::storage::PgStore).
//! Used by tests and for running the API without a database.

use crate::storage::claims::{Claim, ClaimStore, ClaimUpsert, UpsertOutcome};
use crate::storage::payments::{
    NewPaymentVerification, PaymentStore, PaymentVerification, VerificationStatus,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Default)]
struct Inner {
    next_id: i64,
    claims: HashMap<String, Claim>,
    verifications: HashMap<String, PaymentVerification>,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClaimStore for MemoryStore {
    async fn upsert_claim(&self, claim: ClaimUpsert) -> Result<UpsertOutcome> {
        let mut inner = self.inner.lock().await;
        let now = Utc::now();

        if let Some(existing) = inner.claims.get_mut(&claim.wallet_address) {
            existing.balances = claim.balances;
            if claim.wallet_type.is_some() {
                existing.wallet_type = claim.wallet_type;
            }
            existing.updated_at = now;
            return Ok(UpsertOutcome::Updated(existing.clone()));
        }

        let stored = Claim {
            id: inner.next_id(),
            wallet_address: claim.wallet_address.clone(),
            balances: claim.balances,
            wallet_type: claim.wallet_type,
            claimed_at: now,
            updated_at: now,
        };
        inner.claims.insert(claim.wallet_address, stored.clone());
        Ok(UpsertOutcome::Created(stored))
    }

    async fn get_claim(&self, wallet_address: &str) -> Result<Option<Claim>> {
        Ok(self.inner.lock().await.claims.get(wallet_address).cloned())
    }

    async fn list_claims(&self) -> Result<Vec<Claim>> {
        let mut claims: Vec<Claim> = self.inner.lock().await.claims.values().cloned().collect();
        claims.sort_by_key(|c| (c.claimed_at, c.id));
        Ok(claims)
    }

    async fn delete_all_claims(&self) -> Result<u64> {
        let mut inner = self.inner.lock().await;
        let deleted = inner.claims.len() as u64;
        inner.claims.clear();
        Ok(deleted)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl PaymentStore for MemoryStore {
    async fn find_verification(&self, transaction_hash: &str) -> Result<Option<PaymentVerification>> {
        Ok(self.inner.lock().await.verifications.get(transaction_hash).cloned())
    }

    async fn record_pending(&self, new: NewPaymentVerification) -> Result<Option<PaymentVerification>> {
        let mut inner = self.inner.lock().await;

        if let Some(existing) = inner.verifications.get_mut(&new.transaction_hash) {
            if existing.status == VerificationStatus::Verified {
                return Ok(None);
            }
            existing.wallet_address = new.wallet_address;
            existing.email = new.email;
            existing.tier = new.tier;
            existing.required_amount = new.required_amount;
            return Ok(Some(existing.clone()));
        }

        let record = PaymentVerification {
            id: inner.next_id(),
            transaction_hash: new.transaction_hash.clone(),
            wallet_address: new.wallet_address,
            email: new.email,
            tier: new.tier,
            required_amount: new.required_amount,
            amount: None,
            status: VerificationStatus::Pending,
            created_at: Utc::now(),
            verified_at: None,
        };
        inner.verifications.insert(new.transaction_hash, record.clone());
        Ok(Some(record))
    }

    async fn mark_verified(&self, transaction_hash: &str, amount: &str) -> Result<Option<PaymentVerification>> {
        let mut inner = self.inner.lock().await;
        match inner.verifications.get_mut(transaction_hash) {
            Some(record) if record.status == VerificationStatus::Pending => {
                record.status = VerificationStatus::Verified;
                record.amount = Some(amount.to_string());
                record.verified_at = Some(Utc::now());
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn list_verifications(&self) -> Result<Vec<PaymentVerification>> {
        let mut records: Vec<PaymentVerification> =
            self.inner.lock().await.verifications.values().cloned().collect();
        records.sort_by_key(|r| (r.created_at, r.id));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn upsert(address: &str, eth: &str, wallet_type: Option<&str>) -> ClaimUpsert {
        ClaimUpsert {
            wallet_address: address.into(),
            balances: BTreeMap::from([("ETH".to_string(), eth.to_string())]),
            wallet_type: wallet_type.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn upsert_creates_then_updates_last_write_wins() {
        let store = MemoryStore::new();
        let first = store.upsert_claim(upsert("0xabc", "1.0", Some("MetaMask"))).await.unwrap();
        assert!(first.created());

        let second = store.upsert_claim(upsert("0xabc", "2.0", None)).await.unwrap();
        assert!(!second.created());
        let claim = second.into_claim();
        assert_eq!(claim.id, first.claim().id);
        assert_eq!(claim.balances["ETH"], "2.0");
        assert_eq!(claim.wallet_type.as_deref(), Some("MetaMask"));
        assert_eq!(store.list_claims().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn verified_hash_cannot_be_reopened() {
        let store = MemoryStore::new();
        let new = NewPaymentVerification {
            transaction_hash: "0x01".into(),
            wallet_address: "0xabc".into(),
            email: "a@example.com".into(),
            tier: "standard".into(),
            required_amount: "70".into(),
        };
        assert!(store.record_pending(new.clone()).await.unwrap().is_some());
        assert!(store.mark_verified("0x01", "70.00").await.unwrap().is_some());
        assert!(store.mark_verified("0x01", "70.00").await.unwrap().is_none());
        assert!(store.record_pending(new).await.unwrap().is_none());
    }
}
