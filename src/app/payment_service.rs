//! Payment verification flow.
//!
//! Order matters: cheap local checks (tier, hash shape, spent hash) run before the indexer is
//! contacted, and the record is only flipped to `verified` through a compare-and-set so two
//! concurrent submissions of one hash cannot both succeed.

use crate::domain::payment::{
    check_transaction, normalize_tx_hash, PaymentPolicy, Rejection, TransactionIndexer,
};
use crate::storage::{
    NewPaymentVerification, PaymentStore, PaymentVerification, VerificationStatus,
};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct PaymentSubmission {
    pub transaction_hash: String,
    pub tier: String,
    pub email: String,
    pub sender_address: String,
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("{0}")]
    Rejected(#[from] Rejection),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub struct PaymentService {
    policy: PaymentPolicy,
    indexer: Arc<dyn TransactionIndexer>,
    store: Arc<dyn PaymentStore>,
}

impl PaymentService {
    pub fn new(policy: PaymentPolicy, indexer: Arc<dyn TransactionIndexer>, store: Arc<dyn PaymentStore>) -> Self {
        Self {
            policy,
            indexer,
            store,
        }
    }

    pub fn policy(&self) -> &PaymentPolicy {
        &self.policy
    }

    pub async fn verify(&self, submission: PaymentSubmission) -> Result<PaymentVerification, VerifyError> {
        let (required_display, required_raw) = self.policy.required_amount(&submission.tier)?;
        let hash = normalize_tx_hash(&submission.transaction_hash)?;
        let sender = submission.sender_address.trim().to_string();

        if let Some(existing) = self.store.find_verification(&hash).await? {
            if existing.status == VerificationStatus::Verified {
                return Err(Rejection::AlreadyUsed.into());
            }
        }

        let pending = self
            .store
            .record_pending(NewPaymentVerification {
                transaction_hash: hash.clone(),
                wallet_address: sender.clone(),
                email: submission.email.trim().to_string(),
                tier: submission.tier.trim().to_lowercase(),
                required_amount: required_display.clone(),
            })
            .await?;
        if pending.is_none() {
            return Err(Rejection::AlreadyUsed.into());
        }

        let tx = self
            .indexer
            .transaction(&hash)
            .await?
            .ok_or(Rejection::NotFound)?;

        let accepted = match check_transaction(&self.policy, &tx, &sender, &required_display, required_raw) {
            Ok(accepted) => accepted,
            Err(rejection) => {
                tracing::info!(tx_hash = %hash, reason = rejection.reason(), "payment rejected");
                return Err(rejection.into());
            }
        };

        let verified = self
            .store
            .mark_verified(&hash, &accepted.amount)
            .await?
            .ok_or(Rejection::AlreadyUsed)?;

        tracing::info!(tx_hash = %hash, amount = %accepted.amount, "payment verified");
        Ok(verified)
    }

    pub async fn list(&self) -> anyhow::Result<Vec<PaymentVerification>> {
        self.store.list_verifications().await
    }
}
