//! PostgreSQL-backed claim and payment-verification store.

use crate::domain::balance::Balances;
use crate::storage::claims::{Claim, ClaimStore, ClaimUpsert, UpsertOutcome};
use crate::storage::payments::{
    NewPaymentVerification, PaymentStore, PaymentVerification, VerificationStatus,
};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{PgPool, Row};

const CLAIM_COLUMNS: &str = "id, wallet_address, balances, wallet_type, claimed_at, updated_at";
const VERIFICATION_COLUMNS: &str = "id, transaction_hash, wallet_address, email, tier, \
     required_amount, amount, status, created_at, verified_at";

/// A store that uses a PostgreSQL connection pool. Cheap to clone.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects and makes sure the tables exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        let store = Self { pool };
        store.create_tables().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn create_tables(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS claims (
                id BIGSERIAL PRIMARY KEY,
                wallet_address TEXT NOT NULL UNIQUE,
                balances JSONB NOT NULL DEFAULT '{}'::jsonb,
                wallet_type TEXT,
                claimed_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS payment_verifications (
                id BIGSERIAL PRIMARY KEY,
                transaction_hash TEXT NOT NULL UNIQUE,
                wallet_address TEXT NOT NULL,
                email TEXT NOT NULL,
                tier TEXT NOT NULL,
                required_amount TEXT NOT NULL,
                amount TEXT,
                status TEXT NOT NULL DEFAULT 'pending',
                created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
                verified_at TIMESTAMPTZ
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn claim_from_row(row: &PgRow) -> Result<Claim> {
    let Json(balances): Json<Balances> = row.try_get("balances")?;
    Ok(Claim {
        id: row.try_get("id")?,
        wallet_address: row.try_get("wallet_address")?,
        balances,
        wallet_type: row.try_get("wallet_type")?,
        claimed_at: row.try_get("claimed_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn verification_from_row(row: &PgRow) -> Result<PaymentVerification> {
    let status: String = row.try_get("status")?;
    Ok(PaymentVerification {
        id: row.try_get("id")?,
        transaction_hash: row.try_get("transaction_hash")?,
        wallet_address: row.try_get("wallet_address")?,
        email: row.try_get("email")?,
        tier: row.try_get("tier")?,
        required_amount: row.try_get("required_amount")?,
        amount: row.try_get("amount")?,
        status: VerificationStatus::parse(&status)?,
        created_at: row.try_get("created_at")?,
        verified_at: row.try_get("verified_at")?,
    })
}

#[async_trait]
impl ClaimStore for PgStore {
    async fn upsert_claim(&self, claim: ClaimUpsert) -> Result<UpsertOutcome> {
        // `xmax = 0` only holds for a freshly inserted tuple.
        let sql = format!(
            "INSERT INTO claims (wallet_address, balances, wallet_type) VALUES ($1, $2, $3)
             ON CONFLICT (wallet_address) DO UPDATE
                SET balances = EXCLUDED.balances,
                    wallet_type = COALESCE(EXCLUDED.wallet_type, claims.wallet_type),
                    updated_at = now()
             RETURNING {}, (xmax = 0) AS inserted",
            CLAIM_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&claim.wallet_address)
            .bind(Json(&claim.balances))
            .bind(&claim.wallet_type)
            .fetch_one(&self.pool)
            .await?;

        let inserted: bool = row.try_get("inserted")?;
        let stored = claim_from_row(&row)?;
        Ok(if inserted {
            UpsertOutcome::Created(stored)
        } else {
            UpsertOutcome::Updated(stored)
        })
    }

    async fn get_claim(&self, wallet_address: &str) -> Result<Option<Claim>> {
        let sql = format!("SELECT {} FROM claims WHERE wallet_address = $1", CLAIM_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(wallet_address)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(claim_from_row).transpose()
    }

    async fn list_claims(&self) -> Result<Vec<Claim>> {
        let sql = format!("SELECT {} FROM claims ORDER BY claimed_at, id", CLAIM_COLUMNS);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(claim_from_row).collect()
    }

    async fn delete_all_claims(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM claims").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl PaymentStore for PgStore {
    async fn find_verification(&self, transaction_hash: &str) -> Result<Option<PaymentVerification>> {
        let sql = format!(
            "SELECT {} FROM payment_verifications WHERE transaction_hash = $1",
            VERIFICATION_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(transaction_hash)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(verification_from_row).transpose()
    }

    async fn record_pending(&self, new: NewPaymentVerification) -> Result<Option<PaymentVerification>> {
        // The WHERE on the conflict arm leaves verified rows untouched and returns no row.
        let sql = format!(
            "INSERT INTO payment_verifications
                (transaction_hash, wallet_address, email, tier, required_amount, status)
             VALUES ($1, $2, $3, $4, $5, 'pending')
             ON CONFLICT (transaction_hash) DO UPDATE
                SET wallet_address = EXCLUDED.wallet_address,
                    email = EXCLUDED.email,
                    tier = EXCLUDED.tier,
                    required_amount = EXCLUDED.required_amount
                WHERE payment_verifications.status = 'pending'
             RETURNING {}",
            VERIFICATION_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(&new.transaction_hash)
            .bind(&new.wallet_address)
            .bind(&new.email)
            .bind(&new.tier)
            .bind(&new.required_amount)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(verification_from_row).transpose()
    }

    async fn mark_verified(&self, transaction_hash: &str, amount: &str) -> Result<Option<PaymentVerification>> {
        let sql = format!(
            "UPDATE payment_verifications
                SET status = 'verified', amount = $2, verified_at = now()
              WHERE transaction_hash = $1 AND status = 'pending'
             RETURNING {}",
            VERIFICATION_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(transaction_hash)
            .bind(amount)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(verification_from_row).transpose()
    }

    async fn list_verifications(&self) -> Result<Vec<PaymentVerification>> {
        let sql = format!(
            "SELECT {} FROM payment_verifications ORDER BY created_at, id",
            VERIFICATION_COLUMNS
        );
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(verification_from_row).collect()
    }
}
