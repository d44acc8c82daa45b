//! `PgStore` against a real database. Skipped when `DATABASE_URL` is not set.
//!
//! Uses per-run unique addresses and hashes so it never touches existing rows.

use chrono::Utc;
use multichain_wallet_service::domain::balance::zero_balances;
use multichain_wallet_service::storage::{
    ClaimStore, ClaimUpsert, NewPaymentVerification, PaymentStore, PgStore, VerificationStatus,
};
use sqlx::Row;
use std::env;

async fn store() -> Option<PgStore> {
    dotenv::dotenv().ok();
    let url = match env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            println!("DATABASE_URL not set, skipping");
            return None;
        }
    };
    Some(PgStore::connect(&url).await.expect("connect to DATABASE_URL"))
}

fn run_suffix() -> String {
    format!("{:x}", Utc::now().timestamp_nanos_opt().unwrap_or_default())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn claim_upsert_reports_created_then_updated() -> Result<(), Box<dyn std::error::Error>> {
    let Some(store) = store().await else {
        return Ok(());
    };
    let address = format!("0x{:0>40}", run_suffix());

    let mut balances = zero_balances();
    let first = store
        .upsert_claim(ClaimUpsert {
            wallet_address: address.clone(),
            balances: balances.clone(),
            wallet_type: Some("MetaMask".to_string()),
        })
        .await?;
    assert!(first.created());

    balances.insert("ETH".to_string(), "1.5".to_string());
    let second = store
        .upsert_claim(ClaimUpsert {
            wallet_address: address.clone(),
            balances,
            wallet_type: None,
        })
        .await?;
    assert!(!second.created());
    assert_eq!(second.claim().id, first.claim().id);
    assert_eq!(second.claim().balances["ETH"], "1.5");
    assert_eq!(second.claim().wallet_type.as_deref(), Some("MetaMask"));

    let fetched = store.get_claim(&address).await?.expect("claim stored");
    assert_eq!(fetched.balances["ETH"], "1.5");

    let row = sqlx::query("SELECT COUNT(*) AS n FROM claims WHERE wallet_address = $1")
        .bind(&address)
        .fetch_one(store.pool())
        .await?;
    let n: i64 = row.try_get("n")?;
    assert_eq!(n, 1);

    sqlx::query("DELETE FROM claims WHERE wallet_address = $1")
        .bind(&address)
        .execute(store.pool())
        .await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn verified_hash_cannot_be_recorded_again() -> Result<(), Box<dyn std::error::Error>> {
    let Some(store) = store().await else {
        return Ok(());
    };
    let hash = format!("0x{:0>64}", run_suffix());
    let new = || NewPaymentVerification {
        transaction_hash: hash.clone(),
        wallet_address: "0x742d35cc6634c0532925a3b844bc9e7595f2bd18".to_string(),
        email: "buyer@example.com".to_string(),
        tier: "standard".to_string(),
        required_amount: "70".to_string(),
    };

    let pending = store.record_pending(new()).await?.expect("fresh hash is recorded");
    assert_eq!(pending.status, VerificationStatus::Pending);

    // A pending record may be retried.
    let retried = store.record_pending(new()).await?.expect("pending hash can be retried");
    assert_eq!(retried.id, pending.id);

    let verified = store.mark_verified(&hash, "70.00").await?.expect("pending -> verified");
    assert_eq!(verified.status, VerificationStatus::Verified);
    assert_eq!(verified.amount.as_deref(), Some("70.00"));

    assert!(store.mark_verified(&hash, "70.00").await?.is_none());
    assert!(store.record_pending(new()).await?.is_none());

    sqlx::query("DELETE FROM payment_verifications WHERE transaction_hash = $1")
        .bind(&hash)
        .execute(store.pool())
        .await?;
    Ok(())
}
