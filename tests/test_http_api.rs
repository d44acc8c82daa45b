//! End-to-end HTTP test: the real router served on an ephemeral port, backed by the in-memory
//! store, fake balance sources and a fixed indexer.

use async_trait::async_trait;
use multichain_wallet_service::app::{ClaimService, PaymentService};
use multichain_wallet_service::domain::balance::{Asset, BalanceAggregator, BalanceSource, FetchError};
use multichain_wallet_service::domain::payment::{IndexedTransaction, PaymentPolicy, TransactionIndexer};
use multichain_wallet_service::storage::MemoryStore;
use multichain_wallet_service::transport;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

const EVM: &str = "0x742d35Cc6634C0532925a3b844Bc9e7595f2bD18";
const TX: &str = "0xcccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccccc";

struct Fixed(Asset, &'static str);

#[async_trait]
impl BalanceSource for Fixed {
    fn asset(&self) -> Asset {
        self.0
    }

    async fn fetch(&self, _address: &str) -> Result<String, FetchError> {
        Ok(self.1.to_string())
    }
}

/// Knows no transaction at all.
struct EmptyIndexer;

#[async_trait]
impl TransactionIndexer for EmptyIndexer {
    async fn transaction(&self, _hash: &str) -> anyhow::Result<Option<IndexedTransaction>> {
        Ok(None)
    }
}

async fn spawn_api() -> Result<String, Box<dyn std::error::Error>> {
    let store = Arc::new(MemoryStore::new());
    let aggregator = Arc::new(BalanceAggregator::new(
        vec![Arc::new(Fixed(Asset::Eth, "1.0")), Arc::new(Fixed(Asset::Usdc, "250.5"))],
        Duration::from_secs(2),
    ));
    let mut tiers = BTreeMap::new();
    tiers.insert("standard".to_string(), "70".to_string());
    let policy = PaymentPolicy {
        token_contract: "0x55d398326f99059fF775485246999027B3197955".to_string(),
        token_symbol: "USDT".to_string(),
        token_decimals: 18,
        recipient: "0x1111111111111111111111111111111111111111".to_string(),
        tiers,
    };

    let app_state = transport::http::AppState {
        claim_service: Arc::new(ClaimService::new(store.clone(), aggregator)),
        payment_service: Arc::new(PaymentService::new(policy, Arc::new(EmptyIndexer), store)),
    };
    let router = transport::http::create_router(app_state);

    // Bind to an ephemeral port to avoid conflicts if an API server is already running.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Ok(format!("http://127.0.0.1:{}", port))
}

#[tokio::test]
async fn health_and_balances() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_api().await?;
    let client = reqwest::Client::new();

    let health = client.get(format!("{}/health", base_url)).send().await?;
    assert_eq!(health.status(), 200);
    let body: Value = health.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");

    let resp = client
        .post(format!("{}/api/balances", base_url))
        .json(&json!({ "wallet_address": EVM }))
        .send()
        .await?;
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await?;
    let balances = body["data"]["balances"].as_object().unwrap();
    assert_eq!(balances.len(), Asset::ALL.len());
    assert_eq!(balances["ETH"], "1.0");
    assert_eq!(balances["USDC"], "250.5");
    assert_eq!(balances["BTC"], "0.00000000");

    let empty = client
        .post(format!("{}/api/balances", base_url))
        .json(&json!({ "wallet_address": "  " }))
        .send()
        .await?;
    assert_eq!(empty.status(), 400);

    let malformed = client
        .post(format!("{}/api/balances", base_url))
        .json(&json!({ "address": EVM }))
        .send()
        .await?;
    assert_eq!(malformed.status(), 422);
    Ok(())
}

#[tokio::test]
async fn claims_upsert_by_address() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_api().await?;
    let client = reqwest::Client::new();

    // No balances supplied: the server aggregates them; wallet type comes from the flags.
    let created = client
        .post(format!("{}/api/claims", base_url))
        .json(&json!({
            "wallet_address": EVM,
            "provider_capabilities": { "ethereum": { "isTrust": true, "isMetaMask": true } }
        }))
        .send()
        .await?;
    assert_eq!(created.status(), 201);
    let created: Value = created.json().await?;
    assert_eq!(created["data"]["wallet_type"], "Trust Wallet");
    assert_eq!(created["data"]["balances"]["ETH"], "1.0");
    let id = created["data"]["id"].clone();

    let updated = client
        .post(format!("{}/api/claims", base_url))
        .json(&json!({ "wallet_address": EVM, "balances": { "ETH": "2.0" } }))
        .send()
        .await?;
    assert_eq!(updated.status(), 200);
    let updated: Value = updated.json().await?;
    assert_eq!(updated["data"]["id"], id);
    assert_eq!(updated["data"]["balances"]["ETH"], "2.0");
    assert_eq!(updated["data"]["wallet_type"], "Trust Wallet");

    let listed: Value = client
        .get(format!("{}/api/claims", base_url))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(listed["data"].as_array().map(Vec::len), Some(1));

    let found = client
        .get(format!("{}/api/claims/{}", base_url, EVM))
        .send()
        .await?;
    assert_eq!(found.status(), 200);

    let missing = client
        .get(format!("{}/api/claims/{}", base_url, "0x0000000000000000000000000000000000000000"))
        .send()
        .await?;
    assert_eq!(missing.status(), 404);
    let missing: Value = missing.json().await?;
    assert_eq!(missing["success"], false);

    let refused = client
        .delete(format!("{}/api/claims", base_url))
        .json(&json!({ "confirm": false }))
        .send()
        .await?;
    assert_eq!(refused.status(), 400);

    let deleted: Value = client
        .delete(format!("{}/api/claims", base_url))
        .json(&json!({ "confirm": true }))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(deleted["data"]["deleted"], 1);
    Ok(())
}

#[tokio::test]
async fn payment_rejections_carry_a_reason() -> Result<(), Box<dyn std::error::Error>> {
    let base_url = spawn_api().await?;
    let client = reqwest::Client::new();

    let submit = |hash: &str, tier: &str| {
        client
            .post(format!("{}/api/payments/verify", base_url))
            .json(&json!({
                "transaction_hash": hash,
                "tier": tier,
                "email": "buyer@example.com",
                "sender_address": EVM
            }))
            .send()
    };

    let not_found = submit(TX, "standard").await?;
    assert_eq!(not_found.status(), 400);
    let body: Value = not_found.json().await?;
    assert_eq!(body["data"]["reason"], "not_found");
    assert_eq!(body["error"], "Transaction not found");

    let tier = submit(TX, "gold").await?;
    assert_eq!(tier.status(), 400);
    let body: Value = tier.json().await?;
    assert_eq!(body["data"]["reason"], "invalid_tier");

    let missing = client
        .post(format!("{}/api/payments/verify", base_url))
        .json(&json!({
            "transaction_hash": TX,
            "tier": "standard",
            "email": "",
            "sender_address": EVM
        }))
        .send()
        .await?;
    assert_eq!(missing.status(), 400);
    let body: Value = missing.json().await?;
    assert!(body["error"].as_str().unwrap().contains("email"));

    let records: Value = client
        .get(format!("{}/api/payments", base_url))
        .send()
        .await?
        .json()
        .await?;
    // The not-found attempt leaves a pending record behind.
    assert_eq!(records["data"][0]["status"], "pending");
    Ok(())
}
