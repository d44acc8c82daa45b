// src/bin/api_server.rs

use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use multichain_wallet_service::infra::indexer::MoralisIndexer;
use multichain_wallet_service::infra::rpc::build_sources;
use multichain_wallet_service::transport;
use multichain_wallet_service::{BalanceAggregator, ClaimService, PaymentService, PgStore, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_env()?;

    // --- Store Initialization ---
    tracing::info!("connecting to database");
    let store = Arc::new(PgStore::connect(&settings.database_url).await?);

    // --- Balance sources ---
    let http = reqwest::Client::new();
    let sources = build_sources(&settings.chains, http.clone());
    tracing::info!(
        sources = sources.len(),
        timeout_secs = settings.balance_timeout.as_secs(),
        "balance aggregator ready"
    );
    let aggregator = Arc::new(BalanceAggregator::new(sources, settings.balance_timeout));

    // --- Payment verification ---
    let indexer = Arc::new(MoralisIndexer::new(http, &settings.indexer));
    tracing::info!(
        token = %settings.payment.token_contract,
        recipient = %settings.payment.recipient,
        tiers = ?settings.payment.tiers,
        "payment verifier ready"
    );

    let app_state = transport::http::AppState {
        claim_service: Arc::new(ClaimService::new(store.clone(), aggregator)),
        payment_service: Arc::new(PaymentService::new(settings.payment.clone(), indexer, store)),
    };

    // --- API Server Initialization ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!(addr = %settings.bind_addr, "API server listening (Swagger UI at /swagger-ui)");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await?;

    tracing::info!("graceful shutdown complete");
    Ok(())
}
