use multichain_wallet_service::domain::balance::Asset;
use multichain_wallet_service::infra::config::Settings;
use multichain_wallet_service::infra::rpc::{build_sources, JsonRpcClient};
use multichain_wallet_service::storage::ClaimStore;
use multichain_wallet_service::{BalanceAggregator, PgStore};
use serde_json::{json, Value as JsonValue};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--address <wallet>]\n\
         \n\
         Requires env vars:\n\
           DATABASE_URL, INDEXER_API_KEY, PAYMENT_RECIPIENT\n\
         Optional chain overrides:\n\
           ETH_RPC_URL, BSC_RPC_URL, POLYGON_RPC_URL, SOLANA_RPC_URL,\n\
           TRON_API_URL, TON_API_URL, BTC_API_URL\n\
         \n\
         --address runs a full balance aggregation for the given wallet.\n"
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let address = match args.iter().position(|a| a == "--address") {
        Some(i) => match args.get(i + 1) {
            Some(a) => Some(a.clone()),
            None => usage_and_exit(),
        },
        None => None,
    };

    // Force-read config (nice error messages if missing)
    let settings = Settings::from_env()?;

    println!("> Preflight:");
    println!("  BIND_ADDR={}", settings.bind_addr);
    println!("  BALANCE_TIMEOUT_SECS={}", settings.balance_timeout.as_secs());
    println!("  INDEXER_API_URL={} (chain {})", settings.indexer.api_url, settings.indexer.chain);
    println!(
        "  PAYMENT_TOKEN={} {} ({} decimals) -> {}",
        settings.payment.token_symbol,
        settings.payment.token_contract,
        settings.payment.token_decimals,
        settings.payment.recipient
    );
    for (tier, amount) in &settings.payment.tiers {
        println!("  tier {}: {} {}", tier, amount, settings.payment.token_symbol);
    }

    // Database connectivity (also creates the tables if missing)
    let store = PgStore::connect(&settings.database_url).await?;
    store.ping().await?;
    println!("  Database reachable, tables present.");

    // Chain endpoints
    let http = reqwest::Client::new();
    let chains = &settings.chains;
    let mut failures = 0usize;

    for (name, url) in [
        ("ETH", &chains.eth_rpc_url),
        ("BSC", &chains.bsc_rpc_url),
        ("POLYGON", &chains.polygon_rpc_url),
    ] {
        let rpc = JsonRpcClient::new(http.clone(), url);
        match rpc.call::<String>("eth_blockNumber", json!([])).await {
            Ok(block) => println!("  {} RPC ok ({}), head block {}", name, url, block),
            Err(e) => {
                failures += 1;
                eprintln!("  Warning: {} RPC {} failed: {}", name, url, e);
            }
        }
    }

    let solana = JsonRpcClient::new(http.clone(), &chains.solana_rpc_url);
    match solana.call::<JsonValue>("getHealth", json!([])).await {
        Ok(health) => println!("  SOLANA RPC ok ({}), health {}", chains.solana_rpc_url, health),
        Err(e) => {
            failures += 1;
            eprintln!("  Warning: SOLANA RPC {} failed: {}", chains.solana_rpc_url, e);
        }
    }

    for (name, url) in [
        ("TRON", &chains.tron_api_url),
        ("TON", &chains.ton_api_url),
        ("BTC", &chains.btc_api_url),
    ] {
        match http.get(url.as_str()).send().await {
            Ok(resp) => println!("  {} API reachable ({}), HTTP {}", name, url, resp.status()),
            Err(e) => {
                failures += 1;
                eprintln!("  Warning: {} API {} unreachable: {}", name, url, e);
            }
        }
    }

    if let Some(address) = address {
        let aggregator = BalanceAggregator::new(build_sources(chains, http), settings.balance_timeout);
        let balances = aggregator.fetch_balances(&address).await;
        println!("  Balances for {}:", address);
        for asset in Asset::ALL {
            let value = balances
                .get(asset.symbol())
                .map(String::as_str)
                .unwrap_or_else(|| asset.zero_value());
            println!("    {:<11} {}", asset.symbol(), value);
        }
    }

    if failures > 0 {
        // Failed sources only degrade to zero balances, so this is not fatal.
        println!("> Preflight finished with {} unreachable endpoint(s).", failures);
    } else {
        println!("> Preflight OK.");
    }
    Ok(())
}
