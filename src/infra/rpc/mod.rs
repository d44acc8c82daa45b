//! Outbound balance providers, one [`BalanceSource`] per asset.

pub mod bitcoin;
pub mod evm;
pub mod jsonrpc;
pub mod solana;
pub mod ton;
pub mod tron;

use crate::domain::balance::{Asset, BalanceSource};
use crate::infra::config::ChainEndpoints;
use std::sync::Arc;

pub use bitcoin::BitcoinSource;
pub use evm::{Erc20Source, EvmNativeSource};
pub use jsonrpc::JsonRpcClient;
pub use solana::SolanaSource;
pub use ton::TonSource;
pub use tron::{Trc20Source, TrxSource};

pub const USDT_ERC20_CONTRACT: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";
pub const USDT_BEP20_CONTRACT: &str = "0x55d398326f99059fF775485246999027B3197955";
pub const USDC_ERC20_CONTRACT: &str = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48";
pub const USDT_TRC20_CONTRACT: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";

/// Builds the full production source list sharing one HTTP client (and its connection pool).
pub fn build_sources(endpoints: &ChainEndpoints, http: reqwest::Client) -> Vec<Arc<dyn BalanceSource>> {
    let eth = JsonRpcClient::new(http.clone(), &endpoints.eth_rpc_url);
    let bsc = JsonRpcClient::new(http.clone(), &endpoints.bsc_rpc_url);
    let polygon = JsonRpcClient::new(http.clone(), &endpoints.polygon_rpc_url);
    let solana = JsonRpcClient::new(http.clone(), &endpoints.solana_rpc_url);

    vec![
        Arc::new(EvmNativeSource::new(Asset::Eth, eth.clone())),
        Arc::new(EvmNativeSource::new(Asset::Bnb, bsc.clone())),
        Arc::new(EvmNativeSource::new(Asset::Matic, polygon)),
        Arc::new(BitcoinSource::new(http.clone(), &endpoints.btc_api_url)),
        Arc::new(SolanaSource::new(solana)),
        Arc::new(TrxSource::new(http.clone(), &endpoints.tron_api_url)),
        Arc::new(TonSource::new(http.clone(), &endpoints.ton_api_url)),
        Arc::new(Erc20Source::new(Asset::UsdtErc20, eth.clone(), USDT_ERC20_CONTRACT)),
        Arc::new(Erc20Source::new(Asset::UsdtBep20, bsc, USDT_BEP20_CONTRACT)),
        Arc::new(Trc20Source::new(
            Asset::UsdtTrc20,
            http,
            &endpoints.tron_api_url,
            USDT_TRC20_CONTRACT,
        )),
        Arc::new(Erc20Source::new(Asset::Usdc, eth, USDC_ERC20_CONTRACT)),
    ]
}
