use crate::domain::balance::units::format_units_fixed;
use crate::domain::balance::{Asset, BalanceSource, FetchError};
use crate::infra::rpc::jsonrpc::JsonRpcClient;
use async_trait::async_trait;
use primitive_types::U256;
use serde::Deserialize;
use serde_json::json;

const LAMPORT_DECIMALS: u8 = 9;

/// `getBalance` wraps the lamport count in an RPC context object.
#[derive(Deserialize)]
struct GetBalanceResult {
    value: u64,
}

pub struct SolanaSource {
    rpc: JsonRpcClient,
}

impl SolanaSource {
    pub fn new(rpc: JsonRpcClient) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl BalanceSource for SolanaSource {
    fn asset(&self) -> Asset {
        Asset::Sol
    }

    async fn fetch(&self, address: &str) -> Result<String, FetchError> {
        let result: GetBalanceResult = self.rpc.call("getBalance", json!([address])).await?;
        Ok(format_units_fixed(
            U256::from(result.value),
            LAMPORT_DECIMALS,
            LAMPORT_DECIMALS as usize,
        ))
    }
}
