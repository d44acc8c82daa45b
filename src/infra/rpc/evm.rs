use crate::domain::balance::units::{format_units_trimmed, parse_hex_quantity};
use crate::domain::balance::{Asset, BalanceSource, FetchError};
use crate::infra::rpc::jsonrpc::JsonRpcClient;
use async_trait::async_trait;
use primitive_types::U256;
use serde_json::json;

/// `balanceOf(address)`
const BALANCE_OF_SELECTOR: &str = "0x70a08231";
/// `decimals()`
const DECIMALS_SELECTOR: &str = "0x313ce567";
const NATIVE_DECIMALS: u8 = 18;

/// Native coin balance via `eth_getBalance` (ETH, BNB, MATIC).
pub struct EvmNativeSource {
    asset: Asset,
    rpc: JsonRpcClient,
}

impl EvmNativeSource {
    pub fn new(asset: Asset, rpc: JsonRpcClient) -> Self {
        Self { asset, rpc }
    }
}

#[async_trait]
impl BalanceSource for EvmNativeSource {
    fn asset(&self) -> Asset {
        self.asset
    }

    async fn fetch(&self, address: &str) -> Result<String, FetchError> {
        let raw: String = self
            .rpc
            .call("eth_getBalance", json!([address, "latest"]))
            .await?;
        let wei = parse_hex_quantity(&raw)
            .ok_or_else(|| FetchError::Malformed(format!("eth_getBalance returned '{}'", raw)))?;
        Ok(format_units_trimmed(wei, NATIVE_DECIMALS))
    }
}

/// ERC20 / BEP20 token balance: `balanceOf` and `decimals` issued together.
pub struct Erc20Source {
    asset: Asset,
    rpc: JsonRpcClient,
    contract: String,
}

impl Erc20Source {
    pub fn new(asset: Asset, rpc: JsonRpcClient, contract: &str) -> Self {
        Self {
            asset,
            rpc,
            contract: contract.to_string(),
        }
    }

    async fn eth_call(&self, data: String) -> Result<String, FetchError> {
        self.rpc
            .call(
                "eth_call",
                json!([{ "to": self.contract, "data": data }, "latest"]),
            )
            .await
    }
}

#[async_trait]
impl BalanceSource for Erc20Source {
    fn asset(&self) -> Asset {
        self.asset
    }

    async fn fetch(&self, address: &str) -> Result<String, FetchError> {
        let (raw_balance, raw_decimals) = futures::try_join!(
            self.eth_call(balance_of_calldata(address)),
            self.eth_call(DECIMALS_SELECTOR.to_string()),
        )?;

        let balance = parse_hex_quantity(&raw_balance)
            .ok_or_else(|| FetchError::Malformed(format!("balanceOf returned '{}'", raw_balance)))?;
        let decimals = parse_hex_quantity(&raw_decimals)
            .filter(|d| *d <= U256::from(u8::MAX))
            .ok_or_else(|| FetchError::Malformed(format!("decimals returned '{}'", raw_decimals)))?;

        Ok(format_units_trimmed(balance, decimals.low_u32() as u8))
    }
}

/// ABI-encodes `balanceOf(address)`. The caller has already validated `address` as
/// `0x` + 40 hex digits.
pub fn balance_of_calldata(address: &str) -> String {
    let bare = address.trim_start_matches("0x").to_lowercase();
    format!("{}{:0>64}", BALANCE_OF_SELECTOR, bare)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_of_calldata_pads_address_to_one_word() {
        let data = balance_of_calldata("0x742d35Cc6634C0532925a3b844Bc9e7595f2bD18");
        assert_eq!(
            data,
            "0x70a08231000000000000000000000000742d35cc6634c0532925a3b844bc9e7595f2bd18"
        );
        assert_eq!(data.len(), 10 + 64);
    }
}
