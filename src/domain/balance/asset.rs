use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Every asset the aggregator reports on. The aggregate result always carries one entry per
/// variant, keyed by [`Asset::symbol`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Asset {
    #[serde(rename = "ETH")]
    Eth,
    #[serde(rename = "BNB")]
    Bnb,
    #[serde(rename = "MATIC")]
    Matic,
    #[serde(rename = "BTC")]
    Btc,
    #[serde(rename = "SOL")]
    Sol,
    #[serde(rename = "TRX")]
    Trx,
    #[serde(rename = "TON")]
    Ton,
    #[serde(rename = "USDT_ERC20")]
    UsdtErc20,
    #[serde(rename = "USDT_BEP20")]
    UsdtBep20,
    #[serde(rename = "USDT_TRC20")]
    UsdtTrc20,
    #[serde(rename = "USDC")]
    Usdc,
}

impl Asset {
    pub const ALL: [Asset; 11] = [
        Asset::Eth,
        Asset::Bnb,
        Asset::Matic,
        Asset::Btc,
        Asset::Sol,
        Asset::Trx,
        Asset::Ton,
        Asset::UsdtErc20,
        Asset::UsdtBep20,
        Asset::UsdtTrc20,
        Asset::Usdc,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Asset::Eth => "ETH",
            Asset::Bnb => "BNB",
            Asset::Matic => "MATIC",
            Asset::Btc => "BTC",
            Asset::Sol => "SOL",
            Asset::Trx => "TRX",
            Asset::Ton => "TON",
            Asset::UsdtErc20 => "USDT_ERC20",
            Asset::UsdtBep20 => "USDT_BEP20",
            Asset::UsdtTrc20 => "USDT_TRC20",
            Asset::Usdc => "USDC",
        }
    }

    /// Value reported when the address is not valid for this asset or the fetch failed.
    pub fn zero_value(self) -> &'static str {
        match self {
            Asset::Btc => "0.00000000",
            Asset::Sol | Asset::Ton => "0.000000000",
            Asset::Trx | Asset::UsdtTrc20 => "0.000000",
            Asset::Eth
            | Asset::Bnb
            | Asset::Matic
            | Asset::UsdtErc20
            | Asset::UsdtBep20
            | Asset::Usdc => "0.00",
        }
    }

    /// Fixed exponent for assets whose precision is known up front. ERC20-style tokens return
    /// `None`: their exponent comes from the contract's `decimals()`.
    pub fn decimals(self) -> Option<u8> {
        match self {
            Asset::Eth | Asset::Bnb | Asset::Matic => Some(18),
            Asset::Btc => Some(8),
            Asset::Sol | Asset::Ton => Some(9),
            Asset::Trx | Asset::UsdtTrc20 => Some(6),
            Asset::UsdtErc20 | Asset::UsdtBep20 | Asset::Usdc => None,
        }
    }

    pub fn address_format(self) -> AddressFormat {
        match self {
            Asset::Eth
            | Asset::Bnb
            | Asset::Matic
            | Asset::UsdtErc20
            | Asset::UsdtBep20
            | Asset::Usdc => AddressFormat::Evm,
            Asset::Btc => AddressFormat::Bitcoin,
            Asset::Sol => AddressFormat::Solana,
            Asset::Trx | Asset::UsdtTrc20 => AddressFormat::Tron,
            Asset::Ton => AddressFormat::Ton,
        }
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Cheap syntactic check run before any network call for an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFormat {
    Evm,
    Bitcoin,
    Solana,
    Tron,
    Ton,
}

impl AddressFormat {
    pub fn matches(self, address: &str) -> bool {
        match self {
            AddressFormat::Evm => evm_re().is_match(address),
            AddressFormat::Bitcoin => bitcoin_re().is_match(address),
            AddressFormat::Solana => solana_re().is_match(address),
            // TRON base58check addresses are 34 characters starting with `T`.
            AddressFormat::Tron => address.starts_with('T') && address.len() == 34,
            AddressFormat::Ton => ton_re().is_match(address),
        }
    }
}

fn evm_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("valid address pattern"))
}

fn bitcoin_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(1|3|bc1)[a-zA-HJ-NP-Z0-9]{25,62}$").expect("valid address pattern"))
}

fn solana_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[1-9A-HJ-NP-Za-km-z]{32,44}$").expect("valid address pattern"))
}

fn ton_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[UEk0-9a-zA-Z_-]{48}$").expect("valid address pattern"))
}
