//! Resolves which injected wallet provider a client is running under.
//!
//! Browsers expose wallets through globals (`window.BinanceChain`, `window.trustwallet`) and
//! through flags on `window.ethereum`. Several wallets also set `isMetaMask`, so the checks are
//! tried in a fixed priority order and the first hit wins.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Provider globals and flags reported by the client.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InjectedProviders {
    #[serde(default)]
    pub binance_chain: bool,
    #[serde(default)]
    pub trust_wallet: bool,
    #[serde(default)]
    pub ethereum: Option<EthereumFlags>,
}

/// The `is*` flags found on `window.ethereum`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EthereumFlags {
    #[serde(default)]
    pub is_binance: bool,
    #[serde(default)]
    pub is_trust: bool,
    #[serde(default)]
    pub is_trust_wallet: bool,
    #[serde(default)]
    pub is_token_pocket: bool,
    #[serde(default)]
    pub is_coinbase_wallet: bool,
    #[serde(default)]
    pub is_brave_wallet: bool,
    #[serde(default)]
    pub is_rabby: bool,
    #[serde(default)]
    pub is_meta_mask: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Binance,
    Trust,
    TokenPocket,
    Coinbase,
    Brave,
    Rabby,
    MetaMask,
    GenericWeb3,
}

impl ProviderKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::Binance => "Binance Wallet",
            ProviderKind::Trust => "Trust Wallet",
            ProviderKind::TokenPocket => "TokenPocket",
            ProviderKind::Coinbase => "Coinbase Wallet",
            ProviderKind::Brave => "Brave Wallet",
            ProviderKind::Rabby => "Rabby Wallet",
            ProviderKind::MetaMask => "MetaMask",
            ProviderKind::GenericWeb3 => "Web3 Wallet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProviderDescriptor {
    pub kind: ProviderKind,
    pub name: &'static str,
    /// Which global or flag matched.
    pub detected_via: &'static str,
}

struct ProviderCheck {
    kind: ProviderKind,
    detected_via: &'static str,
    matches: fn(&InjectedProviders) -> bool,
}

fn eth(providers: &InjectedProviders, flag: fn(&EthereumFlags) -> bool) -> bool {
    providers.ethereum.as_ref().is_some_and(flag)
}

static CHECKS: &[ProviderCheck] = &[
    ProviderCheck {
        kind: ProviderKind::Binance,
        detected_via: "BinanceChain",
        matches: |p| p.binance_chain,
    },
    ProviderCheck {
        kind: ProviderKind::Trust,
        detected_via: "trustwallet",
        matches: |p| p.trust_wallet,
    },
    ProviderCheck {
        kind: ProviderKind::Binance,
        detected_via: "ethereum.isBinance",
        matches: |p| eth(p, |f| f.is_binance),
    },
    ProviderCheck {
        kind: ProviderKind::Trust,
        detected_via: "ethereum.isTrust",
        matches: |p| eth(p, |f| f.is_trust || f.is_trust_wallet),
    },
    ProviderCheck {
        kind: ProviderKind::TokenPocket,
        detected_via: "ethereum.isTokenPocket",
        matches: |p| eth(p, |f| f.is_token_pocket),
    },
    ProviderCheck {
        kind: ProviderKind::Coinbase,
        detected_via: "ethereum.isCoinbaseWallet",
        matches: |p| eth(p, |f| f.is_coinbase_wallet),
    },
    ProviderCheck {
        kind: ProviderKind::Brave,
        detected_via: "ethereum.isBraveWallet",
        matches: |p| eth(p, |f| f.is_brave_wallet),
    },
    ProviderCheck {
        kind: ProviderKind::Rabby,
        detected_via: "ethereum.isRabby",
        matches: |p| eth(p, |f| f.is_rabby),
    },
    // Many wallets impersonate MetaMask, keep it after every specific flag.
    ProviderCheck {
        kind: ProviderKind::MetaMask,
        detected_via: "ethereum.isMetaMask",
        matches: |p| eth(p, |f| f.is_meta_mask),
    },
    ProviderCheck {
        kind: ProviderKind::GenericWeb3,
        detected_via: "ethereum",
        matches: |p| p.ethereum.is_some(),
    },
];

/// First provider whose check matches, in priority order.
pub fn detect_provider(providers: &InjectedProviders) -> Option<ProviderDescriptor> {
    CHECKS
        .iter()
        .find(|check| (check.matches)(providers))
        .map(|check| ProviderDescriptor {
            kind: check.kind,
            name: check.kind.display_name(),
            detected_via: check.detected_via,
        })
}
