//! Payment verification rules.
//!
//! Given the configured [`PaymentPolicy`] and a transaction fetched from the indexer, decide
//! whether it is a confirmed transfer of at least the tier's amount of the payment token, from
//! the claimed sender to the configured recipient. Each failed rule maps to its own
//! [`Rejection`] so callers can tell the user exactly what to fix.

use crate::domain::balance::units::{format_units_fixed, parse_units};
use crate::domain::payment::indexer::IndexedTransaction;
use crate::domain::payment::transfer::{find_transfer, same_address};
use primitive_types::U256;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct PaymentPolicy {
    pub token_contract: String,
    pub token_symbol: String,
    pub token_decimals: u8,
    pub recipient: String,
    /// tier name (lower-case) -> required whole-token amount, e.g. `"standard" -> "70"`.
    pub tiers: BTreeMap<String, String>,
}

impl PaymentPolicy {
    /// Required amount for `tier` as `(display string, base units)`.
    pub fn required_amount(&self, tier: &str) -> Result<(String, U256), Rejection> {
        let key = tier.trim().to_lowercase();
        let display = self
            .tiers
            .get(&key)
            .ok_or_else(|| Rejection::InvalidTier(tier.trim().to_string()))?;
        let raw = parse_units(display, self.token_decimals)
            .ok_or_else(|| Rejection::InvalidTier(tier.trim().to_string()))?;
        Ok((display.clone(), raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Unknown payment tier '{0}'")]
    InvalidTier(String),
    #[error("Transaction hash must be 0x followed by 64 hex characters")]
    InvalidHash,
    #[error("This transaction hash has already been used")]
    AlreadyUsed,
    #[error("Transaction not found")]
    NotFound,
    #[error("Transaction is not a {0} transfer")]
    NotTokenTransfer(String),
    #[error("Transaction failed or is not confirmed")]
    Unconfirmed,
    #[error("No {0} transfer found in transaction")]
    NoTransferLog(String),
    #[error("Payment was not sent to the correct address")]
    WrongRecipient,
    #[error("Transaction sender does not match your wallet address")]
    WrongSender,
    #[error("Insufficient amount. Required: {required} {symbol}, Received: {received} {symbol}")]
    InsufficientAmount {
        required: String,
        received: String,
        symbol: String,
    },
}

impl Rejection {
    /// Stable machine-readable code returned alongside the message.
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::InvalidTier(_) => "invalid_tier",
            Rejection::InvalidHash => "invalid_hash",
            Rejection::AlreadyUsed => "already_used",
            Rejection::NotFound => "not_found",
            Rejection::NotTokenTransfer(_) => "not_token_transfer",
            Rejection::Unconfirmed => "unconfirmed",
            Rejection::NoTransferLog(_) => "no_transfer_log",
            Rejection::WrongRecipient => "wrong_recipient",
            Rejection::WrongSender => "wrong_sender",
            Rejection::InsufficientAmount { .. } => "insufficient_amount",
        }
    }
}

/// A transfer that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedTransfer {
    pub from: String,
    pub to: String,
    pub amount_raw: U256,
    /// Two-place display amount, e.g. `"70.00"`.
    pub amount: String,
}

/// Lower-cases and validates a `0x` + 64 hex transaction hash.
pub fn normalize_tx_hash(hash: &str) -> Result<String, Rejection> {
    let hash = hash.trim();
    let hex_part = hash.strip_prefix("0x").ok_or(Rejection::InvalidHash)?;
    let bytes = hex::decode(hex_part).map_err(|_| Rejection::InvalidHash)?;
    if bytes.len() != 32 {
        return Err(Rejection::InvalidHash);
    }
    Ok(format!("0x{}", hex::encode(bytes)))
}

pub fn check_transaction(
    policy: &PaymentPolicy,
    tx: &IndexedTransaction,
    sender: &str,
    required_display: &str,
    required_raw: U256,
) -> Result<AcceptedTransfer, Rejection> {
    let to_token = tx
        .to_address
        .as_deref()
        .is_some_and(|to| same_address(to, &policy.token_contract));
    if !to_token {
        return Err(Rejection::NotTokenTransfer(policy.token_symbol.clone()));
    }

    let receipt_ok = tx.receipt_status.as_deref() == Some("1");
    if !receipt_ok || tx.block_number.as_deref().map_or(true, str::is_empty) {
        return Err(Rejection::Unconfirmed);
    }

    let transfer = find_transfer(&tx.logs, &policy.token_contract)
        .ok_or_else(|| Rejection::NoTransferLog(policy.token_symbol.clone()))?;

    if !same_address(&transfer.to, &policy.recipient) {
        return Err(Rejection::WrongRecipient);
    }
    if !same_address(&tx.from_address, sender) {
        return Err(Rejection::WrongSender);
    }

    let received = format_units_fixed(transfer.amount, policy.token_decimals, 2);
    if transfer.amount < required_raw {
        return Err(Rejection::InsufficientAmount {
            required: required_display.to_string(),
            received,
            symbol: policy.token_symbol.clone(),
        });
    }

    Ok(AcceptedTransfer {
        from: transfer.from,
        to: transfer.to,
        amount_raw: transfer.amount,
        amount: received,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::payment::indexer::IndexedLog;
    use crate::domain::payment::transfer::TRANSFER_TOPIC;

    const TOKEN: &str = "0x55d398326f99059fF775485246999027B3197955";
    const RECIPIENT: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";
    const SENDER: &str = "0xAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAaAa";

    fn policy() -> PaymentPolicy {
        PaymentPolicy {
            token_contract: TOKEN.into(),
            token_symbol: "USDT".into(),
            token_decimals: 18,
            recipient: RECIPIENT.into(),
            tiers: BTreeMap::from([
                ("standard".to_string(), "70".to_string()),
                ("premium".to_string(), "150".to_string()),
            ]),
        }
    }

    fn confirmed_tx(amount_hex: &str) -> IndexedTransaction {
        IndexedTransaction {
            hash: format!("0x{}", "ab".repeat(32)),
            from_address: SENDER.to_lowercase(),
            to_address: Some(TOKEN.to_lowercase()),
            receipt_status: Some("1".into()),
            block_number: Some("41234567".into()),
            logs: vec![IndexedLog {
                address: TOKEN.to_lowercase(),
                topic0: Some(TRANSFER_TOPIC.into()),
                topic1: Some(format!("0x{}{}", "0".repeat(24), "a".repeat(40))),
                topic2: Some(format!("0x{}{}", "0".repeat(24), "b".repeat(40))),
                topic3: None,
                data: amount_hex.into(),
            }],
        }
    }

    fn check(tx: &IndexedTransaction, tier: &str) -> Result<AcceptedTransfer, Rejection> {
        let policy = policy();
        let (display, raw) = policy.required_amount(tier)?;
        check_transaction(&policy, tx, SENDER, &display, raw)
    }

    #[test]
    fn accepts_exact_amount() {
        let accepted = check(&confirmed_tx("0x3cb71f51fc5580000"), "standard").unwrap();
        assert_eq!(accepted.amount, "70.00");
        assert_eq!(accepted.to, RECIPIENT);
    }

    #[test]
    fn insufficient_amount_names_required_and_received() {
        // 12.5 USDT against the 70 USDT tier
        let err = check(&confirmed_tx("0xad78ebc5ac620000"), "standard").unwrap_err();
        assert_eq!(err.reason(), "insufficient_amount");
        assert_eq!(
            err.to_string(),
            "Insufficient amount. Required: 70 USDT, Received: 12.50 USDT"
        );
    }

    #[test]
    fn tier_is_case_insensitive_and_validated() {
        assert!(policy().required_amount("Premium").is_ok());
        assert_eq!(
            policy().required_amount("gold").unwrap_err(),
            Rejection::InvalidTier("gold".into())
        );
    }

    #[test]
    fn unconfirmed_transactions_are_rejected() {
        let mut tx = confirmed_tx("0x3cb71f51fc5580000");
        tx.block_number = None;
        assert_eq!(check(&tx, "standard").unwrap_err(), Rejection::Unconfirmed);

        let mut reverted = confirmed_tx("0x3cb71f51fc5580000");
        reverted.receipt_status = Some("0".into());
        assert_eq!(check(&reverted, "standard").unwrap_err(), Rejection::Unconfirmed);
    }

    #[test]
    fn wrong_contract_recipient_and_sender() {
        let mut tx = confirmed_tx("0x3cb71f51fc5580000");
        tx.to_address = Some("0x0000000000000000000000000000000000000001".into());
        assert_eq!(
            check(&tx, "standard").unwrap_err(),
            Rejection::NotTokenTransfer("USDT".into())
        );

        let mut tx = confirmed_tx("0x3cb71f51fc5580000");
        tx.logs[0].topic2 = Some(format!("0x{}{}", "0".repeat(24), "c".repeat(40)));
        assert_eq!(check(&tx, "standard").unwrap_err(), Rejection::WrongRecipient);

        let mut tx = confirmed_tx("0x3cb71f51fc5580000");
        tx.from_address = "0xdddddddddddddddddddddddddddddddddddddddd".into();
        assert_eq!(check(&tx, "standard").unwrap_err(), Rejection::WrongSender);
    }

    #[test]
    fn missing_transfer_log() {
        let mut tx = confirmed_tx("0x3cb71f51fc5580000");
        tx.logs.clear();
        assert_eq!(
            check(&tx, "standard").unwrap_err(),
            Rejection::NoTransferLog("USDT".into())
        );
    }

    #[test]
    fn hash_normalization() {
        let upper = format!("0x{}", "AB".repeat(32));
        assert_eq!(normalize_tx_hash(&upper).unwrap(), format!("0x{}", "ab".repeat(32)));
        assert_eq!(normalize_tx_hash("0x1234"), Err(Rejection::InvalidHash));
        assert_eq!(normalize_tx_hash(&"ab".repeat(32)), Err(Rejection::InvalidHash));
    }
}
