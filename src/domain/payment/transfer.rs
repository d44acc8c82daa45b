// ERC20 `Transfer(address,address,uint256)` log decoding.

use crate::domain::balance::units::parse_hex_quantity;
use crate::domain::payment::indexer::IndexedLog;
use primitive_types::U256;

/// keccak256("Transfer(address,address,uint256)")
pub const TRANSFER_TOPIC: &str = "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTransfer {
    pub from: String,
    pub to: String,
    pub amount: U256,
}

/// Returns the first well-formed `Transfer` log emitted by `token_contract`.
pub fn find_transfer(logs: &[IndexedLog], token_contract: &str) -> Option<TokenTransfer> {
    logs.iter()
        .filter(|log| same_address(&log.address, token_contract))
        .filter(|log| {
            log.topic0
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(TRANSFER_TOPIC))
        })
        .find_map(decode_transfer)
}

fn decode_transfer(log: &IndexedLog) -> Option<TokenTransfer> {
    let from = topic_to_address(log.topic1.as_deref()?)?;
    let to = topic_to_address(log.topic2.as_deref()?)?;
    let amount = parse_hex_quantity(&log.data)?;
    Some(TokenTransfer { from, to, amount })
}

/// An indexed `address` topic is the 20-byte address left-padded to 32 bytes.
pub fn topic_to_address(topic: &str) -> Option<String> {
    let topic = topic.trim();
    let hex_part = topic.strip_prefix("0x").unwrap_or(topic);
    let bytes = hex::decode(hex_part).ok()?;
    if bytes.len() != 32 {
        return None;
    }
    Some(format!("0x{}", hex::encode(&bytes[12..])))
}

pub fn same_address(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "0x55d398326f99059fF775485246999027B3197955";

    fn transfer_log(amount_hex: &str) -> IndexedLog {
        IndexedLog {
            address: TOKEN.to_lowercase(),
            topic0: Some(TRANSFER_TOPIC.to_string()),
            topic1: Some("0x000000000000000000000000aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".into()),
            topic2: Some("0x000000000000000000000000bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb".into()),
            topic3: None,
            data: amount_hex.to_string(),
        }
    }

    #[test]
    fn decodes_sender_recipient_and_amount() {
        let logs = vec![transfer_log(
            "0x000000000000000000000000000000000000000000000003cb71f51fc5580000",
        )];
        let transfer = find_transfer(&logs, TOKEN).unwrap();
        assert_eq!(transfer.from, "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        assert_eq!(transfer.to, "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb");
        assert_eq!(transfer.amount, U256::from_dec_str("70000000000000000000").unwrap());
    }

    #[test]
    fn ignores_logs_from_other_contracts_and_events() {
        let mut other_contract = transfer_log("0x01");
        other_contract.address = "0x0000000000000000000000000000000000000001".into();
        let mut approval = transfer_log("0x01");
        approval.topic0 =
            Some("0x8c5be1e5ebec7d5bd14f71427d1e84f3dd0314c0f7b2291e5b200ac8c7c3b925".into());

        assert!(find_transfer(&[other_contract, approval], TOKEN).is_none());
    }

    #[test]
    fn rejects_short_topics() {
        assert!(topic_to_address("0x1234").is_none());
        assert!(topic_to_address("not hex").is_none());
    }
}
