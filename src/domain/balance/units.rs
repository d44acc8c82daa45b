//! Base-unit <-> decimal string conversion.
//!
//! Chains report balances as integers in their smallest unit (wei, satoshi, lamports, sun,
//! nanoton, token minor units). Everything here works on `U256` so no precision is lost
//! before the value is rendered.

use primitive_types::U256;

/// Renders `value` shifted by `decimals` places, trimming trailing fractional zeros but always
/// keeping at least one fractional digit (`1000000000000000000` @ 18 -> `"1.0"`).
pub fn format_units_trimmed(value: U256, decimals: u8) -> String {
    let (int_part, frac_part) = split_units(value, decimals);
    let frac = frac_part.trim_end_matches('0');
    if frac.is_empty() {
        format!("{}.0", int_part)
    } else {
        format!("{}.{}", int_part, frac)
    }
}

/// Renders `value` shifted by `decimals` places with exactly `places` fractional digits.
///
/// Extra precision is truncated, never rounded up, so an amount just below a threshold is
/// never displayed as the threshold itself.
pub fn format_units_fixed(value: U256, decimals: u8, places: usize) -> String {
    let (int_part, mut frac_part) = split_units(value, decimals);
    if frac_part.len() > places {
        frac_part.truncate(places);
    } else {
        while frac_part.len() < places {
            frac_part.push('0');
        }
    }
    if places == 0 {
        int_part
    } else {
        format!("{}.{}", int_part, frac_part)
    }
}

/// Parses a human decimal string (`"70"`, `"12.5"`) into base units.
///
/// Returns `None` for malformed input or for more fractional digits than `decimals` allows.
pub fn parse_units(amount: &str, decimals: u8) -> Option<U256> {
    let amount = amount.trim();
    let (int_part, frac_part) = match amount.split_once('.') {
        Some((i, f)) => (i, f),
        None => (amount, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.chars().all(|c| c.is_ascii_digit()) || !frac_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if frac_part.len() > decimals as usize {
        return None;
    }

    let mut digits = String::with_capacity(int_part.len() + decimals as usize);
    digits.push_str(int_part);
    digits.push_str(frac_part);
    for _ in frac_part.len()..decimals as usize {
        digits.push('0');
    }
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Some(U256::zero());
    }
    U256::from_dec_str(digits).ok()
}

/// Parses an Ethereum JSON-RPC quantity / ABI word (`0x`-prefixed hex). `"0x"` is zero.
pub fn parse_hex_quantity(raw: &str) -> Option<U256> {
    let raw = raw.trim();
    let hex_digits = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X"))?;
    let hex_digits = hex_digits.trim_start_matches('0');
    if hex_digits.is_empty() {
        return Some(U256::zero());
    }
    U256::from_str_radix(hex_digits, 16).ok()
}

fn split_units(value: U256, decimals: u8) -> (String, String) {
    let digits = value.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return (digits, String::new());
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - digits.len()), digits)
    } else {
        digits
    };
    let split_at = padded.len() - decimals;
    (padded[..split_at].to_string(), padded[split_at..].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_ether_formats_as_one_point_zero() {
        let wei = U256::from_dec_str("1000000000000000000").unwrap();
        assert_eq!(format_units_trimmed(wei, 18), "1.0");
    }

    #[test]
    fn trimmed_keeps_significant_fraction() {
        let wei = U256::from_dec_str("1234500000000000000").unwrap();
        assert_eq!(format_units_trimmed(wei, 18), "1.2345");
        assert_eq!(format_units_trimmed(U256::from(1u64), 18), "0.000000000000000001");
        assert_eq!(format_units_trimmed(U256::zero(), 18), "0.0");
    }

    #[test]
    fn satoshis_format_with_eight_places() {
        assert_eq!(format_units_fixed(U256::from(250_000_000u64), 8, 8), "2.50000000");
        assert_eq!(format_units_fixed(U256::from(1u64), 8, 8), "0.00000001");
    }

    #[test]
    fn fixed_truncates_instead_of_rounding() {
        // 69.999 with 18 decimals
        let raw = U256::from_dec_str("69999000000000000000").unwrap();
        assert_eq!(format_units_fixed(raw, 18, 2), "69.99");
    }

    #[test]
    fn fixed_with_zero_decimals() {
        assert_eq!(format_units_fixed(U256::from(42u64), 0, 2), "42.00");
        assert_eq!(format_units_trimmed(U256::from(42u64), 0), "42.0");
    }

    #[test]
    fn parse_units_shifts_whole_and_fractional_amounts() {
        assert_eq!(
            parse_units("70", 18),
            Some(U256::from_dec_str("70000000000000000000").unwrap())
        );
        assert_eq!(parse_units("12.5", 6), Some(U256::from(12_500_000u64)));
        assert_eq!(parse_units("0", 6), Some(U256::zero()));
        assert_eq!(parse_units(".5", 1), Some(U256::from(5u64)));
    }

    #[test]
    fn parse_units_rejects_garbage() {
        assert_eq!(parse_units("", 6), None);
        assert_eq!(parse_units("1.2.3", 6), None);
        assert_eq!(parse_units("-1", 6), None);
        assert_eq!(parse_units("1.1234567", 6), None);
    }

    #[test]
    fn hex_quantities() {
        assert_eq!(parse_hex_quantity("0x0"), Some(U256::zero()));
        assert_eq!(parse_hex_quantity("0x"), Some(U256::zero()));
        assert_eq!(
            parse_hex_quantity("0xde0b6b3a7640000"),
            Some(U256::from_dec_str("1000000000000000000").unwrap())
        );
        assert_eq!(parse_hex_quantity("1234"), None);
        assert_eq!(parse_hex_quantity("0xzz"), None);
    }
}
