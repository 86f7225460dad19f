use alloy::primitives::U256;
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::DateTime;
use std::str::FromStr;

/// Number of wei in one ether.
const WEI_PER_ETH: u128 = 1_000_000_000_000_000_000;

/// Converts an ETH amount to wei as a `U256`.
/// Returns an error if the value is negative, finer than one wei, or too
/// large to fit in a `u128`.
pub fn eth_to_wei(eth: BigDecimal) -> anyhow::Result<U256> {
    let wei = eth * BigDecimal::from(WEI_PER_ETH);
    if !wei.is_integer() {
        anyhow::bail!("Value {} is not a whole number of wei", wei.normalized());
    }
    let wei = wei
        .to_u128()
        .ok_or_else(|| anyhow::anyhow!("Value out of range for wei"))?;
    Ok(U256::from(wei))
}

/// Converts a wei amount (`U256`) to ETH as a `BigDecimal`.
pub fn wei_to_eth(wei: U256) -> BigDecimal {
    to_token_units(wei, 18)
}

/// Scales a raw token amount down by `decimals` places.
pub fn to_token_units(amount: U256, decimals: u8) -> BigDecimal {
    // U256's decimal rendering is always a valid integer literal.
    let raw = BigDecimal::from_str(&amount.to_string()).unwrap_or_default();
    let scale = BigDecimal::from_str(&format!("1e{decimals}")).unwrap_or_else(|_| 1.into());
    (raw / scale).normalized()
}

/// Formats a block timestamp as `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn format_timestamp(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| format!("<invalid timestamp {timestamp}>"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_between_eth_and_wei() {
        let wei = eth_to_wei(BigDecimal::from_str("0.664").unwrap()).unwrap();
        assert_eq!(wei, U256::from(664_000_000_000_000_000u128));
        assert_eq!(wei_to_eth(wei), BigDecimal::from_str("0.664").unwrap());
    }

    #[test]
    fn negative_eth_is_rejected() {
        assert!(eth_to_wei(BigDecimal::from(-1)).is_err());
    }

    #[test]
    fn sub_wei_fractions_are_rejected() {
        let err = eth_to_wei(BigDecimal::from_str("0.0000000000000000015").unwrap()).unwrap_err();
        assert!(err.to_string().contains("whole number of wei"));

        let one_wei = eth_to_wei(BigDecimal::from_str("0.000000000000000001").unwrap()).unwrap();
        assert_eq!(one_wei, U256::from(1u8));
    }

    #[test]
    fn scales_token_amounts_by_decimals() {
        let amount = U256::from(1_500_000u64);
        assert_eq!(to_token_units(amount, 6), BigDecimal::from_str("1.5").unwrap());
        assert_eq!(to_token_units(amount, 0), BigDecimal::from(1_500_000));
    }

    #[test]
    fn large_balances_keep_precision() {
        let amount = U256::from_str("1000000000000000000000000000").unwrap();
        assert_eq!(to_token_units(amount, 18), BigDecimal::from(1_000_000_000));
    }

    #[test]
    fn formats_timestamps_in_utc() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(1_717_171_717), "2024-05-31 16:08:37");
    }
}
