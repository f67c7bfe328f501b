use alloy::primitives::utils::format_ether;
use alloy::primitives::{Address, TxHash, U256};

use super::math::{max_amount, to_units};
use crate::constants::MAX_AMOUNT_DECIMALS;
use crate::state::{ActionKind, UserPosition};

/// Placeholder for a value whose read failed
pub const PLACEHOLDER: &str = "—";

/// Fixed-decimal display of a base-unit amount, placeholder when unknown
pub fn format_amount(value: Option<U256>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, to_units(v)),
        None => PLACEHOLDER.to_string(),
    }
}

/// Form prefill for the max button, empty when there is nothing to use.
/// Truncated rather than rounded so the prefill never exceeds the max.
pub fn max_amount_input(position: &UserPosition, kind: ActionKind) -> String {
    max_amount(position, kind)
        .map(|max| truncate_decimals(&format_ether(max), MAX_AMOUNT_DECIMALS))
        .unwrap_or_default()
}

fn truncate_decimals(value: &str, decimals: usize) -> String {
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    let fraction: String = fraction
        .chars()
        .chain(std::iter::repeat('0'))
        .take(decimals)
        .collect();
    format!("{}.{}", whole, fraction)
}

/// 0x1234...abcd
pub fn shorten_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// 0x12345678...abcdef
pub fn shorten_hash(hash: &TxHash) -> String {
    let full = hash.to_string();
    format!("{}...{}", &full[..10], &full[full.len() - 6..])
}
