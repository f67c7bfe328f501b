use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::U256;
use serde::Serialize;

use crate::constants::*;
use crate::errors::{Result, VaultClientError};
use crate::state::{ActionKind, UserPosition};

/// Per-block reward rate for each strategy, in snapshot order
pub const STRATEGY_RATES_PER_BLOCK: [u128; 3] = [
    STAKING_RATE_PER_BLOCK,
    LENDING_RATE_PER_BLOCK,
    LP_RATE_PER_BLOCK,
];

/// Base-unit amount (18 decimals) as a float in whole units
pub fn to_units(value: U256) -> f64 {
    format_ether(value).parse::<f64>().unwrap_or(0.0)
}

/// Blended APY estimate from target weights
/// Formula: APY% = (sum(rate_i * weight_i) * BLOCKS_PER_YEAR / 10000) / 1e18 * 100
///
/// Integer math up to the basis-point division, floats afterwards. This is
/// a model estimate: it assumes stable rates and weights at target.
pub fn estimate_apy(weights_bps: [u16; 3]) -> f64 {
    let weighted_rate: u128 = STRATEGY_RATES_PER_BLOCK
        .iter()
        .zip(weights_bps.iter())
        .map(|(&rate, &weight)| rate * weight as u128)
        .sum();

    let annual = weighted_rate * BLOCKS_PER_YEAR / BASIS_POINTS_100_PERCENT;

    #[cfg(feature = "verbose")]
    tracing::trace!(%weighted_rate, %annual, ?weights_bps, "apy estimate");

    annual as f64 / WAD as f64 * 100.0
}

/// APY of a single strategy running at 100% weight
pub fn strategy_apy(rate_per_block: u128) -> f64 {
    (rate_per_block * BLOCKS_PER_YEAR) as f64 / WAD as f64 * 100.0
}

/// Share of total assets held by one allocation, in percent.
/// Zero when total assets are zero.
pub fn pct_of_tvl(allocation: U256, total_assets: U256) -> f64 {
    let total = to_units(total_assets);
    if total <= 0.0 {
        return 0.0;
    }
    to_units(allocation) / total * 100.0
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ══════════════════════════════════════════════════════════════════════════════
// SHARE PRICE PROJECTION
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionPoint {
    /// Offset from today in days
    pub day: i32,
    pub label: String,
    /// Set for day <= 0
    pub historical: Option<f64>,
    /// Set for day >= 0
    pub projected: Option<f64>,
}

/// Compounded share price curve over `-days..=days`
///
/// value(d) = share_price * (1 + apy/100/365)^d, multiplied by `user_shares`
/// when the caller holds shares. The past half is synthetic: it is the same
/// curve evaluated at negative offsets, not recorded prices.
pub fn projection_series(
    share_price: f64,
    apy_pct: f64,
    user_shares: f64,
    days: i32,
) -> Vec<ProjectionPoint> {
    let daily_rate = apy_pct / 100.0 / DAYS_PER_YEAR;
    let days = days.max(0);

    (-days..=days)
        .map(|d| {
            let price = share_price * (1.0 + daily_rate).powi(d);
            let value = if user_shares > 0.0 {
                user_shares * price
            } else {
                price
            };
            let value = round_to(value, PROJECTION_DECIMALS);

            let label = match d {
                0 => "Today".to_string(),
                d if d < 0 => format!("{}d", d),
                d => format!("+{}d", d),
            };

            ProjectionPoint {
                day: d,
                label,
                historical: (d <= 0).then_some(value),
                projected: (d >= 0).then_some(value),
            }
        })
        .collect()
}

// ══════════════════════════════════════════════════════════════════════════════
// AMOUNT PARSING
// ══════════════════════════════════════════════════════════════════════════════

/// Decimal CTC string to 18-decimal base units, without range checks
pub fn to_base_units(amount: &str) -> Result<U256> {
    parse_ether(amount.trim())
        .map_err(|e| VaultClientError::InvalidAmount(format!("{}: {}", amount, e)))
}

/// Form-level validation: non-empty, parseable, strictly positive
pub fn validate_amount(amount: &str) -> Result<U256> {
    let trimmed = amount.trim();
    if trimmed.is_empty() {
        return Err(VaultClientError::InvalidAmount("amount is required".to_string()));
    }
    if trimmed.starts_with('-') {
        return Err(VaultClientError::InvalidAmount(format!(
            "{}: must be positive",
            trimmed
        )));
    }

    let value = to_base_units(trimmed)?;
    if value.is_zero() {
        return Err(VaultClientError::InvalidAmount(format!(
            "{}: must be greater than zero",
            trimmed
        )));
    }
    Ok(value)
}

/// Largest amount the form may prefill for `kind`, None when nothing is
/// available or the balance is unknown.
///
/// Deposits keep `DEPOSIT_GAS_RESERVE` in the wallet. Withdrawals are capped
/// by the vault's `maxWithdraw`, redemptions by the share balance.
pub fn max_amount(position: &UserPosition, kind: ActionKind) -> Option<U256> {
    let max = match kind {
        ActionKind::Deposit => position
            .native_balance?
            .saturating_sub(U256::from(DEPOSIT_GAS_RESERVE)),
        ActionKind::Withdraw => position.max_withdraw?,
        ActionKind::Redeem => position.shares?,
    };
    (!max.is_zero()).then_some(max)
}
