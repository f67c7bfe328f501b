//! Display metrics derived from a vault snapshot.
//!
//! Everything here is a pure function of its inputs plus the rate constants.

use alloy::primitives::U256;
use serde::Serialize;

use crate::constants::PROJECTION_DAYS;
use crate::helpers::math::{
    estimate_apy, pct_of_tvl, projection_series, strategy_apy, to_units, ProjectionPoint,
    STRATEGY_RATES_PER_BLOCK,
};
use crate::state::*;

/// One row of the strategy breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyView {
    pub strategy: Strategy,
    pub name: &'static str,
    pub risk: &'static str,
    /// Target weight in basis points
    pub weight_bps: Option<u16>,
    pub allocation: Option<U256>,
    pub pct_of_tvl: f64,
    pub pending_reward: Option<U256>,
    /// APY the strategy would yield at 100% weight
    pub apy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VaultMetrics {
    pub tvl: Option<U256>,
    pub total_supply: Option<U256>,
    /// Assets per share in whole units, 1.0 when unknown
    pub share_price: f64,
    /// Blended APY in percent, 0.0 when any weight is unknown
    pub estimated_apy: f64,
    pub total_pending_rewards: Option<U256>,
    pub total_harvested: Option<U256>,
    pub last_harvest_block: Option<u64>,
    pub strategies: [StrategyView; 3],
}

pub fn aggregate(snapshot: &VaultSnapshot) -> VaultMetrics {
    let estimated_apy = snapshot.weights.complete().map(estimate_apy).unwrap_or(0.0);
    let share_price = snapshot.share_price.map(to_units).unwrap_or(1.0);

    let strategies = Strategy::ALL.map(|strategy| {
        let allocation = snapshot.allocations.map(|a| a.get(strategy));
        let pct = match (allocation, snapshot.total_assets) {
            (Some(alloc), Some(total)) => pct_of_tvl(alloc, total),
            _ => 0.0,
        };
        StrategyView {
            strategy,
            name: strategy.name(),
            risk: strategy.risk(),
            weight_bps: snapshot.weights.get(strategy),
            allocation,
            pct_of_tvl: pct,
            pending_reward: snapshot.pending_rewards.map(|p| p.get(strategy)),
            apy: strategy_apy(STRATEGY_RATES_PER_BLOCK[strategy as usize]),
        }
    });

    VaultMetrics {
        tvl: snapshot.total_assets,
        total_supply: snapshot.total_supply,
        share_price,
        estimated_apy,
        total_pending_rewards: snapshot.pending_rewards.map(|p| p.total()),
        total_harvested: snapshot.total_harvested,
        last_harvest_block: snapshot.last_harvest_block,
        strategies,
    }
}

impl VaultMetrics {
    /// Share price curve around today, scaled to the holder's shares if any
    pub fn projection(&self, user_shares: Option<U256>) -> Vec<ProjectionPoint> {
        let shares = user_shares.map(to_units).unwrap_or(0.0);
        projection_series(self.share_price, self.estimated_apy, shares, PROJECTION_DAYS)
    }
}

/// Profit and loss of a position, in whole units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PositionMetrics {
    pub shares: f64,
    pub assets: f64,
    pub pnl: f64,
    pub pnl_pct: f64,
}

/// Gain measured against a share price of 1.0. Zeros without shares; zero
/// pnl while the converted asset value is unknown.
pub fn position_metrics(position: &UserPosition) -> PositionMetrics {
    let shares = position.shares.map(to_units).unwrap_or(0.0);
    if shares <= 0.0 {
        return PositionMetrics::default();
    }
    let Some(assets) = position.assets.map(to_units) else {
        return PositionMetrics {
            shares,
            ..PositionMetrics::default()
        };
    };
    let pnl = assets - shares;
    PositionMetrics {
        shares,
        assets,
        pnl,
        pnl_pct: pnl / shares * 100.0,
    }
}
