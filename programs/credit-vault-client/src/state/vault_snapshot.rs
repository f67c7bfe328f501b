use alloy::primitives::U256;
use serde::Serialize;

use crate::constants::BASIS_POINTS_100_PERCENT;

/// The three yield strategies capital is split across
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Strategy {
    Staking,
    Lending,
    Lp,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Staking, Strategy::Lending, Strategy::Lp];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Staking => "Staking",
            Strategy::Lending => "Lending",
            Strategy::Lp => "LP (Liquidity)",
        }
    }

    pub fn risk(self) -> &'static str {
        match self {
            Strategy::Staking => "Low",
            Strategy::Lending => "Medium",
            Strategy::Lp => "Medium-High",
        }
    }
}

/// One base-unit amount per strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StrategyAmounts {
    pub staking: U256,
    pub lending: U256,
    pub lp: U256,
}

impl StrategyAmounts {
    pub fn new(staking: U256, lending: U256, lp: U256) -> Self {
        Self {
            staking,
            lending,
            lp,
        }
    }

    pub fn get(&self, strategy: Strategy) -> U256 {
        match strategy {
            Strategy::Staking => self.staking,
            Strategy::Lending => self.lending,
            Strategy::Lp => self.lp,
        }
    }

    pub fn total(&self) -> U256 {
        self.staking
            .saturating_add(self.lending)
            .saturating_add(self.lp)
    }
}

/// Target weights in basis points, as read from the vault
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StrategyWeights {
    pub staking: Option<u16>,
    pub lending: Option<u16>,
    pub lp: Option<u16>,
}

impl StrategyWeights {
    pub fn new(staking: u16, lending: u16, lp: u16) -> Self {
        Self {
            staking: Some(staking),
            lending: Some(lending),
            lp: Some(lp),
        }
    }

    pub fn get(&self, strategy: Strategy) -> Option<u16> {
        match strategy {
            Strategy::Staking => self.staking,
            Strategy::Lending => self.lending,
            Strategy::Lp => self.lp,
        }
    }

    /// All three weights, or None if any read failed
    pub fn complete(&self) -> Option<[u16; 3]> {
        Some([self.staking?, self.lending?, self.lp?])
    }

    pub fn is_complete(&self) -> bool {
        self.complete().is_some()
    }

    /// Weights are contract-enforced to sum to 10000; this only reports it
    pub fn sums_to_full(&self) -> bool {
        self.complete()
            .map(|w| w.iter().map(|&x| x as u128).sum::<u128>() == BASIS_POINTS_100_PERCENT)
            .unwrap_or(false)
    }
}

/// One batched read of vault-level state
///
/// Each field is `None` when its call inside the batch failed; the rest of
/// the snapshot is still usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VaultSnapshot {
    /// Underlying CTC held across the vault and strategies (base units)
    pub total_assets: Option<U256>,

    /// cvCTC share supply
    pub total_supply: Option<U256>,

    /// Assets per share, 18-decimal fixed point
    pub share_price: Option<U256>,

    /// Capital currently deployed per strategy
    pub allocations: Option<StrategyAmounts>,

    /// Rewards accrued per strategy and not yet harvested
    pub pending_rewards: Option<StrategyAmounts>,

    /// Lifetime harvested rewards
    pub total_harvested: Option<U256>,

    /// Block height of the last harvest
    pub last_harvest_block: Option<u64>,

    pub weights: StrategyWeights,
}

impl VaultSnapshot {
    /// Number of fields that failed to load
    pub fn missing_fields(&self) -> usize {
        [
            self.total_assets.is_none(),
            self.total_supply.is_none(),
            self.share_price.is_none(),
            self.allocations.is_none(),
            self.pending_rewards.is_none(),
            self.total_harvested.is_none(),
            self.last_harvest_block.is_none(),
            self.weights.staking.is_none(),
            self.weights.lending.is_none(),
            self.weights.lp.is_none(),
        ]
        .iter()
        .filter(|missing| **missing)
        .count()
    }
}
