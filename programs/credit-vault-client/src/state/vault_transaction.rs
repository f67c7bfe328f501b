use alloy::primitives::{Address, TxHash, U256};
use serde::Serialize;

use super::StrategyAmounts;

/// Vault event kinds tracked by the transaction feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum EventKind {
    Deposit,
    Withdraw,
    Harvest,
    Rebalance,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Deposit,
        EventKind::Withdraw,
        EventKind::Harvest,
        EventKind::Rebalance,
    ];

    /// Solidity event name on the vault contract
    pub fn event_name(self) -> &'static str {
        match self {
            EventKind::Deposit => "DepositedCTC",
            EventKind::Withdraw => "WithdrawnCTC",
            EventKind::Harvest => "Harvested",
            EventKind::Rebalance => "Rebalanced",
        }
    }
}

/// Kind-specific part of a feed record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TxPayload {
    /// Deposit or Withdraw
    Transfer { shares: U256, user: Option<Address> },
    Harvest(StrategyAmounts),
    Rebalance(StrategyAmounts),
}

/// One normalized vault event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaultTransaction {
    pub kind: EventKind,
    pub tx_hash: TxHash,
    pub block_number: u64,
    /// Assets moved (Deposit/Withdraw), harvest total, or capital rebalanced
    pub amount: U256,
    pub payload: TxPayload,
}

impl VaultTransaction {
    pub fn shares(&self) -> Option<U256> {
        match &self.payload {
            TxPayload::Transfer { shares, .. } => Some(*shares),
            _ => None,
        }
    }

    pub fn rewards(&self) -> Option<&StrategyAmounts> {
        match &self.payload {
            TxPayload::Harvest(rewards) => Some(rewards),
            _ => None,
        }
    }

    pub fn allocs(&self) -> Option<&StrategyAmounts> {
        match &self.payload {
            TxPayload::Rebalance(allocs) => Some(allocs),
            _ => None,
        }
    }

    /// Originating address (Deposit sender / Withdraw receiver)
    pub fn user(&self) -> Option<Address> {
        match &self.payload {
            TxPayload::Transfer { user, .. } => *user,
            _ => None,
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// RAW LOGS
// ══════════════════════════════════════════════════════════════════════════════

/// Decoded arguments of a Deposit/Withdraw log; absent when undecodable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferArgs {
    pub sender: Option<Address>,
    pub receiver: Option<Address>,
    pub assets: Option<U256>,
    pub shares: Option<U256>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestArgs {
    pub staking_reward: Option<U256>,
    pub lending_reward: Option<U256>,
    pub lp_reward: Option<U256>,
    pub total: Option<U256>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebalanceArgs {
    pub staking_alloc: Option<U256>,
    pub lending_alloc: Option<U256>,
    pub lp_alloc: Option<U256>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEventArgs {
    Deposited(TransferArgs),
    Withdrawn(TransferArgs),
    Harvested(HarvestArgs),
    Rebalanced(RebalanceArgs),
}

impl RawEventArgs {
    pub fn kind(&self) -> EventKind {
        match self {
            RawEventArgs::Deposited(_) => EventKind::Deposit,
            RawEventArgs::Withdrawn(_) => EventKind::Withdraw,
            RawEventArgs::Harvested(_) => EventKind::Harvest,
            RawEventArgs::Rebalanced(_) => EventKind::Rebalance,
        }
    }

    /// Arguments of a log that could not be decoded
    pub fn empty(kind: EventKind) -> Self {
        match kind {
            EventKind::Deposit => RawEventArgs::Deposited(TransferArgs::default()),
            EventKind::Withdraw => RawEventArgs::Withdrawn(TransferArgs::default()),
            EventKind::Harvest => RawEventArgs::Harvested(HarvestArgs::default()),
            EventKind::Rebalance => RawEventArgs::Rebalanced(RebalanceArgs::default()),
        }
    }
}

/// A log as returned by the gateway, before normalization.
/// Pending logs carry no hash or block number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawVaultLog {
    pub tx_hash: Option<TxHash>,
    pub block_number: Option<u64>,
    pub args: RawEventArgs,
}
