//! Bounded reconstruction of the vault's recent activity from event logs.
//!
//! The window is scanned oldest chunk first. Within a chunk the four event
//! kinds are fetched concurrently; the next chunk starts only after all four
//! returned, which keeps at most four log queries in flight against the node.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ReconciliationConfig;
use crate::errors::{FeedError, Result, VaultClientError};
use crate::gateway::{BlockRange, VaultGateway};
use crate::state::*;

/// Consecutive block ranges covering `[latest + 1 - window, latest]`, oldest
/// first, each at most `chunk_blocks` long. The window is clamped at block 0.
pub fn plan_chunks(latest: u64, config: &ReconciliationConfig) -> Vec<BlockRange> {
    let start = latest
        .saturating_add(1)
        .saturating_sub(config.window_blocks());
    let chunk = config.chunk_blocks();

    let mut ranges = Vec::with_capacity(config.rounds() as usize);
    let mut from = start;
    loop {
        let to = from.saturating_add(chunk - 1).min(latest);
        ranges.push(BlockRange { from, to });
        match to.checked_add(1) {
            Some(next) if next <= latest => from = next,
            _ => break,
        }
    }
    ranges
}

/// Fetch, normalize and sort every tracked event in the window.
/// Any failed query aborts the whole pass.
pub async fn reconcile<G>(gateway: &G, config: &ReconciliationConfig) -> Result<Vec<VaultTransaction>>
where
    G: VaultGateway + ?Sized,
{
    let latest = gateway.latest_block().await?;
    let ranges = plan_chunks(latest, config);
    debug!(latest, rounds = ranges.len(), "reconciliation started");

    let mut raw_logs = Vec::new();
    for (round, range) in ranges.iter().enumerate() {
        let (deposits, withdrawals, harvests, rebalances) = tokio::try_join!(
            gateway.fetch_logs(EventKind::Deposit, *range),
            gateway.fetch_logs(EventKind::Withdraw, *range),
            gateway.fetch_logs(EventKind::Harvest, *range),
            gateway.fetch_logs(EventKind::Rebalance, *range),
        )?;

        let count = deposits.len() + withdrawals.len() + harvests.len() + rebalances.len();
        debug!(round, from = range.from, to = range.to, count, "round complete");
        raw_logs.extend(deposits);
        raw_logs.extend(withdrawals);
        raw_logs.extend(harvests);
        raw_logs.extend(rebalances);
    }

    let transactions = merge_and_sort(raw_logs.into_iter().filter_map(normalize).collect());
    info!(latest, count = transactions.len(), "reconciliation complete");
    Ok(transactions)
}

/// Raw log to feed record. Pending logs (no hash or block yet) are dropped.
pub fn normalize(raw: RawVaultLog) -> Option<VaultTransaction> {
    let (Some(tx_hash), Some(block_number)) = (raw.tx_hash, raw.block_number) else {
        debug!(kind = ?raw.args.kind(), "skipping pending log");
        return None;
    };

    let (kind, amount, payload) = match raw.args {
        RawEventArgs::Deposited(args) => (
            EventKind::Deposit,
            args.assets.unwrap_or_default(),
            TxPayload::Transfer {
                shares: args.shares.unwrap_or_default(),
                user: args.sender,
            },
        ),
        RawEventArgs::Withdrawn(args) => (
            EventKind::Withdraw,
            args.assets.unwrap_or_default(),
            TxPayload::Transfer {
                shares: args.shares.unwrap_or_default(),
                user: args.receiver,
            },
        ),
        RawEventArgs::Harvested(args) => (
            EventKind::Harvest,
            args.total.unwrap_or_default(),
            TxPayload::Harvest(StrategyAmounts::new(
                args.staking_reward.unwrap_or_default(),
                args.lending_reward.unwrap_or_default(),
                args.lp_reward.unwrap_or_default(),
            )),
        ),
        RawEventArgs::Rebalanced(args) => {
            let allocs = StrategyAmounts::new(
                args.staking_alloc.unwrap_or_default(),
                args.lending_alloc.unwrap_or_default(),
                args.lp_alloc.unwrap_or_default(),
            );
            (EventKind::Rebalance, allocs.total(), TxPayload::Rebalance(allocs))
        }
    };

    Some(VaultTransaction {
        kind,
        tx_hash,
        block_number,
        amount,
        payload,
    })
}

/// Newest block first. Stable, so records of one block keep fetch order.
pub fn merge_and_sort(mut transactions: Vec<VaultTransaction>) -> Vec<VaultTransaction> {
    transactions.sort_by(|a, b| b.block_number.cmp(&a.block_number));
    transactions
}

// ══════════════════════════════════════════════════════════════════════════════
// FILTERING & SUMMARY
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FeedFilter {
    #[default]
    All,
    /// Records whose originating address is this account
    OwnedBy(Address),
    ByKind(EventKind),
}

impl FeedFilter {
    /// `OwnedBy` from a hex address in any letter case
    pub fn owned_by_hex(address: &str) -> Result<Self> {
        address
            .trim()
            .parse::<Address>()
            .map(FeedFilter::OwnedBy)
            .map_err(|e| VaultClientError::InvalidAddress(format!("{}: {}", address, e)))
    }

    pub fn matches(&self, tx: &VaultTransaction) -> bool {
        match self {
            FeedFilter::All => true,
            FeedFilter::OwnedBy(account) => tx.user() == Some(*account),
            FeedFilter::ByKind(kind) => tx.kind == *kind,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeedSummary {
    pub total: usize,
    pub deposits: usize,
    pub withdrawals: usize,
    pub harvests: usize,
    pub rebalances: usize,
    /// Deposit plus Withdraw amounts
    pub volume: U256,
}

pub fn summarize(transactions: &[VaultTransaction]) -> FeedSummary {
    transactions
        .iter()
        .fold(FeedSummary::default(), |mut summary, tx| {
            summary.total += 1;
            match tx.kind {
                EventKind::Deposit => summary.deposits += 1,
                EventKind::Withdraw => summary.withdrawals += 1,
                EventKind::Harvest => summary.harvests += 1,
                EventKind::Rebalance => summary.rebalances += 1,
            }
            if matches!(tx.kind, EventKind::Deposit | EventKind::Withdraw) {
                summary.volume = summary.volume.saturating_add(tx.amount);
            }
            summary
        })
}

// ══════════════════════════════════════════════════════════════════════════════
// FEED
// ══════════════════════════════════════════════════════════════════════════════

/// Last complete reconciliation result plus the last failure
pub struct TransactionFeed<G: ?Sized> {
    gateway: Arc<G>,
    config: ReconciliationConfig,
    transactions: Vec<VaultTransaction>,
    last_error: Option<FeedError>,
    loaded: bool,
}

impl<G: VaultGateway + ?Sized> TransactionFeed<G> {
    pub fn new(gateway: Arc<G>, config: ReconciliationConfig) -> Self {
        Self {
            gateway,
            config,
            transactions: Vec::new(),
            last_error: None,
            loaded: false,
        }
    }

    /// Re-scan the whole window. On failure the previous list stays in place
    /// and the error is kept for display.
    pub async fn refresh(&mut self) -> std::result::Result<usize, FeedError> {
        match reconcile(self.gateway.as_ref(), &self.config).await {
            Ok(transactions) => {
                self.transactions = transactions;
                self.last_error = None;
                self.loaded = true;
                Ok(self.transactions.len())
            }
            Err(err) => {
                let feed_error = FeedError::from_error(&err);
                warn!(category = ?feed_error.category, error = %err, "feed refresh failed");
                self.last_error = Some(feed_error.clone());
                Err(feed_error)
            }
        }
    }

    pub fn transactions(&self) -> &[VaultTransaction] {
        &self.transactions
    }

    pub fn filtered(&self, filter: &FeedFilter) -> Vec<VaultTransaction> {
        self.transactions
            .iter()
            .filter(|tx| filter.matches(tx))
            .cloned()
            .collect()
    }

    pub fn summary(&self) -> FeedSummary {
        summarize(&self.transactions)
    }

    pub fn last_error(&self) -> Option<&FeedError> {
        self.last_error.as_ref()
    }

    /// True once a refresh has completed at least once
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }
}
