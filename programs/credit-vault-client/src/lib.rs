//! Client core for the Credit Vault, a multi-strategy yield vault on
//! Creditcoin testnet.
//!
//! - `gateway`: typed, batched reads and the three writes
//! - `aggregator`: APY, TVL split and projections from a snapshot
//! - `reconciliation`: bounded event-log history feed
//! - `actions`: deposit/withdraw/redeem lifecycle with notifications
//! - `store`: shared snapshot/position slots with single-flight polling

pub mod actions;
pub mod aggregator;
pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod gateway;
pub mod helpers;
pub mod notifications;
pub mod reconciliation;
pub mod state;
pub mod store;

#[cfg(test)]
mod formal_verification;

pub use actions::TransactionActionController;
pub use aggregator::{aggregate, position_metrics, PositionMetrics, StrategyView, VaultMetrics};
pub use config::{ChainConfig, ReconciliationConfig, VaultClientConfig};
pub use errors::{ErrorCategory, FeedError, Result, VaultClientError};
pub use gateway::{BlockRange, RpcVaultGateway, VaultGateway, VaultWrite};
pub use notifications::{ChannelNotifier, Notification, NotificationVariant, Notifier};
pub use reconciliation::{FeedFilter, FeedSummary, TransactionFeed};
pub use state::*;
pub use store::{RefreshOutcome, VaultStore};
