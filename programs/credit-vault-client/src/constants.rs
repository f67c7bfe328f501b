use std::time::Duration;

use alloy::primitives::{address, Address};

// ══════════════════════════════════════════════════════════════════════════════
// NETWORK
// ══════════════════════════════════════════════════════════════════════════════

/// Creditcoin Testnet chain id
pub const CHAIN_ID: u64 = 102_031;

pub const CHAIN_NAME: &str = "Creditcoin Testnet";

/// Public HTTP RPC endpoint
pub const DEFAULT_RPC_URL: &str = "https://rpc.cc3-testnet.creditcoin.network";

/// Blockscout explorer base URL (no trailing slash)
pub const DEFAULT_EXPLORER_URL: &str = "https://creditcoin-testnet.blockscout.com";

pub const NATIVE_CURRENCY_NAME: &str = "Testnet CTC";
pub const NATIVE_CURRENCY_SYMBOL: &str = "tCTC";
pub const NATIVE_CURRENCY_DECIMALS: u8 = 18;

/// Multicall3 (same deployment address on every EVM chain)
pub const MULTICALL3: Address = address!("cA11bde05977b3631167028862bE2a173976CA11");

// ══════════════════════════════════════════════════════════════════════════════
// YIELD MODEL
// ══════════════════════════════════════════════════════════════════════════════

/// Reward rate per block for the staking strategy (1e18 scale)
pub const STAKING_RATE_PER_BLOCK: u128 = 15_870_000_000;

/// Reward rate per block for the lending strategy (1e18 scale)
pub const LENDING_RATE_PER_BLOCK: u128 = 11_900_000_000;

/// Reward rate per block for the LP strategy (1e18 scale)
pub const LP_RATE_PER_BLOCK: u128 = 7_937_000_000;

/// Expected blocks per year at 5s block time: 365 * 24 * 3600 / 5
pub const BLOCKS_PER_YEAR: u128 = 6_307_200;

/// 100% in basis points
pub const BASIS_POINTS_100_PERCENT: u128 = 10_000;

/// Fixed-point scale of share price and reward rates
pub const WAD: u128 = 1_000_000_000_000_000_000;

pub const DAYS_PER_YEAR: f64 = 365.0;

/// Days on each side of today in the share price projection
pub const PROJECTION_DAYS: i32 = 15;

/// Rounding applied to projection points (decimals)
pub const PROJECTION_DECIMALS: i32 = 6;

// ══════════════════════════════════════════════════════════════════════════════
// EVENT RECONCILIATION
// ══════════════════════════════════════════════════════════════════════════════

/// Most recent blocks scanned for vault events (~2.9 days at 5s blocks)
pub const RECONCILIATION_WINDOW_BLOCKS: u64 = 50_000;

/// Block span of a single eth_getLogs query
/// Most public RPC nodes cap log ranges well above this
pub const LOG_CHUNK_BLOCKS: u64 = 5_000;

// ══════════════════════════════════════════════════════════════════════════════
// POLLING & UI LIMITS
// ══════════════════════════════════════════════════════════════════════════════

/// Snapshot and position refresh interval, independent of user actions
pub const SNAPSHOT_POLL_INTERVAL: Duration = Duration::from_secs(12);

/// Upper bound for error text surfaced in notifications
pub const MAX_NOTIFICATION_CHARS: usize = 120;

/// Native CTC left in the wallet for gas when depositing the max (0.01 CTC)
pub const DEPOSIT_GAS_RESERVE: u128 = 10_000_000_000_000_000;

/// Decimals of a prefilled max amount in the action form
pub const MAX_AMOUNT_DECIMALS: usize = 6;
