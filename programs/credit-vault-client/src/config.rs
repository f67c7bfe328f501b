use std::str::FromStr;
use std::time::Duration;

use alloy::primitives::{Address, TxHash};

use crate::constants::*;
use crate::errors::ConfigError;

pub const ENV_VAULT_ADDRESS: &str = "CREDIT_VAULT_ADDRESS";
pub const ENV_RPC_URL: &str = "CREDIT_VAULT_RPC_URL";
pub const ENV_EXPLORER_URL: &str = "CREDIT_VAULT_EXPLORER_URL";
pub const ENV_WINDOW_BLOCKS: &str = "CREDIT_VAULT_WINDOW_BLOCKS";
pub const ENV_CHUNK_BLOCKS: &str = "CREDIT_VAULT_CHUNK_BLOCKS";
pub const ENV_POLL_SECS: &str = "CREDIT_VAULT_POLL_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Static description of the target network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub chain_id: u64,
    pub name: String,
    pub rpc_url: String,
    pub explorer_url: String,
    pub native_currency: NativeCurrency,
    pub multicall3: Address,
}

impl ChainConfig {
    pub fn creditcoin_testnet() -> Self {
        Self {
            chain_id: CHAIN_ID,
            name: CHAIN_NAME.to_string(),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            native_currency: NativeCurrency {
                name: NATIVE_CURRENCY_NAME.to_string(),
                symbol: NATIVE_CURRENCY_SYMBOL.to_string(),
                decimals: NATIVE_CURRENCY_DECIMALS,
            },
            multicall3: MULTICALL3,
        }
    }

    fn explorer_base(&self) -> &str {
        self.explorer_url.trim_end_matches('/')
    }

    /// Explorer page for a transaction
    pub fn tx_url(&self, hash: &TxHash) -> String {
        format!("{}/tx/{}", self.explorer_base(), hash)
    }

    /// Explorer page for an address (wallet or contract)
    pub fn address_url(&self, address: &Address) -> String {
        format!("{}/address/{}", self.explorer_base(), address)
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::creditcoin_testnet()
    }
}

/// Bounded event history scan parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconciliationConfig {
    window_blocks: u64,
    chunk_blocks: u64,
}

impl ReconciliationConfig {
    pub fn new(window_blocks: u64, chunk_blocks: u64) -> Result<Self, ConfigError> {
        if window_blocks == 0 {
            return Err(ConfigError::EmptyWindow);
        }
        if chunk_blocks == 0 || chunk_blocks > window_blocks {
            return Err(ConfigError::InvalidChunk {
                window: window_blocks,
                chunk: chunk_blocks,
            });
        }
        Ok(Self {
            window_blocks,
            chunk_blocks,
        })
    }

    pub fn window_blocks(&self) -> u64 {
        self.window_blocks
    }

    pub fn chunk_blocks(&self) -> u64 {
        self.chunk_blocks
    }

    /// Number of sequential fetch rounds: ceil(window / chunk)
    pub fn rounds(&self) -> u64 {
        self.window_blocks.div_ceil(self.chunk_blocks)
    }
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            window_blocks: RECONCILIATION_WINDOW_BLOCKS,
            chunk_blocks: LOG_CHUNK_BLOCKS,
        }
    }
}

/// Everything a client needs to talk to one vault deployment
#[derive(Debug, Clone)]
pub struct VaultClientConfig {
    pub chain: ChainConfig,
    pub vault: Address,
    pub reconciliation: ReconciliationConfig,
    pub poll_interval: Duration,
}

impl VaultClientConfig {
    pub fn new(vault: Address) -> Self {
        Self {
            chain: ChainConfig::default(),
            vault,
            reconciliation: ReconciliationConfig::default(),
            poll_interval: SNAPSHOT_POLL_INTERVAL,
        }
    }

    /// Defaults from `constants`, overridden by `CREDIT_VAULT_*` variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env` with an injectable variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vault_raw = lookup(ENV_VAULT_ADDRESS).ok_or(ConfigError::MissingVar(ENV_VAULT_ADDRESS))?;
        let vault = parse_var::<Address>(ENV_VAULT_ADDRESS, &vault_raw)?;

        let mut config = Self::new(vault);

        if let Some(url) = lookup(ENV_RPC_URL) {
            config.chain.rpc_url = url;
        }
        if let Some(url) = lookup(ENV_EXPLORER_URL) {
            config.chain.explorer_url = url;
        }

        let defaults = ReconciliationConfig::default();
        let window = match lookup(ENV_WINDOW_BLOCKS) {
            Some(raw) => parse_var::<u64>(ENV_WINDOW_BLOCKS, &raw)?,
            None => defaults.window_blocks(),
        };
        let chunk = match lookup(ENV_CHUNK_BLOCKS) {
            Some(raw) => parse_var::<u64>(ENV_CHUNK_BLOCKS, &raw)?,
            None => defaults.chunk_blocks().min(window),
        };
        config.reconciliation = ReconciliationConfig::new(window, chunk)?;

        if let Some(raw) = lookup(ENV_POLL_SECS) {
            let secs = parse_var::<u64>(ENV_POLL_SECS, &raw)?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    name: ENV_POLL_SECS,
                    value: raw,
                });
            }
            config.poll_interval = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn parse_var<T: FromStr>(name: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
        name,
        value: raw.to_string(),
    })
}
