use alloy::primitives::TxHash;
use serde::Serialize;

use crate::constants::MAX_NOTIFICATION_CHARS;

/// Credit Vault client errors
///
/// Every chain interaction returns one of these. Components catch them at
/// their own boundary and turn them into state (feed error, failed action)
/// rather than letting them escape.
#[derive(Debug, thiserror::Error)]
pub enum VaultClientError {
    #[error("RPC request failed: {0}")]
    Rpc(String),

    #[error("Contract call failed: {0}")]
    Contract(#[from] alloy::contract::Error),

    #[error("Transaction failed: {0}")]
    PendingTransaction(#[from] alloy::providers::PendingTransactionError),

    #[error("Transaction {tx_hash} reverted: {reason}")]
    Reverted { tx_hash: TxHash, reason: String },

    #[error("Wallet not connected")]
    WalletNotConnected,

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<alloy::transports::TransportError> for VaultClientError {
    fn from(err: alloy::transports::TransportError) -> Self {
        Self::Rpc(err.to_string())
    }
}

pub type Result<T, E = VaultClientError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Chunk size must be between 1 and the window size ({window}), got {chunk}")]
    InvalidChunk { window: u64, chunk: u64 },

    #[error("Reconciliation window must be at least one block")]
    EmptyWindow,
}

// ══════════════════════════════════════════════════════════════════════════════
// CLASSIFICATION
// ══════════════════════════════════════════════════════════════════════════════

/// How a failure is presented to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorCategory {
    /// RPC unreachable or returned an error - retryable banner
    Network,
    /// RPC transport timed out - calmer "congested" message
    Timeout,
    /// User declined to sign - informational, not an error
    UserRejected,
    /// Execution reverted, at send time or once mined
    Reverted,
    /// Anything else (bad input, config)
    Other,
}

impl ErrorCategory {
    pub fn retryable(self) -> bool {
        matches!(self, Self::Network | Self::Timeout)
    }
}

/// Classify a raw error message by content.
///
/// Wallets and RPC nodes do not share error codes for these cases, so the
/// message text is the only reliable signal.
pub fn classify_message(message: &str) -> Option<ErrorCategory> {
    let lower = message.to_lowercase();
    if lower.contains("rejected") || lower.contains("denied") {
        return Some(ErrorCategory::UserRejected);
    }
    if lower.contains("revert") {
        return Some(ErrorCategory::Reverted);
    }
    if lower.contains("timeout") || lower.contains("timed out") {
        return Some(ErrorCategory::Timeout);
    }
    None
}

pub fn classify(err: &VaultClientError) -> ErrorCategory {
    match err {
        VaultClientError::Reverted { .. } => ErrorCategory::Reverted,
        VaultClientError::WalletNotConnected
        | VaultClientError::InvalidAmount(_)
        | VaultClientError::InvalidAddress(_)
        | VaultClientError::Config(_) => ErrorCategory::Other,
        VaultClientError::Rpc(msg) => classify_message(msg).unwrap_or(ErrorCategory::Network),
        VaultClientError::Contract(_) | VaultClientError::PendingTransaction(_) => {
            classify_message(&err.to_string()).unwrap_or(ErrorCategory::Network)
        }
    }
}

/// Bound a message to `max_chars` characters (not bytes)
pub fn truncate_message(message: &str, max_chars: usize) -> String {
    match message.char_indices().nth(max_chars) {
        Some((idx, _)) => message[..idx].to_string(),
        None => message.to_string(),
    }
}

/// Categorized failure of one reconciliation cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedError {
    pub category: ErrorCategory,
    pub message: String,
}

impl FeedError {
    pub fn from_error(err: &VaultClientError) -> Self {
        Self {
            category: classify(err),
            message: truncate_message(&err.to_string(), MAX_NOTIFICATION_CHARS),
        }
    }

    pub fn retryable(&self) -> bool {
        self.category.retryable()
    }

    /// Text for the inline retry banner
    pub fn user_message(&self) -> String {
        match self.category {
            ErrorCategory::Timeout => "Network congested, try again".to_string(),
            _ => self.message.clone(),
        }
    }
}
