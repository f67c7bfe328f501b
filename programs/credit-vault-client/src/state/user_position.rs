use alloy::primitives::{Address, U256};
use serde::Serialize;

/// Connected wallet's stake in the vault
///
/// Only exists while a wallet is connected. Replaced wholesale after every
/// successful write and on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserPosition {
    /// The wallet this position was read for
    pub account: Address,

    /// Native CTC balance of the wallet
    pub native_balance: Option<U256>,

    /// cvCTC shares held
    pub shares: Option<U256>,

    /// Shares converted to CTC at the current share price.
    /// Not read when the share balance is zero or unknown.
    pub assets: Option<U256>,

    /// Maximum CTC the wallet can withdraw right now
    pub max_withdraw: Option<U256>,
}

impl UserPosition {
    pub fn empty(account: Address) -> Self {
        Self {
            account,
            native_balance: None,
            shares: None,
            assets: None,
            max_withdraw: None,
        }
    }

    pub fn has_shares(&self) -> bool {
        self.shares.is_some_and(|s| !s.is_zero())
    }
}
