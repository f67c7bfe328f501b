//! Deposit, withdraw and redeem flows.
//!
//! Each flow walks `Idle -> Submitting -> Confirming -> Succeeded | Failed`
//! and publishes every step on a watch channel. Starting a new action while
//! another is outstanding supersedes it: every action is tagged with a
//! generation and only the newest generation may touch the visible state or
//! emit notifications.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use alloy::primitives::U256;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::ChainConfig;
use crate::constants::MAX_NOTIFICATION_CHARS;
use crate::errors::{classify, truncate_message, ErrorCategory, Result, VaultClientError};
use crate::gateway::{VaultGateway, VaultWrite};
use crate::helpers::math::to_base_units;
use crate::notifications::{Notification, Notifier};
use crate::state::*;
use crate::store::VaultStore;

pub const USER_REJECTED_MESSAGE: &str = "Transaction rejected by user";
pub const EXPLORER_LINK_LABEL: &str = "View on explorer";

pub struct TransactionActionController<G: ?Sized, N> {
    store: Arc<VaultStore<G>>,
    notifier: N,
    chain: ChainConfig,
    state: watch::Sender<ActionState>,
    generation: AtomicU64,
}

impl<G, N> TransactionActionController<G, N>
where
    G: VaultGateway + ?Sized,
    N: Notifier,
{
    pub fn new(store: Arc<VaultStore<G>>, notifier: N, chain: ChainConfig) -> Self {
        let (state, _) = watch::channel(ActionState::Idle);
        Self {
            store,
            notifier,
            chain,
            state,
            generation: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> ActionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ActionState> {
        self.state.subscribe()
    }

    /// Back to Idle. A broadcast transaction keeps going on chain, but its
    /// outcome is no longer reported.
    pub fn reset(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_replace(ActionState::Idle);
    }

    /// Deposit `amount` CTC (decimal string) for the connected account
    pub async fn deposit(&self, amount: &str) -> Result<ActionState> {
        let receiver = self.account()?;
        let write = to_base_units(amount).map(|amount| VaultWrite::Deposit { amount, receiver });
        Ok(self.execute(ActionKind::Deposit, write).await)
    }

    /// Withdraw `amount` CTC (decimal string) back to the connected account
    pub async fn withdraw(&self, amount: &str) -> Result<ActionState> {
        let owner = self.account()?;
        let write = to_base_units(amount).map(|amount| VaultWrite::Withdraw {
            amount,
            receiver: owner,
            owner,
        });
        Ok(self.execute(ActionKind::Withdraw, write).await)
    }

    /// Redeem an exact share amount, typically the whole balance
    pub async fn redeem_all(&self, shares: U256) -> Result<ActionState> {
        let owner = self.account()?;
        let write = Ok(VaultWrite::Redeem {
            shares,
            receiver: owner,
            owner,
        });
        Ok(self.execute(ActionKind::Redeem, write).await)
    }

    fn account(&self) -> Result<alloy::primitives::Address> {
        self.store
            .gateway()
            .account()
            .ok_or(VaultClientError::WalletNotConnected)
    }

    /// Runs one action to completion and returns its final state, which is
    /// only published if no newer action started meanwhile.
    async fn execute(&self, kind: ActionKind, write: Result<VaultWrite>) -> ActionState {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let write = match write {
            Ok(write) => write,
            Err(err) => return self.fail(generation, kind, err),
        };

        self.publish(generation, ActionState::Submitting { kind });
        let gateway = self.store.gateway();

        let handle = match gateway.submit_write(write).await {
            Ok(handle) => handle,
            Err(err) => return self.fail(generation, kind, err),
        };
        self.publish(generation, ActionState::Confirming { kind, handle });
        debug!(?kind, tx = %handle.hash(), generation, "awaiting receipt");

        let receipt = match gateway.wait_for_receipt(handle).await {
            Ok(receipt) => receipt,
            Err(err) => return self.fail(generation, kind, err),
        };

        // chain state changed whether or not this action is still tracked
        if let Err(err) = self.store.force_refresh_snapshot().await {
            warn!(error = %err, "post-action snapshot refresh failed");
        }
        if let Err(err) = self.store.force_refresh_position().await {
            warn!(error = %err, "post-action position refresh failed");
        }

        let state = ActionState::Succeeded { kind, receipt };
        if self.publish(generation, state.clone()) {
            info!(?kind, tx = %receipt.tx_hash, gas_used = receipt.gas_used, "action confirmed");
            self.notifier.notify(
                Notification::success(kind.success_message())
                    .with_link(EXPLORER_LINK_LABEL, self.chain.tx_url(&receipt.tx_hash)),
            );
        }
        state
    }

    fn fail(&self, generation: u64, kind: ActionKind, err: VaultClientError) -> ActionState {
        let category = classify(&err);
        let message = match category {
            ErrorCategory::UserRejected => USER_REJECTED_MESSAGE.to_string(),
            _ => truncate_message(&err.to_string(), MAX_NOTIFICATION_CHARS),
        };
        let state = ActionState::Failed {
            kind,
            failure: ActionFailure {
                category,
                message: message.clone(),
            },
        };

        if self.publish(generation, state.clone()) {
            let notification = match category {
                ErrorCategory::UserRejected => {
                    info!(?kind, "action rejected in wallet");
                    Notification::info(message)
                }
                _ => {
                    warn!(?kind, ?category, error = %err, "action failed");
                    Notification::error(message)
                }
            };
            self.notifier.notify(notification);
        }
        state
    }

    /// Publish `state` if `generation` is still the newest action
    fn publish(&self, generation: u64, state: ActionState) -> bool {
        self.state.send_if_modified(|current| {
            if self.generation.load(Ordering::SeqCst) != generation {
                debug!(generation, "dropping superseded action update");
                return false;
            }
            *current = state;
            true
        })
    }
}
