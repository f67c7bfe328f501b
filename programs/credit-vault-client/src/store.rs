//! Shared snapshot and position slots.
//!
//! Each slot is replaced wholesale by a successful refresh and left untouched
//! by a failed one. At most one read per slot is in flight; overlapping
//! refresh requests are coalesced into the outstanding one, except forced
//! refreshes, which queue behind it and then read again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::aggregator::{aggregate, position_metrics, PositionMetrics, VaultMetrics};
use crate::errors::{FeedError, Result};
use crate::gateway::VaultGateway;
use crate::state::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The slot now holds a fresh read
    Updated,
    /// Another refresh of the same slot was in flight; no read was issued
    Coalesced,
    /// No wallet connected, the position slot was cleared
    NoAccount,
}

pub struct VaultStore<G: ?Sized> {
    gateway: Arc<G>,
    snapshot: RwLock<Option<VaultSnapshot>>,
    snapshot_error: RwLock<Option<FeedError>>,
    position: RwLock<Option<UserPosition>>,
    snapshot_in_flight: Mutex<()>,
    position_in_flight: Mutex<()>,
}

impl<G: VaultGateway + ?Sized> VaultStore<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            snapshot: RwLock::new(None),
            snapshot_error: RwLock::new(None),
            position: RwLock::new(None),
            snapshot_in_flight: Mutex::new(()),
            position_in_flight: Mutex::new(()),
        }
    }

    pub fn gateway(&self) -> &Arc<G> {
        &self.gateway
    }

    pub async fn refresh_snapshot(&self) -> Result<RefreshOutcome> {
        let Ok(_in_flight) = self.snapshot_in_flight.try_lock() else {
            debug!("snapshot refresh coalesced");
            return Ok(RefreshOutcome::Coalesced);
        };
        self.load_snapshot().await
    }

    /// Waits out any read in flight, then reads again. Used after a write,
    /// where a read that started before inclusion would be stale.
    pub async fn force_refresh_snapshot(&self) -> Result<RefreshOutcome> {
        let _in_flight = self.snapshot_in_flight.lock().await;
        self.load_snapshot().await
    }

    /// Reads the connected account's position; clears the slot without one
    pub async fn refresh_position(&self) -> Result<RefreshOutcome> {
        let Ok(_in_flight) = self.position_in_flight.try_lock() else {
            debug!("position refresh coalesced");
            return Ok(RefreshOutcome::Coalesced);
        };
        self.load_position().await
    }

    pub async fn force_refresh_position(&self) -> Result<RefreshOutcome> {
        let _in_flight = self.position_in_flight.lock().await;
        self.load_position().await
    }

    // caller holds `snapshot_in_flight`
    async fn load_snapshot(&self) -> Result<RefreshOutcome> {
        match self.gateway.read_snapshot().await {
            Ok(snapshot) => {
                *self.snapshot.write().await = Some(snapshot);
                *self.snapshot_error.write().await = None;
                debug!("snapshot refreshed");
                Ok(RefreshOutcome::Updated)
            }
            Err(err) => {
                let feed_error = FeedError::from_error(&err);
                warn!(category = ?feed_error.category, error = %err, "snapshot refresh failed, keeping last value");
                *self.snapshot_error.write().await = Some(feed_error);
                Err(err)
            }
        }
    }

    // caller holds `position_in_flight`
    async fn load_position(&self) -> Result<RefreshOutcome> {
        let Some(account) = self.gateway.account() else {
            *self.position.write().await = None;
            return Ok(RefreshOutcome::NoAccount);
        };

        match self.gateway.read_user_position(account).await {
            Ok(position) => {
                *self.position.write().await = Some(position);
                debug!(%account, "position refreshed");
                Ok(RefreshOutcome::Updated)
            }
            Err(err) => {
                warn!(%account, error = %err, "position refresh failed, keeping last value");
                Err(err)
            }
        }
    }

    pub async fn snapshot(&self) -> Option<VaultSnapshot> {
        self.snapshot.read().await.clone()
    }

    pub async fn position(&self) -> Option<UserPosition> {
        self.position.read().await.clone()
    }

    /// Error of the last snapshot refresh, cleared by the next success
    pub async fn snapshot_error(&self) -> Option<FeedError> {
        self.snapshot_error.read().await.clone()
    }

    /// Aggregated view of the current snapshot (placeholders before the first read)
    pub async fn metrics(&self) -> VaultMetrics {
        match self.snapshot.read().await.as_ref() {
            Some(snapshot) => aggregate(snapshot),
            None => aggregate(&VaultSnapshot::default()),
        }
    }

    pub async fn position_metrics(&self) -> Option<PositionMetrics> {
        self.position.read().await.as_ref().map(position_metrics)
    }
}

impl<G: VaultGateway + ?Sized + 'static> VaultStore<G> {
    /// Refresh the snapshot and the connected position every `period` until
    /// the handle is aborted
    pub fn spawn_polling(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let store = Arc::clone(self);
        info!(period_secs = period.as_secs(), "vault polling started");

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                // failures already logged and recorded
                let _ = store.refresh_snapshot().await;
                let _ = store.refresh_position().await;
            }
        })
    }
}
