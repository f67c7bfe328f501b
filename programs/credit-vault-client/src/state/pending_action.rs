use alloy::primitives::TxHash;
use serde::Serialize;

use crate::errors::ErrorCategory;

/// Write actions a user can take against the vault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionKind {
    Deposit,
    Withdraw,
    Redeem,
}

impl ActionKind {
    pub fn success_message(self) -> &'static str {
        match self {
            ActionKind::Deposit => "Deposit confirmed!",
            ActionKind::Withdraw => "Withdrawal confirmed!",
            ActionKind::Redeem => "Redemption confirmed!",
        }
    }
}

/// Broadcast transaction, not necessarily mined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TxHandle(pub TxHash);

impl TxHandle {
    pub fn hash(&self) -> TxHash {
        self.0
    }
}

/// The parts of a mined receipt the client cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TxReceiptSummary {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionFailure {
    pub category: ErrorCategory,
    pub message: String,
}

/// Lifecycle of the one tracked write action
///
/// Idle -> Submitting (wallet prompt) -> Confirming (broadcast, not mined)
///      -> Succeeded | Failed
///
/// A wallet rejection goes Submitting -> Failed directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub enum ActionState {
    #[default]
    Idle,
    Submitting {
        kind: ActionKind,
    },
    Confirming {
        kind: ActionKind,
        handle: TxHandle,
    },
    Succeeded {
        kind: ActionKind,
        receipt: TxReceiptSummary,
    },
    Failed {
        kind: ActionKind,
        failure: ActionFailure,
    },
}

impl ActionState {
    /// Wallet prompt open or transaction in flight
    pub fn is_busy(&self) -> bool {
        matches!(self, ActionState::Submitting { .. } | ActionState::Confirming { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ActionState::Succeeded { .. } | ActionState::Failed { .. })
    }

    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            ActionState::Idle => None,
            ActionState::Submitting { kind }
            | ActionState::Confirming { kind, .. }
            | ActionState::Succeeded { kind, .. }
            | ActionState::Failed { kind, .. } => Some(*kind),
        }
    }

    /// Button label while an action is busy
    pub fn progress_label(&self) -> Option<&'static str> {
        match self {
            ActionState::Submitting { .. } => Some("Confirm in wallet..."),
            ActionState::Confirming { .. } => Some("Confirming..."),
            _ => None,
        }
    }
}
