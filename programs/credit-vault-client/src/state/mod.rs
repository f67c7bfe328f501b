pub mod pending_action;
pub mod user_position;
pub mod vault_snapshot;
pub mod vault_transaction;

pub use pending_action::*;
pub use user_position::*;
pub use vault_snapshot::*;
pub use vault_transaction::*;
