//! Connected-account lifecycle: connect, status, sync and revoke.

pub mod flow;
pub mod revoke;
pub mod sync;

pub use flow::{authorization_url, complete_authorization, connection_status, ConnectedUser};
pub use revoke::{revoke_account, RevokeOutcome, REVOKE_WARNING};
pub use sync::{sync_account, SyncReport};
