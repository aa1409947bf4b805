//! Account store: connected Gmail accounts and their tokens.
//!
//! `AccountStore` is the injected seam; `MemoryAccountStore` is the
//! shipped backend.

pub mod account;
pub mod memory;
pub mod refresh;
pub mod traits;

pub use account::{AccountSummary, ConnectedAccount};
pub use memory::MemoryAccountStore;
pub use refresh::{ensure_fresh_token, FreshToken};
pub use traits::AccountStore;
