pub mod cookies;
pub mod session;

pub use session::{AdminClaims, AdminSession, IssuedSession, SessionManager};
