//! Data models: user records, credentials, and session tokens.

pub mod session;
pub mod user;

pub use session::*;
pub use user::*;
