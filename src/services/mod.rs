//! Business logic: the authentication orchestrator.

pub mod auth;

pub use auth::AuthService;
