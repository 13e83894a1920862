//! Authentication: password hashing, session tokens, HTTP handlers.

mod handlers;
mod jwt;
mod password;

pub use handlers::{login, profile, register, validate_token};
pub use jwt::{Claims, TokenService};
pub use password::PasswordHasher;
