//! Credential store: user records keyed by email.

mod memory;
mod postgres;

pub use memory::MemoryUserStore;
pub use postgres::PgUserStore;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::{NewUser, UserRecord};

/// Persistence contract used by the auth service.
///
/// Implementations must make `save` atomic with respect to email uniqueness:
/// two concurrent saves of the same email never both succeed.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by exact (case-sensitive) email. Absence is `Ok(None)`.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError>;

    /// Persist a new user, assigning its id.
    async fn save(&self, user: NewUser) -> Result<UserRecord, StorageError>;
}

fn check_new_user(user: &NewUser) -> Result<(), StorageError> {
    if user.password_hash.is_empty() {
        return Err(StorageError::Constraint(
            "password_hash must not be empty".to_string(),
        ));
    }
    Ok(())
}
