//! User records as persisted by the credential store.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user. `password_hash` is never the plaintext and never empty.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A record about to be saved; the store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
}

impl NewUser {
    pub fn into_record(self) -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            email: self.email,
            display_name: self.display_name,
            password_hash: self.password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Email + plaintext password, alive only for the duration of a request.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_record_assigns_fresh_ids() {
        let new = NewUser {
            email: "a@x.com".to_string(),
            display_name: "Ana".to_string(),
            password_hash: "$argon2id$stub".to_string(),
        };
        let a = new.clone().into_record();
        let b = new.into_record();
        assert_ne!(a.id, b.id);
        assert_eq!(a.email, "a@x.com");
    }

    #[test]
    fn credentials_debug_redacts_password() {
        let c = Credentials {
            email: "a@x.com".to_string(),
            password: "secret123".to_string(),
        };
        let out = format!("{:?}", c);
        assert!(out.contains("a@x.com"));
        assert!(!out.contains("secret123"));
    }
}
