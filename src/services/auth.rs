//! Authentication orchestrator: register, login, validate_session.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, error, info, warn};

use crate::auth::{PasswordHasher, TokenService};
use crate::error::{AuthenticationError, HashError, RegistrationError, StorageError};
use crate::models::{NewUser, SessionToken, UserRecord, ValidationResult};
use crate::repositories::UserStore;

/// Composes the credential store, password hasher and token service.
/// Collaborators are passed in explicitly; nothing is looked up ambiently.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    pub fn token_ttl(&self) -> Option<Duration> {
        self.tokens.ttl()
    }

    pub async fn register(
        &self,
        email: &str,
        display_name: &str,
        password: &str,
    ) -> Result<UserRecord, RegistrationError> {
        if self.store.find_by_email(email).await?.is_some() {
            debug!("registration rejected: email exists");
            return Err(RegistrationError::DuplicateEmail);
        }

        let password_hash = self.hasher.hash(password).inspect_err(|e| {
            error!(error = %e, "password hashing failed");
        })?;

        let user = self
            .store
            .save(NewUser {
                email: email.to_string(),
                display_name: display_name.to_string(),
                password_hash,
            })
            .await
            .inspect_err(|e| {
                if !matches!(e, StorageError::DuplicateEmail) {
                    error!(error = %e, "saving user failed");
                }
            })?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Unknown email and wrong password return the same `InvalidCredentials`.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionToken, AuthenticationError> {
        let user = match self.store.find_by_email(email).await? {
            Some(user) => user,
            None => {
                // Equalize timing with the verify path.
                let _ = self.hasher.hash(password);
                warn!(reason = "unknown email", "login rejected");
                return Err(AuthenticationError::InvalidCredentials);
            }
        };

        let matches = self
            .hasher
            .verify(password, &user.password_hash)
            .map_err(|e: HashError| {
                error!(user_id = %user.id, error = %e, "stored password hash is corrupt");
                AuthenticationError::CorruptHash(e)
            })?;
        if !matches {
            warn!(user_id = %user.id, reason = "password mismatch", "login rejected");
            return Err(AuthenticationError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.email, &user.display_name)?;
        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }

    /// Never fails: every token error becomes `{ valid: false }`.
    pub fn validate_session(&self, presented: &str) -> ValidationResult {
        match self.tokens.validate(presented) {
            Ok(claims) => ValidationResult::valid(claims.sub, claims.name),
            Err(e) => {
                debug!(reason = %e, "token rejected");
                ValidationResult::invalid()
            }
        }
    }

    pub async fn find_user(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        self.store.find_by_email(email).await
    }
}
