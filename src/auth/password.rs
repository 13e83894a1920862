//! Argon2id password hashing (salted, PHC string format).

use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Argon2,
};

use crate::error::HashError;

/// One-way salted hashing and constant-time verification.
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash with a fresh random salt; the same input never yields the same output twice.
    pub fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| HashError::Hashing(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    /// Verify against a stored hash, using the salt and params embedded in it.
    ///
    /// Returns `Ok(false)` on mismatch; `Err(HashError::Corrupt)` only if the
    /// stored hash cannot be parsed or used.
    pub fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, HashError> {
        let parsed = PasswordHash::new(hash).map_err(|e| HashError::Corrupt(e.to_string()))?;
        match self.argon2.verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(HashError::Corrupt(e.to_string())),
        }
    }
}
