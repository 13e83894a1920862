//! Error types: one enum per layer, plus the HTTP-facing `AppError`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Credential store failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("backing store unavailable: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                return StorageError::DuplicateEmail;
            }
            if db.is_check_violation() {
                return StorageError::Constraint(db.message().to_string());
            }
        }
        StorageError::Backend(e.to_string())
    }
}

/// Password hashing failures. A mismatch is not an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    /// The stored hash cannot be parsed. Should never happen for records we wrote.
    #[error("corrupt password hash: {0}")]
    Corrupt(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Why a token was rejected (or could not be issued).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("token signature mismatch")]
    SignatureMismatch,

    #[error("token expired")]
    Expired,

    #[error("token issuance failed: {0}")]
    Issue(String),
}

#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error(transparent)]
    Storage(StorageError),

    #[error(transparent)]
    Hashing(#[from] HashError),
}

impl From<StorageError> for RegistrationError {
    fn from(e: StorageError) -> Self {
        match e {
            // Lost a race with a concurrent registration: same outcome as the pre-check.
            StorageError::DuplicateEmail => RegistrationError::DuplicateEmail,
            other => RegistrationError::Storage(other),
        }
    }
}

#[derive(Error, Debug)]
pub enum AuthenticationError {
    /// Unknown email and wrong password both land here.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    CorruptHash(HashError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Errors returned by HTTP handlers. Internal details are logged, never sent.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<RegistrationError> for AppError {
    fn from(e: RegistrationError) -> Self {
        match e {
            RegistrationError::DuplicateEmail => {
                AppError::Conflict("Email already registered".to_string())
            }
            other => AppError::Internal(anyhow::anyhow!("register: {}", other)),
        }
    }
}

impl From<AuthenticationError> for AppError {
    fn from(e: AuthenticationError) -> Self {
        match e {
            AuthenticationError::InvalidCredentials => {
                AppError::Unauthorized("Invalid credentials".to_string())
            }
            other => AppError::Internal(anyhow::anyhow!("login: {}", other)),
        }
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Internal(anyhow::anyhow!("storage: {}", e))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Internal(e) => {
                error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_duplicate_becomes_registration_duplicate() {
        let e: RegistrationError = StorageError::DuplicateEmail.into();
        assert!(matches!(e, RegistrationError::DuplicateEmail));

        let e: RegistrationError = StorageError::Backend("down".to_string()).into();
        assert!(matches!(e, RegistrationError::Storage(_)));
    }

    #[test]
    fn internal_errors_do_not_leak_detail() {
        let e: AppError =
            AuthenticationError::Storage(StorageError::Backend("pg: secret host".into())).into();
        let res = e.into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_credentials_maps_to_401() {
        let e: AppError = AuthenticationError::InvalidCredentials.into();
        assert_eq!(e.into_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn duplicate_maps_to_409() {
        let e: AppError = RegistrationError::DuplicateEmail.into();
        assert_eq!(e.into_response().status(), StatusCode::CONFLICT);
    }
}
