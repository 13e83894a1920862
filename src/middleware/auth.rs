//! Auth extractor: authenticated session from the `Authorization` header.

use axum::http::header::AUTHORIZATION;
use tracing::debug;

use crate::error::AppError;
use crate::handlers::http::AppState;

/// Identity of a request whose bearer token validated.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub subject: String,
}

#[axum::async_trait]
impl axum::extract::FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Unauthorized("Missing or invalid Authorization header".to_string())
            })?;

        let result = state.auth().validate_session(header);
        match (result.valid, result.subject) {
            (true, Some(subject)) => Ok(AuthUser { subject }),
            _ => {
                debug!("rejected request: invalid session token");
                Err(AppError::Unauthorized("Invalid or expired token".to_string()))
            }
        }
    }
}
