//! Auth HTTP handlers: register, login, validate-token, profile.

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::middleware::auth::AuthUser;
use crate::models::{Credentials, UserRecord, ValidationResult};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    /// Seconds until expiry; `null` when tokens do not expire.
    pub expires_in: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<UserRecord> for UserInfo {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.display_name,
            email: user.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    body.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state
        .auth()
        .register(&body.email, &body.name, &body.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered",
            user: user.into(),
        }),
    ))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<Credentials>,
) -> Result<Json<LoginResponse>, AppError> {
    let token = state.auth().login(&body.email, &body.password).await?;

    Ok(Json(LoginResponse {
        token: token.into_string(),
        token_type: "bearer",
        expires_in: state.auth().token_ttl().map(|ttl| ttl.num_seconds()),
    }))
}

/// POST /auth/validate-token — reads `Authorization: Bearer <token>`; never errors.
pub async fn validate_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> (StatusCode, Json<ValidationResult>) {
    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let result = state.auth().validate_session(presented);
    let status = if result.valid {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };
    (status, Json(result))
}

/// GET /auth/profile
pub async fn profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let record = state
        .auth()
        .find_user(&user.subject)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;
    Ok(Json(ProfileResponse {
        id: record.id.to_string(),
        name: record.display_name,
        email: record.email,
        created_at: record.created_at.to_rfc3339(),
    }))
}
