//! Shared application state and the health probe.

use axum::{http::StatusCode, Json};
use serde_json::json;

use crate::services::AuthService;

/// Shared application state for HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    auth: AuthService,
}

impl AppState {
    pub fn new(auth: AuthService) -> Self {
        Self { auth }
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }
}

/// GET /health — liveness probe.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "authgate" })),
    )
}
