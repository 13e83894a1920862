//! Entry point: load config, wire dependencies, and run the server.

use anyhow::Context;
use authgate::auth::{PasswordHasher, TokenService};
use authgate::config::Config;
use authgate::db;
use authgate::repositories::{MemoryUserStore, PgUserStore, UserStore};
use authgate::services::AuthService;
use authgate::{create_app, AppState};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("loading config")?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store: Arc<dyn UserStore> = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url, config.db_max_connections).await?;
            db::ensure_schema(&pool).await?;
            Arc::new(PgUserStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; users are kept in memory");
            Arc::new(MemoryUserStore::new())
        }
    };

    let tokens = TokenService::new(config.jwt_secret.as_bytes(), config.token_ttl);
    let auth = AuthService::new(store, PasswordHasher::new(), tokens);

    let mut app = create_app(AppState::new(auth));
    if let Some(origin) = &config.cors_origin {
        app = app.layer(
            CorsLayer::new()
                .allow_origin(origin.parse::<axum::http::HeaderValue>()?)
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                ]),
        );
    }

    tracing::info!(addr = %config.server_addr, ttl = ?config.token_ttl, "listening");
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
