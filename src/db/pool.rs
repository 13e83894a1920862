//! PostgreSQL connection pool and schema bootstrap.

use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tracing::info;

pub type DbPool = sqlx::PgPool;

const USERS_SCHEMA: &str = include_str!("../../migrations/0001_create_users.sql");

/// Connect to Postgres; the store is request-parallel so the pool is sized by config.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;
    info!(max_connections, "connected to postgres");
    Ok(pool)
}

/// Create the `users` table if missing. Idempotent.
pub async fn ensure_schema(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(USERS_SCHEMA).execute(pool).await?;
    Ok(())
}
