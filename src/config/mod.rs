//! Application configuration loaded from environment.

use std::net::SocketAddr;

use chrono::Duration;

/// Minimum signing secret length in bytes.
pub const MIN_JWT_SECRET_LEN: usize = 32;

/// Application configuration loaded from `.env` and environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g. `0.0.0.0:3000`).
    pub server_addr: SocketAddr,
    /// PostgreSQL connection URL. `None` selects the in-memory user store.
    pub database_url: Option<String>,
    /// Postgres pool size.
    pub db_max_connections: u32,
    /// Session token signing secret (min 32 bytes).
    pub jwt_secret: String,
    /// Token lifetime. `None` issues tokens without an `exp` claim.
    pub token_ttl: Option<Duration>,
    /// Allowed CORS origin for a browser frontend, if any.
    pub cors_origin: Option<String>,
    /// Log level: `error`, `warn`, `info`, `debug`, `trace`.
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment. Call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self, ConfigLoadError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_addr: SocketAddr = lookup("SERVER_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse()
            .map_err(|_| ConfigLoadError::InvalidServerAddr)?;

        let database_url = lookup("DATABASE_URL").filter(|s| !s.is_empty());
        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .parse()
                .map_err(|_| ConfigLoadError::InvalidNumber("DB_MAX_CONNECTIONS"))?,
            None => 10,
        };

        let jwt_secret = lookup("JWT_SECRET")
            .unwrap_or_else(|| "authgate_jwt_secret_change_in_production_32chars".to_string());
        if jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigLoadError::WeakJwtSecret);
        }

        let token_ttl = match lookup("TOKEN_TTL_SECS") {
            Some(v) => {
                let secs: i64 = v
                    .parse()
                    .map_err(|_| ConfigLoadError::InvalidNumber("TOKEN_TTL_SECS"))?;
                match secs {
                    0 => None,
                    s if s > 0 => Some(Duration::seconds(s)),
                    _ => return Err(ConfigLoadError::InvalidNumber("TOKEN_TTL_SECS")),
                }
            }
            None => None,
        };

        let cors_origin = lookup("CORS_ORIGIN").filter(|s| !s.is_empty());
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            server_addr,
            database_url,
            db_max_connections,
            jwt_secret,
            token_ttl,
            cors_origin,
            log_level,
        })
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigLoadError {
    #[error("Invalid SERVER_ADDR")]
    InvalidServerAddr,

    #[error("JWT_SECRET must be at least 32 bytes")]
    WeakJwtSecret,

    #[error("Invalid number in {0}")]
    InvalidNumber(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigLoadError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.server_addr.port(), 3000);
        assert!(config.database_url.is_none());
        assert_eq!(config.db_max_connections, 10);
        assert!(config.token_ttl.is_none());
        assert!(config.jwt_secret.len() >= MIN_JWT_SECRET_LEN);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn short_secret_rejected() {
        assert_eq!(
            load(&[("JWT_SECRET", "short")]).unwrap_err(),
            ConfigLoadError::WeakJwtSecret
        );
    }

    #[test]
    fn ttl_parsing() {
        let config = load(&[("TOKEN_TTL_SECS", "3600")]).unwrap();
        assert_eq!(config.token_ttl, Some(Duration::hours(1)));
        assert!(load(&[("TOKEN_TTL_SECS", "0")]).unwrap().token_ttl.is_none());
        assert!(load(&[("TOKEN_TTL_SECS", "-5")]).is_err());
        assert!(load(&[("TOKEN_TTL_SECS", "soon")]).is_err());
    }

    #[test]
    fn bad_server_addr() {
        assert_eq!(
            load(&[("SERVER_ADDR", "nowhere")]).unwrap_err(),
            ConfigLoadError::InvalidServerAddr
        );
    }

    #[test]
    fn empty_database_url_means_memory() {
        assert!(load(&[("DATABASE_URL", "")]).unwrap().database_url.is_none());
    }
}
