//! PostgreSQL user store. Uniqueness is enforced by the `users.email` constraint.

use async_trait::async_trait;

use super::{check_new_user, UserStore};
use crate::db::DbPool;
use crate::error::StorageError;
use crate::models::{NewUser, UserRecord};

#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        let row = sqlx::query_as::<_, UserRecord>(
            "SELECT id, email, display_name, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn save(&self, user: NewUser) -> Result<UserRecord, StorageError> {
        check_new_user(&user)?;
        let record = user.into_record();
        let row = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, email, display_name, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, display_name, password_hash, created_at
            "#,
        )
        .bind(record.id)
        .bind(&record.email)
        .bind(&record.display_name)
        .bind(&record.password_hash)
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }
}
