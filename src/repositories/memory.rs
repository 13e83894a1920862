//! In-process user store for single-node deployments and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{check_new_user, UserStore};
use crate::error::StorageError;
use crate::models::{NewUser, UserRecord};

/// Users held in a `HashMap` behind a Tokio `RwLock`.
#[derive(Debug, Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn save(&self, user: NewUser) -> Result<UserRecord, StorageError> {
        check_new_user(&user)?;

        // Check and insert under one write guard.
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(StorageError::DuplicateEmail);
        }
        let record = user.into_record();
        users.insert(record.email.clone(), record.clone());
        debug!(user_id = %record.id, "user saved");
        Ok(record)
    }
}
