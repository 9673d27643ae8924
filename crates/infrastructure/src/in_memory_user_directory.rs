use std::collections::HashMap;

use async_trait::async_trait;
use partnerdesk_application::{DirectoryUser, UserDirectory};
use partnerdesk_core::{AppError, AppResult};
use tokio::sync::RwLock;

/// In-memory directory of portal accounts keyed by canonical email.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, DirectoryUser>>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<DirectoryUser>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn save_user(&self, user: DirectoryUser) -> AppResult<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.email) {
            return Err(AppError::Conflict(format!(
                "a user with email '{}' already exists",
                user.email
            )));
        }

        tracing::debug!(user_id = %user.user_id, role = %user.role, "directory user stored");
        users.insert(user.email.clone(), user);
        Ok(())
    }
}
