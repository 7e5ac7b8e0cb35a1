//! Explicit session context for the logged-in user.
//!
//! One `SessionContext` is created per portal and shared through `Arc`.
//! It starts empty, is filled by a successful login (`begin`) and emptied by
//! logout or any 401 reply (`clear`).

use tokio::sync::RwLock;
use tracing::info;

use crate::types::{Role, UserInfo};

#[derive(Debug, Default)]
pub struct SessionContext {
    user: RwLock<Option<UserInfo>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn begin(&self, user: UserInfo) {
        info!(user_id = %user.user_id, role = ?user.role, "session started");
        *self.user.write().await = Some(user);
    }

    pub async fn clear(&self) {
        if let Some(user) = self.user.write().await.take() {
            info!(user_id = %user.user_id, "session cleared");
        }
    }

    pub async fn current(&self) -> Option<UserInfo> {
        self.user.read().await.clone()
    }

    pub async fn role(&self) -> Option<Role> {
        self.user.read().await.as_ref().map(|user| user.role)
    }

    pub async fn user_id(&self) -> Option<String> {
        self.user.read().await.as_ref().map(|user| user.user_id.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.user.read().await.is_some()
    }
}
