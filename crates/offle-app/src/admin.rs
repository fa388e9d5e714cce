use offle_client::ApiClient;
use offle_core::{OffleResult, Role, UserRecord};
use std::sync::Arc;
use tracing::warn;

/// "Manage Users" page. Local rows are patched only after the server
/// confirms a change.
pub struct AdminUsersView {
    client: Arc<ApiClient>,
    users: Vec<UserRecord>,
    loading: bool,
}

impl AdminUsersView {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            users: Vec::new(),
            loading: true,
        }
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub async fn refresh(&mut self) -> OffleResult<()> {
        let result = self.client.admin_users().await;
        self.loading = false;
        match result {
            Ok(users) => {
                self.users = users;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch users");
                Err(e)
            }
        }
    }

    pub async fn change_role(&mut self, user_id: &str, role: Role) -> OffleResult<String> {
        let message = self
            .client
            .set_user_role(user_id, role)
            .await
            .map_err(|e| {
                warn!(user_id, error = %e, "Failed to update role");
                e
            })?;
        if let Some(user) = self.users.iter_mut().find(|u| u.id == user_id) {
            user.role = role;
        }
        Ok(message)
    }

    pub async fn delete(&mut self, user_id: &str) -> OffleResult<String> {
        let message = self.client.delete_user(user_id).await.map_err(|e| {
            warn!(user_id, error = %e, "Failed to delete user");
            e
        })?;
        self.users.retain(|u| u.id != user_id);
        Ok(message)
    }
}
