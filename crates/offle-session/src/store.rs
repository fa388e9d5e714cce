use crate::navigation::{Navigator, Route};
use crate::storage::SessionStorage;
use offle_core::{OffleError, OffleResult, Role};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Storage key holding the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Storage key holding the role string.
pub const ROLE_KEY: &str = "role";

/// In-memory mirror of the persisted session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    token: Option<String>,
    role: Option<Role>,
}

impl SessionState {
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// The role, but only while a token is held.
    pub fn role(&self) -> Option<Role> {
        self.token.as_ref().and(self.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_some_and(Role::is_admin)
    }
}

/// The single piece of process-wide client state.
///
/// Writes go to storage first and are then published to subscribers, so a
/// subscriber never observes state that failed to persist.
pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
    navigator: Arc<Navigator>,
    state: watch::Sender<SessionState>,
}

impl SessionStore {
    /// Restores whatever session a previous run left in `storage`.
    pub async fn open(
        storage: impl SessionStorage + 'static,
        navigator: Arc<Navigator>,
    ) -> OffleResult<Self> {
        let token = storage
            .get(TOKEN_KEY)
            .await?
            .filter(|t| !t.trim().is_empty());
        let role = match storage.get(ROLE_KEY).await? {
            Some(raw) => match raw.parse::<Role>() {
                Ok(role) => Some(role),
                Err(e) => {
                    warn!(error = %e, "Ignoring unrecognised stored role");
                    None
                }
            },
            None => None,
        };

        if token.is_some() {
            info!(role = ?role, "Restored session");
        }

        let (state, _rx) = watch::channel(SessionState { token, role });
        Ok(Self {
            storage: Box::new(storage),
            navigator,
            state,
        })
    }

    pub async fn set_token(&self, token: impl Into<String>) -> OffleResult<()> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(OffleError::Session("refusing to store an empty token".to_string()));
        }
        self.storage.set(TOKEN_KEY, &token).await?;
        self.state.send_modify(|s| s.token = Some(token));
        Ok(())
    }

    pub async fn set_role(&self, role: Role) -> OffleResult<()> {
        self.storage.set(ROLE_KEY, role.as_str()).await?;
        self.state.send_modify(|s| s.role = Some(role));
        Ok(())
    }

    /// Drops a stored role, e.g. when a new login carries none.
    pub async fn clear_role(&self) -> OffleResult<()> {
        self.storage.remove(ROLE_KEY).await?;
        self.state.send_modify(|s| s.role = None);
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.state.borrow().role()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receives every session change; used by the nav shell to re-render.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn navigator(&self) -> &Arc<Navigator> {
        &self.navigator
    }

    /// Clears token and role and returns to the entry page.
    ///
    /// In-memory state is reset and navigation happens even if storage
    /// fails; the storage error is still returned.
    pub async fn logout(&self) -> OffleResult<()> {
        let token_removed = self.storage.remove(TOKEN_KEY).await;
        let role_removed = self.storage.remove(ROLE_KEY).await;
        self.state.send_replace(SessionState::default());
        self.navigator.navigate(Route::Login);
        info!("Logged out");
        token_removed.and(role_removed)
    }

    /// Called when the backend rejects the token.
    pub async fn expire(&self) -> OffleResult<()> {
        warn!("Backend rejected the session token; logging out");
        self.logout().await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    async fn store_with(storage: MemoryStorage) -> SessionStore {
        SessionStore::open(storage, Arc::new(Navigator::default()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_role_without_token_is_ignored() {
        let storage = MemoryStorage::new().with_entry(ROLE_KEY, "admin").await;
        let store = store_with(storage).await;
        assert_eq!(store.role(), None);
        assert!(!store.snapshot().is_admin());
    }

    #[tokio::test]
    async fn test_unknown_stored_role_is_dropped() {
        let storage = MemoryStorage::new()
            .with_entry(TOKEN_KEY, "T")
            .await
            .with_entry(ROLE_KEY, "superuser")
            .await;
        let store = store_with(storage).await;
        assert_eq!(store.token().as_deref(), Some("T"));
        assert_eq!(store.role(), None);
    }

    #[tokio::test]
    async fn test_empty_token_rejected() {
        let store = store_with(MemoryStorage::new()).await;
        assert!(store.set_token("  ").await.is_err());
        assert!(store.token().is_none());
    }

    #[tokio::test]
    async fn test_subscribers_see_writes() {
        let store = store_with(MemoryStorage::new()).await;
        let mut rx = store.subscribe();

        store.set_token("T").await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_authenticated());

        store.set_role(Role::Admin).await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_admin());
    }
}
