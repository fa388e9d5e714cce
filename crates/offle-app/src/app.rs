use crate::admin::AdminUsersView;
use crate::auth_form::{AuthForm, AuthMode};
use crate::chat::ChatView;
use crate::nav::NavShell;
use crate::personas::PersonaView;
use offle_client::{ApiClient, ClientConfig};
use offle_core::OffleResult;
use offle_session::{
    AuthGate, FileStorage, GateOutcome, Navigator, Route, SessionStorage, SessionStore,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Wires the session store, navigator and API client together and hands
/// out the views that share them.
pub struct App {
    config: ClientConfig,
    session: Arc<SessionStore>,
    client: Arc<ApiClient>,
}

impl App {
    /// Opens the app with the session persisted under the configured data
    /// directory.
    pub async fn open(config: ClientConfig) -> OffleResult<Self> {
        let storage = FileStorage::open(config.session_file()).await?;
        Self::with_storage(config, storage).await
    }

    pub async fn with_storage(
        config: ClientConfig,
        storage: impl SessionStorage + 'static,
    ) -> OffleResult<Self> {
        let navigator = Arc::new(Navigator::default());
        let session = Arc::new(SessionStore::open(storage, navigator).await?);
        let client = Arc::new(ApiClient::new(&config, Arc::clone(&session))?);
        info!(base_url = %client.base_url(), "Offle client ready");
        Ok(Self {
            config,
            session,
            client,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn navigator(&self) -> &Arc<Navigator> {
        self.session.navigator()
    }

    /// Navigates to `route` and returns where the app actually ended up.
    ///
    /// Protected routes pass through a fresh [`AuthGate`]; the admin page
    /// also needs an admin role and falls back to the personas page.
    pub fn open_route(&self, route: Route) -> Route {
        self.navigator().navigate(route);
        if !route.is_protected() {
            return route;
        }

        let mut gate = AuthGate::new();
        if let GateOutcome::Redirect(to) = gate.mount(&self.session) {
            return to;
        }

        if route.requires_admin() && !self.session.snapshot().is_admin() {
            debug!(route = %route, "Admin route refused");
            self.navigator().navigate(Route::Personas);
            return Route::Personas;
        }
        route
    }

    pub fn auth_form(&self, mode: AuthMode) -> AuthForm {
        AuthForm::new(mode, Arc::clone(&self.client))
    }

    pub fn persona_view(&self) -> PersonaView {
        PersonaView::new(Arc::clone(&self.client))
    }

    pub fn chat_view(&self) -> ChatView {
        ChatView::new(Arc::clone(&self.client))
    }

    pub fn admin_view(&self) -> AdminUsersView {
        AdminUsersView::new(Arc::clone(&self.client))
    }

    pub fn nav_shell(&self) -> NavShell {
        NavShell::new(Arc::clone(&self.session))
    }
}
