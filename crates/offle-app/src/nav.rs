use offle_core::OffleResult;
use offle_session::{Route, SessionState, SessionStore};
use std::sync::Arc;
use tokio::sync::watch;

/// Title shown at the start of the navigation bar.
pub const APP_TITLE: &str = "Offle Assistant";

/// One entry in the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavLink {
    Admin,
    Personas,
    Chat,
    Logout,
}

impl NavLink {
    pub fn label(self) -> &'static str {
        match self {
            NavLink::Admin => "Admin",
            NavLink::Personas => "Personas",
            NavLink::Chat => "Chat",
            NavLink::Logout => "Logout",
        }
    }

    /// The route a link leads to. `Logout` ends on the entry page.
    pub fn route(self) -> Route {
        match self {
            NavLink::Admin => Route::Admin,
            NavLink::Personas => Route::Personas,
            NavLink::Chat => Route::Chat,
            NavLink::Logout => Route::Login,
        }
    }
}

/// Navigation bar. Follows the session so a login or logout anywhere is
/// reflected the next time it renders.
pub struct NavShell {
    session: Arc<SessionStore>,
    rx: watch::Receiver<SessionState>,
}

impl NavShell {
    pub fn new(session: Arc<SessionStore>) -> Self {
        let rx = session.subscribe();
        Self { session, rx }
    }

    /// Links for `state`. The admin link only appears for admins.
    pub fn links(state: &SessionState) -> Vec<NavLink> {
        let mut links = Vec::with_capacity(4);
        if state.is_admin() {
            links.push(NavLink::Admin);
        }
        links.extend([NavLink::Personas, NavLink::Chat, NavLink::Logout]);
        links
    }

    pub fn current_links(&self) -> Vec<NavLink> {
        Self::links(&self.rx.borrow())
    }

    /// Waits for the next session change and returns the new links.
    /// Returns `None` once the session store is gone.
    pub async fn changed(&mut self) -> Option<Vec<NavLink>> {
        self.rx.changed().await.ok()?;
        Some(Self::links(&self.rx.borrow_and_update()))
    }

    pub async fn activate(&self, link: NavLink) -> OffleResult<()> {
        match link {
            NavLink::Logout => self.session.logout().await,
            other => {
                self.session.navigator().navigate(other.route());
                Ok(())
            }
        }
    }

    /// One-line text rendering, with the current route's link in brackets.
    pub fn render(&self) -> String {
        let current = self.session.navigator().current();
        let mut line = String::from(APP_TITLE);
        for link in self.current_links() {
            line.push_str("  ");
            if link != NavLink::Logout && link.route() == current {
                line.push_str(&format!("[{}]", link.label()));
            } else {
                line.push_str(link.label());
            }
        }
        line
    }
}
