use std::fmt;
use tokio::sync::watch;
use tracing::debug;

/// Every screen the client can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// The entry page (`/`).
    Login,
    Register,
    Personas,
    Chat,
    Admin,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Register => "/register",
            Route::Personas => "/personas",
            Route::Chat => "/chat",
            Route::Admin => "/admin",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        match path.trim_end_matches('/') {
            "" | "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            "/personas" => Some(Route::Personas),
            "/chat" => Some(Route::Chat),
            "/admin" => Some(Route::Admin),
            _ => None,
        }
    }

    /// Routes behind the auth gate.
    pub fn is_protected(self) -> bool {
        matches!(self, Route::Personas | Route::Chat | Route::Admin)
    }

    /// Routes that additionally need an admin role.
    pub fn requires_admin(self) -> bool {
        self == Route::Admin
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Holds the current route and publishes every navigation to subscribers.
pub struct Navigator {
    tx: watch::Sender<Route>,
}

impl Navigator {
    pub fn new(initial: Route) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Replaces the current route. Subscribers are woken even when the route
    /// does not change, so a forced redirect is always observable.
    pub fn navigate(&self, route: Route) {
        let from = self.tx.send_replace(route);
        debug!(from = %from, to = %route, "navigate");
    }

    pub fn current(&self) -> Route {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.tx.subscribe()
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Login)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths_roundtrip() {
        for route in [
            Route::Login,
            Route::Register,
            Route::Personas,
            Route::Chat,
            Route::Admin,
        ] {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/personas/"), Some(Route::Personas));
        assert_eq!(Route::from_path("/nope"), None);
    }

    #[test]
    fn test_protected_routes() {
        assert!(!Route::Login.is_protected());
        assert!(!Route::Register.is_protected());
        assert!(Route::Chat.is_protected());
        assert!(Route::Admin.requires_admin());
        assert!(!Route::Personas.requires_admin());
    }

    #[tokio::test]
    async fn test_navigate_notifies_subscribers() {
        let nav = Navigator::default();
        let mut rx = nav.subscribe();
        nav.navigate(Route::Chat);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Route::Chat);
        assert_eq!(nav.current(), Route::Chat);
    }
}
