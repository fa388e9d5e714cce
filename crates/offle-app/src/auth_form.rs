use offle_client::{decode_claims, ApiClient};
use offle_core::{Credentials, OffleResult, Role};
use offle_session::{Route, SessionState};
use std::sync::Arc;
use tracing::{debug, warn};

/// Which endpoint the form submits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    pub fn title(self) -> &'static str {
        match self {
            AuthMode::Login => "Assistant Login",
            AuthMode::Register => "Assistant Register",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Register => "Register",
        }
    }

    /// The other form, linked from under the submit button.
    pub fn alternate(self) -> Route {
        match self {
            AuthMode::Login => Route::Register,
            AuthMode::Register => Route::Login,
        }
    }
}

/// Email/password form shared by the login and register pages.
pub struct AuthForm {
    mode: AuthMode,
    client: Arc<ApiClient>,
    pub email: String,
    pub password: String,
}

impl AuthForm {
    pub fn new(mode: AuthMode, client: Arc<ApiClient>) -> Self {
        Self {
            mode,
            client,
            email: String::new(),
            password: String::new(),
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Submits the form. On success the session holds the new token (and
    /// role, when one could be determined) and the app is on the personas
    /// page. On failure nothing in the session changes.
    pub async fn submit(&mut self) -> OffleResult<SessionState> {
        let credentials = Credentials::new(self.email.trim(), self.password.clone());
        credentials.validate()?;

        match self.authenticate(&credentials).await {
            Ok(state) => {
                self.password.clear();
                Ok(state)
            }
            Err(e) => {
                warn!(mode = ?self.mode, error = %e, "Authentication failed");
                Err(e)
            }
        }
    }

    async fn authenticate(&self, credentials: &Credentials) -> OffleResult<SessionState> {
        let (token, response_role) = match self.mode {
            AuthMode::Login => {
                let res = self.client.login(credentials).await?;
                (res.access_token, res.role)
            }
            AuthMode::Register => {
                let res = self.client.register(credentials).await?;
                match res.access_token {
                    Some(token) => (token, res.role),
                    None => {
                        debug!("Registration returned no token; logging in");
                        let res = self.client.login(credentials).await?;
                        (res.access_token, res.role)
                    }
                }
            }
        };

        let role = resolve_role(&token, response_role.as_deref());
        let session = self.client.session();
        session.set_token(token).await?;
        match role {
            Some(role) => session.set_role(role).await?,
            None => session.clear_role().await?,
        }
        session.navigator().navigate(Route::Personas);
        Ok(session.snapshot())
    }
}

/// The role claim embedded in the token wins; a role returned beside the
/// token is the fallback for opaque tokens.
fn resolve_role(token: &str, response_role: Option<&str>) -> Option<Role> {
    decode_claims(token)
        .ok()
        .and_then(|claims| claims.role())
        .or_else(|| response_role.and_then(|r| r.parse().ok()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_role_falls_back_to_response_field() {
        assert_eq!(resolve_role("T", Some("admin")), Some(Role::Admin));
        assert_eq!(resolve_role("T", Some("wizard")), None);
        assert_eq!(resolve_role("T", None), None);
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(AuthMode::Login.submit_label(), "Login");
        assert_eq!(AuthMode::Register.alternate(), Route::Login);
        assert_eq!(AuthMode::Login.alternate(), Route::Register);
    }
}
