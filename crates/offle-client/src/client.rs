use crate::config::ClientConfig;
use crate::decode::{decode, error_detail};
use offle_core::{OffleError, OffleResult};
use offle_session::SessionStore;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Thin wrapper around `reqwest` for the Offle backend.
///
/// Attaches `Authorization: Bearer <token>` whenever the session holds a
/// token. A 401 from any endpoint expires the session before the error is
/// returned. No retries, no timeouts beyond the transport defaults.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> OffleResult<Self> {
        let base_url = config.parsed_base_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .cookie_store(config.with_credentials)
            .build()
            .map_err(|e| OffleError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Issues `method path` with an optional JSON body and returns the
    /// parsed JSON response (`Value::Null` for an empty body).
    pub async fn request(&self, method: Method, path: &str, body: Option<Value>) -> OffleResult<Value> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        self.send(method, &segments, body).await
    }

    /// Like [`Self::request`], decoding the response into `T`.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        context: &str,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> OffleResult<T> {
        let value = self.request(method, path, body).await?;
        decode(context, value)
    }

    /// Builds an endpoint URL under the base URL. Each segment is
    /// percent-encoded, so opaque ids cannot alter the path.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> OffleResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                OffleError::Config(format!("base_url '{}' cannot carry a path", self.base_url))
            })?;
            path.pop_if_empty();
            path.extend(segments);
        }
        Ok(url)
    }

    pub(crate) async fn send(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> OffleResult<Value> {
        let url = self.endpoint(segments)?;
        debug!(method = %method, path = url.path(), "API request");

        let mut request = self.http.request(method.clone(), url.clone());
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| OffleError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| OffleError::Transport(e.to_string()))?;

        if status == StatusCode::UNAUTHORIZED {
            let detail = error_detail(&text);
            warn!(method = %method, path = url.path(), detail = %detail, "Unauthorized");
            // A 401 from the credential endpoints means bad credentials, not
            // a revoked session.
            if !is_credential_endpoint(segments) {
                if let Err(e) = self.session.expire().await {
                    warn!(error = %e, "Failed to clear session after 401");
                }
            }
            return Err(OffleError::Unauthorized(detail));
        }

        if !status.is_success() {
            let detail = error_detail(&text);
            warn!(method = %method, path = url.path(), status = status.as_u16(), detail = %detail, "API error");
            return Err(OffleError::Api {
                status: status.as_u16(),
                detail,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| OffleError::decode(url.path(), e))
    }
}

fn is_credential_endpoint(segments: &[&str]) -> bool {
    matches!(segments, ["auth", "login" | "register"])
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use offle_session::{MemoryStorage, Navigator};

    async fn client_for(base_url: &str) -> ApiClient {
        let session = SessionStore::open(MemoryStorage::new(), Arc::new(Navigator::default()))
            .await
            .unwrap();
        let config = ClientConfig {
            base_url: base_url.to_string(),
            ..ClientConfig::default()
        };
        ApiClient::new(&config, Arc::new(session)).unwrap()
    }

    #[tokio::test]
    async fn test_endpoint_joins_under_root() {
        let client = client_for("http://localhost:8000").await;
        let url = client.endpoint(&["personas", "owned"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/personas/owned");
    }

    #[tokio::test]
    async fn test_endpoint_keeps_base_prefix() {
        let client = client_for("https://host/api/").await;
        let url = client.endpoint(&["auth", "login"]).unwrap();
        assert_eq!(url.as_str(), "https://host/api/auth/login");
    }

    #[test]
    fn test_credential_endpoints() {
        assert!(is_credential_endpoint(&["auth", "login"]));
        assert!(is_credential_endpoint(&["auth", "register"]));
        assert!(!is_credential_endpoint(&["personas", "owned"]));
        assert!(!is_credential_endpoint(&["auth"]));
    }

    #[tokio::test]
    async fn test_endpoint_encodes_segments() {
        let client = client_for("http://localhost:8000").await;
        let url = client.endpoint(&["personas", "a/b c"]).unwrap();
        assert_eq!(url.path(), "/personas/a%2Fb%20c");
    }
}
