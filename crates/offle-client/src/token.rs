use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use offle_core::{OffleError, OffleResult, Role};
use serde::Deserialize;

/// Claims the client reads from an access token's payload.
///
/// The signature is never checked here; the claims only drive UI gating.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// The role claim, if present and recognised.
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }
}

/// Decodes the payload segment of a JWT.
pub fn decode_claims(token: &str) -> OffleResult<TokenClaims> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(OffleError::decode("access token", "not a JWT"));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| OffleError::decode("access token", e))?;
    serde_json::from_slice(&bytes).map_err(|e| OffleError::decode("access token", e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn jwt(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload)
        )
    }

    #[test]
    fn test_decode_role_claim() {
        let token = jwt(r#"{"user_id":"u1","role":"admin","exp":1735689600}"#);
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.user_id.as_deref(), Some("u1"));
        assert_eq!(claims.role(), Some(Role::Admin));
        assert_eq!(claims.expires_at().unwrap().timestamp(), 1_735_689_600);
    }

    #[test]
    fn test_missing_role_claim() {
        let claims = decode_claims(&jwt(r#"{"user_id":"u1"}"#)).unwrap();
        assert_eq!(claims.role(), None);
    }

    #[test]
    fn test_opaque_token_is_not_a_jwt() {
        assert!(decode_claims("T").is_err());
        assert!(decode_claims("a.b").is_err());
        assert!(decode_claims("a.b.c.d").is_err());
        assert!(decode_claims("a.!!!.c").is_err());
    }
}
