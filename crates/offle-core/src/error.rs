use thiserror::Error;

/// A convenience `Result` alias using [`OffleError`].
pub type OffleResult<T> = Result<T, OffleError>;

/// Top-level error type for the Offle client.
///
/// Every failure is scoped to the user action that triggered it; none of
/// these variants is fatal to the process.
#[derive(Error, Debug)]
pub enum OffleError {
    /// The request never produced an HTTP response (DNS, connect, TLS, body read).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The backend answered with a non-2xx status other than 401.
    #[error("API error {status}: {detail}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The backend's `detail` message, or the raw body when there is none.
        detail: String,
    },

    /// The backend rejected the bearer token (HTTP 401). The session has
    /// already been cleared by the time this is returned.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A response did not match the shape the client expects.
    #[error("Unexpected {context} response: {reason}")]
    Decode {
        /// Which call produced the response.
        context: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Local validation rejected the input before any request was made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Session persistence failed.
    #[error("Session error: {0}")]
    Session(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Config error: {0}")]
    Config(String),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OffleError {
    /// Builds a [`OffleError::Decode`] for the given call context.
    pub fn decode(context: impl Into<String>, reason: impl ToString) -> Self {
        Self::Decode {
            context: context.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true when the backend rejected the session token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// The HTTP status carried by this error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized(_) => Some(401),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = OffleError::Api {
            status: 404,
            detail: "Persona not found".to_string(),
        };
        assert_eq!(err.to_string(), "API error 404: Persona not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_decode_error_display() {
        let err = OffleError::decode("persona list", "missing field `persona_dict`");
        assert_eq!(
            err.to_string(),
            "Unexpected persona list response: missing field `persona_dict`"
        );
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_unauthorized_status() {
        let err = OffleError::Unauthorized("token expired".to_string());
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));
    }
}
