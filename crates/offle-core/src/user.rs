use crate::{OffleError, OffleResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse account role. Used for UI gating only; the backend enforces
/// authorization on its side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full access, including user administration.
    Admin,
    /// May create and edit personas.
    Builder,
    /// Regular account.
    User,
}

impl Role {
    /// All roles, in the order an admin picker lists them.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Builder, Role::User];

    /// The wire / storage spelling of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Builder => "builder",
            Role::User => "user",
        }
    }

    /// Returns true for [`Role::Admin`].
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = OffleError;

    fn from_str(s: &str) -> OffleResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "builder" => Ok(Role::Builder),
            "user" => Ok(Role::User),
            other => Err(OffleError::InvalidInput(format!("unknown role '{other}'"))),
        }
    }
}

/// Login or registration credentials.
#[derive(Clone, Serialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Plain-text password, sent only over the request body.
    pub password: String,
}

impl Credentials {
    /// Creates a credential pair.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Both fields are required. A whitespace-only email counts as empty;
    /// the password is taken exactly as typed.
    pub fn validate(&self) -> OffleResult<()> {
        if self.email.trim().is_empty() {
            return Err(OffleError::InvalidInput("email is required".to_string()));
        }
        if self.password.is_empty() {
            return Err(OffleError::InvalidInput("password is required".to_string()));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// One row of the admin user listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
}

/// The signed-in account, as returned by `GET /users/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub username: String,
    #[serde(default)]
    pub personas: Vec<String>,
}
