//! One typed method per backend endpoint.

use crate::client::ApiClient;
use crate::decode::{decode, history_list, persona_list};
use offle_core::{
    Credentials, MessageHistory, OffleResult, Persona, PersonaDraft, PersonaSummary, Role,
    UserProfile, UserRecord,
};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

/// `POST /auth/login` response.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Some backend revisions return the role next to the token.
    #[serde(default)]
    pub role: Option<String>,
}

/// `POST /auth/register` response. Newer backends may log the user in
/// directly and include a token.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// `POST /personas/build` response.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonaCreated {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub persona_id: Option<String>,
}

/// Body of `POST /personas/chat/{persona_id}`. A `null` history id starts a
/// new conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message_history_id: Option<&'a str>,
    pub content: &'a str,
}

/// `POST /personas/chat/{persona_id}` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub message_history_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Ack {
    #[serde(default)]
    message: Option<String>,
}

/// Reads `{"message": ...}` acknowledgements; an empty body is fine too.
fn ack_message(context: &str, value: serde_json::Value, fallback: &str) -> OffleResult<String> {
    let ack: Option<Ack> = decode(context, value)?;
    Ok(ack
        .and_then(|a| a.message)
        .unwrap_or_else(|| fallback.to_string()))
}

impl ApiClient {
    // --- Auth ---

    pub async fn login(&self, credentials: &Credentials) -> OffleResult<TokenResponse> {
        let body = serde_json::to_value(credentials)?;
        let value = self.send(Method::POST, &["auth", "login"], Some(body)).await?;
        let token: TokenResponse = decode("login", value)?;
        info!(email = %credentials.email, "Logged in");
        Ok(token)
    }

    pub async fn register(&self, credentials: &Credentials) -> OffleResult<RegisterResponse> {
        let body = serde_json::to_value(credentials)?;
        let value = self.send(Method::POST, &["auth", "register"], Some(body)).await?;
        let registered: RegisterResponse = decode("register", value)?;
        info!(email = %credentials.email, user_id = ?registered.user_id, "Registered");
        Ok(registered)
    }

    pub async fn me(&self) -> OffleResult<UserProfile> {
        let value = self.send(Method::GET, &["users", "me"], None).await?;
        decode("profile", value)
    }

    // --- Personas ---

    pub async fn owned_personas(&self) -> OffleResult<Vec<PersonaSummary>> {
        let value = self.send(Method::GET, &["personas", "owned"], None).await?;
        persona_list(value)
    }

    pub async fn persona(&self, persona_id: &str) -> OffleResult<Persona> {
        let value = self.send(Method::GET, &["personas", persona_id], None).await?;
        decode("persona", value)
    }

    pub async fn create_persona(&self, draft: &PersonaDraft) -> OffleResult<PersonaCreated> {
        let body = serde_json::to_value(draft)?;
        let value = self
            .send(Method::POST, &["personas", "build"], Some(body))
            .await?;
        let created: PersonaCreated = decode("persona create", value)?;
        info!(name = %draft.name, persona_id = ?created.persona_id, "Persona created");
        Ok(created)
    }

    pub async fn update_persona(&self, persona_id: &str, draft: &PersonaDraft) -> OffleResult<String> {
        let body = serde_json::to_value(draft)?;
        let value = self
            .send(Method::PUT, &["personas", "build", persona_id], Some(body))
            .await?;
        let message = ack_message("persona update", value, "Persona updated")?;
        info!(persona_id, "Persona updated");
        Ok(message)
    }

    // --- Chat ---

    /// All conversations the signed-in user has with a persona.
    pub async fn persona_histories(&self, persona_id: &str) -> OffleResult<Vec<MessageHistory>> {
        let value = self
            .send(Method::GET, &["personas", "message-history", persona_id], None)
            .await?;
        history_list(value)
    }

    pub async fn message_history(&self, history_id: &str) -> OffleResult<MessageHistory> {
        let value = self
            .send(Method::GET, &["message-history", history_id], None)
            .await?;
        decode("message history", value)
    }

    pub async fn chat(
        &self,
        persona_id: &str,
        message_history_id: Option<&str>,
        content: &str,
    ) -> OffleResult<ChatReply> {
        let body = serde_json::to_value(ChatRequest {
            message_history_id,
            content,
        })?;
        let value = self
            .send(Method::POST, &["personas", "chat", persona_id], Some(body))
            .await?;
        decode("chat", value)
    }

    // --- Admin ---

    pub async fn admin_users(&self) -> OffleResult<Vec<UserRecord>> {
        let value = self.send(Method::GET, &["admin", "users"], None).await?;
        decode("user list", value)
    }

    pub async fn set_user_role(&self, user_id: &str, role: Role) -> OffleResult<String> {
        let value = self
            .send(
                Method::PUT,
                &["admin", "users", user_id, "role"],
                Some(json!({ "new_role": role })),
            )
            .await?;
        let message = ack_message("role update", value, "Role updated")?;
        info!(user_id, role = %role, "User role updated");
        Ok(message)
    }

    pub async fn delete_user(&self, user_id: &str) -> OffleResult<String> {
        let value = self
            .send(Method::DELETE, &["admin", "users", user_id, "delete"], None)
            .await?;
        let message = ack_message("user delete", value, "User deleted")?;
        info!(user_id, "User deleted");
        Ok(message)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_sends_null_history_for_new_conversation() {
        let body = serde_json::to_value(ChatRequest {
            message_history_id: None,
            content: "hi",
        })
        .unwrap();
        assert_eq!(body, json!({"message_history_id": null, "content": "hi"}));
    }

    #[test]
    fn test_ack_message() {
        let msg = ack_message("t", json!({"message": "User deleted successfully"}), "x").unwrap();
        assert_eq!(msg, "User deleted successfully");
        assert_eq!(ack_message("t", serde_json::Value::Null, "done").unwrap(), "done");
        assert!(ack_message("t", json!("nope"), "done").is_err());
    }
}
