use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Shown in place of a message whose content is missing or empty.
pub const NO_CONTENT: &str = "No content available";

/// Who authored a [`ChatMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// The signed-in human.
    User,
    /// The persona's reply.
    Assistant,
    /// Any sender the client does not know about.
    #[serde(other)]
    Other,
}

impl MessageRole {
    /// Label used when rendering a transcript line.
    pub fn label(self) -> &'static str {
        match self {
            MessageRole::User => "You",
            MessageRole::Assistant => "AI",
            MessageRole::Other => "?",
        }
    }
}

/// A single chat turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message author.
    pub role: MessageRole,
    /// The textual content of the message.
    #[serde(default = "placeholder_content", deserialize_with = "content_or_placeholder")]
    pub content: String,
    /// When the turn happened, if known.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ChatMessage {
    /// Creates a message stamped with the current time.
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Some(Utc::now()),
        }
    }

    /// Creates a new message with [`MessageRole::User`].
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates a new message with [`MessageRole::Assistant`].
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// A backend-owned conversation. `id` is the continuation token used to
/// append further turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageHistory {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

fn placeholder_content() -> String {
    NO_CONTENT.to_string()
}

fn content_or_placeholder<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let content = Option::<String>::deserialize(deserializer)?;
    Ok(match content {
        Some(c) if !c.is_empty() => c,
        _ => placeholder_content(),
    })
}

// The backend emits naive UTC timestamps (no offset); accept both forms.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    let Some(raw) = raw else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Some(naive.and_utc()))
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{raw}': {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_message_creation() {
        let msg = ChatMessage::user("Hello");
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.content, "Hello");
        assert!(msg.timestamp.is_some());
    }

    #[test]
    fn test_naive_backend_timestamp() {
        let json = r#"{"role":"assistant","content":"hi","timestamp":"2025-02-20T12:34:56.123456"}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        let ts = msg.timestamp.unwrap();
        assert_eq!(ts.hour(), 12);
        assert_eq!(ts.minute(), 34);
    }

    #[test]
    fn test_rfc3339_timestamp() {
        let json = r#"{"role":"user","content":"hi","timestamp":"2025-02-20T12:00:00+02:00"}"#;
        let msg: ChatMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.timestamp.unwrap().hour(), 10);
    }

    #[test]
    fn test_missing_content_and_timestamp() {
        let msg: ChatMessage = serde_json::from_str(r#"{"role":"assistant"}"#).unwrap();
        assert_eq!(msg.content, NO_CONTENT);
        assert_eq!(msg.timestamp, None);

        let msg: ChatMessage =
            serde_json::from_str(r#"{"role":"assistant","content":null}"#).unwrap();
        assert_eq!(msg.content, NO_CONTENT);
    }

    #[test]
    fn test_garbage_timestamp_is_rejected() {
        let json = r#"{"role":"user","content":"hi","timestamp":"yesterday"}"#;
        assert!(serde_json::from_str::<ChatMessage>(json).is_err());
    }

    #[test]
    fn test_unknown_role_maps_to_other() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"role":"system","content":"boot"}"#).unwrap();
        assert_eq!(msg.role, MessageRole::Other);
    }
}
