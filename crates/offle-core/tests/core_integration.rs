#![allow(clippy::unwrap_used, clippy::expect_used)]

use offle_core::*;

// ---------------------------------------------------------------------------
// 1. Message history as the backend sends it
// ---------------------------------------------------------------------------

#[test]
fn message_history_from_backend_document() {
    let json = serde_json::json!({
        "_id": "hist-1",
        "title": "Default title",
        "description": "Default Description",
        "created_at": "2025-02-20T12:00:00",
        "messages": [
            {"role": "user", "content": "hello", "timestamp": "2025-02-20T12:00:01"},
            {"role": "assistant", "content": "", "timestamp": "2025-02-20T12:00:02"},
            {"role": "user", "content": "again"}
        ]
    });

    let history: MessageHistory = serde_json::from_value(json).unwrap();
    assert_eq!(history.id, "hist-1");
    assert_eq!(history.messages.len(), 3);
    assert_eq!(history.messages[0].role, MessageRole::User);
    assert_eq!(history.messages[1].content, NO_CONTENT);
    assert!(history.messages[2].timestamp.is_none());
}

#[test]
fn message_history_serializes_with_mongo_id() {
    let history = MessageHistory {
        id: "hist-2".to_string(),
        title: None,
        messages: vec![ChatMessage::user("hi")],
    };
    let value = serde_json::to_value(&history).unwrap();
    assert_eq!(value["_id"], "hist-2");
    assert!(value.get("title").is_none());
    assert_eq!(value["messages"][0]["role"], "user");
}

// ---------------------------------------------------------------------------
// 2. Error Display and From impls
// ---------------------------------------------------------------------------

#[test]
fn error_display_and_from_impls() {
    let transport = OffleError::Transport("connection refused".to_string());
    assert_eq!(transport.to_string(), "Transport error: connection refused");

    let input = OffleError::InvalidInput("email is required".to_string());
    assert_eq!(input.to_string(), "Invalid input: email is required");

    let json_err: OffleError = serde_json::from_str::<Persona>("{").unwrap_err().into();
    assert!(matches!(json_err, OffleError::Json(_)));

    let io_err: OffleError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
    assert!(io_err.to_string().starts_with("IO error:"));
}

// ---------------------------------------------------------------------------
// 3. Profile payload from /users/me
// ---------------------------------------------------------------------------

#[test]
fn user_profile_from_backend() {
    let json = serde_json::json!({
        "user_id": "u1",
        "email": "a@b.com",
        "role": "builder",
        "username": "a",
        "personas": ["p1", "p2"]
    });
    let profile: UserProfile = serde_json::from_value(json).unwrap();
    assert_eq!(profile.role, Role::Builder);
    assert_eq!(profile.personas, vec!["p1", "p2"]);
}
