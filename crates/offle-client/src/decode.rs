//! Response-schema validation at the client boundary.
//!
//! Every response goes through [`decode`] before anything else sees it, so
//! a malformed payload turns into one typed [`OffleError::Decode`] for that
//! call and view code never has to check shapes.

use offle_core::{MessageHistory, OffleError, OffleResult, PersonaSummary, UNNAMED_PERSONA};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Deserializes `value` into `T`, labelling failures with `context`.
pub fn decode<T: DeserializeOwned>(context: &str, value: Value) -> OffleResult<T> {
    serde_json::from_value(value).map_err(|e| OffleError::decode(context, e))
}

#[derive(Deserialize)]
struct PersonaDict {
    persona_dict: Map<String, Value>,
}

/// `{"persona_dict": {"<id>": "<name>", ...}}`, kept in backend order.
pub fn persona_list(value: Value) -> OffleResult<Vec<PersonaSummary>> {
    let dict: PersonaDict = decode("persona list", value)?;
    Ok(dict
        .persona_dict
        .into_iter()
        .map(|(id, name)| match name {
            Value::String(name) => PersonaSummary::new(id, name),
            _ => PersonaSummary::new(id, UNNAMED_PERSONA),
        })
        .collect())
}

#[derive(Deserialize)]
struct HistoryEnvelope {
    message_history: Vec<MessageHistory>,
}

/// `{"message_history": [{"_id": ..., "messages": [...]}, ...]}`.
pub fn history_list(value: Value) -> OffleResult<Vec<MessageHistory>> {
    let envelope: HistoryEnvelope = decode("message history", value)?;
    Ok(envelope.message_history)
}

/// Pulls a human-readable message out of an error body.
///
/// The backend reports errors as `{"detail": "..."}`; validation failures
/// carry a list under `detail`, which is rendered as JSON.
pub fn error_detail(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(mut obj)) => match obj.remove("detail") {
            Some(Value::String(detail)) => detail,
            Some(other) => other.to_string(),
            None => Value::Object(obj).to_string(),
        },
        _ if body.trim().is_empty() => "no response body".to_string(),
        _ => body.trim().to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_persona_list_keeps_backend_order() {
        let value = json!({"persona_dict": {"z1": "Zed", "a1": "Ada", "m1": 42}});
        let personas = persona_list(value).unwrap();
        let ids: Vec<&str> = personas.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["z1", "a1", "m1"]);
        assert_eq!(personas[2].name, UNNAMED_PERSONA);
    }

    #[test]
    fn test_persona_list_missing_dict_is_decode_error() {
        let err = persona_list(json!({"personas": []})).unwrap_err();
        match err {
            OffleError::Decode { context, reason } => {
                assert_eq!(context, "persona list");
                assert!(reason.contains("persona_dict"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_persona_list_rejects_array_shape() {
        assert!(persona_list(json!([{"id": "p1", "name": "Ada"}])).is_err());
        assert!(persona_list(json!({"persona_dict": ["p1"]})).is_err());
    }

    #[test]
    fn test_history_list() {
        let value = json!({"message_history": [
            {"_id": "h1", "messages": [{"role": "user", "content": "hi"}]},
            {"_id": "h2", "messages": []}
        ]});
        let histories = history_list(value).unwrap();
        assert_eq!(histories.len(), 2);
        assert_eq!(histories[0].messages[0].content, "hi");

        assert!(history_list(json!({"message_history": null})).is_err());
        assert!(history_list(json!({})).is_err());
    }

    #[test]
    fn test_error_detail_variants() {
        assert_eq!(error_detail(r#"{"detail":"Persona not found"}"#), "Persona not found");
        assert_eq!(
            error_detail(r#"{"detail":[{"loc":["body","name"]}]}"#),
            r#"[{"loc":["body","name"]}]"#
        );
        assert_eq!(error_detail("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_detail(""), "no response body");
    }
}
