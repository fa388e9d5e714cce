use serde::{Deserialize, Serialize};

/// Shown in place of a persona description the backend left empty.
pub const NO_DESCRIPTION: &str = "No description";

/// Shown in place of a persona name that is not a string.
pub const UNNAMED_PERSONA: &str = "Unnamed Persona";

/// A persona as listed by `GET /personas/owned`: just enough to pick one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaSummary {
    pub id: String,
    pub name: String,
}

impl PersonaSummary {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Full persona record from `GET /personas/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl Persona {
    /// The description, or [`NO_DESCRIPTION`] when it is missing or blank.
    pub fn description_or_placeholder(&self) -> &str {
        match self.description.as_deref() {
            Some(d) if !d.trim().is_empty() => d,
            _ => NO_DESCRIPTION,
        }
    }

    pub fn summary(&self) -> PersonaSummary {
        PersonaSummary::new(self.id.clone(), self.name.clone())
    }
}

/// Body of both `POST /personas/build` and `PUT /personas/build/{id}`.
///
/// Updates always send the full pair, never a partial patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaDraft {
    pub name: String,
    pub description: String,
}

impl PersonaDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Resets both fields, as after a successful create.
    pub fn clear(&mut self) {
        self.name.clear();
        self.description.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.name.trim().is_empty() && self.description.trim().is_empty()
    }
}

impl From<&Persona> for PersonaDraft {
    fn from(persona: &Persona) -> Self {
        Self {
            name: persona.name.clone(),
            description: persona.description.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_from_backend_document() {
        let json = r#"{
            "_id": "65f0c0ffee",
            "name": "Ralph",
            "description": "Support bot",
            "system_prompt": "You are a helpful AI assistant.",
            "model": "llama3.2",
            "temperature": 0.7,
            "creator_id": "u1"
        }"#;
        let persona: Persona = serde_json::from_str(json).unwrap();
        assert_eq!(persona.id, "65f0c0ffee");
        assert_eq!(persona.name, "Ralph");
        assert_eq!(persona.description_or_placeholder(), "Support bot");
        assert_eq!(persona.model.as_deref(), Some("llama3.2"));
    }

    #[test]
    fn test_persona_missing_description_uses_placeholder() {
        let persona: Persona = serde_json::from_str(r#"{"id":"p1","name":"Ada"}"#).unwrap();
        assert_eq!(persona.description, None);
        assert_eq!(persona.description_or_placeholder(), NO_DESCRIPTION);
    }

    #[test]
    fn test_draft_from_persona_and_clear() {
        let persona = Persona {
            id: "p1".to_string(),
            name: "Ada".to_string(),
            description: None,
            system_prompt: None,
            model: None,
            temperature: None,
        };
        let mut draft = PersonaDraft::from(&persona);
        assert_eq!(draft, PersonaDraft::new("Ada", ""));
        draft.clear();
        assert!(draft.is_empty());
    }
}
