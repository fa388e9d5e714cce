use offle_client::{ApiClient, PersonaCreated};
use offle_core::{OffleError, OffleResult, Persona, PersonaDraft, PersonaSummary};
use std::sync::Arc;
use tracing::{debug, warn};

/// An open edit form for one persona.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonaEdit {
    pub id: String,
    pub draft: PersonaDraft,
}

/// The "Manage Personas" page.
///
/// The list is only trusted after a server round-trip: create and update
/// both end by re-fetching it.
pub struct PersonaView {
    client: Arc<ApiClient>,
    personas: Vec<PersonaSummary>,
    selected: Option<Persona>,
    loading: bool,
    edit: Option<PersonaEdit>,
    /// Inputs of the create form.
    pub draft: PersonaDraft,
}

impl PersonaView {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            personas: Vec::new(),
            selected: None,
            loading: false,
            edit: None,
            draft: PersonaDraft::default(),
        }
    }

    pub fn personas(&self) -> &[PersonaSummary] {
        &self.personas
    }

    pub fn selected(&self) -> Option<&Persona> {
        self.selected.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn editing(&self) -> Option<&PersonaEdit> {
        self.edit.as_ref()
    }

    /// Mutable access to the open edit form's inputs.
    pub fn edit_draft_mut(&mut self) -> Option<&mut PersonaDraft> {
        self.edit.as_mut().map(|e| &mut e.draft)
    }

    /// Re-fetches the owned personas. A failed fetch keeps the old list.
    pub async fn refresh(&mut self) -> OffleResult<()> {
        self.loading = true;
        let result = self.client.owned_personas().await;
        self.loading = false;
        match result {
            Ok(personas) => {
                debug!(count = personas.len(), "Personas loaded");
                self.personas = personas;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch personas");
                Err(e)
            }
        }
    }

    /// Shows the full record for `persona_id`. The previous selection is
    /// cleared while the detail loads.
    pub async fn select(&mut self, persona_id: &str) -> OffleResult<&Persona> {
        self.selected = None;
        match self.client.persona(persona_id).await {
            Ok(persona) => Ok(self.selected.insert(persona)),
            Err(e) => {
                warn!(persona_id, error = %e, "Failed to fetch persona");
                Err(e)
            }
        }
    }

    /// Submits the create form, then clears it and reloads the list.
    pub async fn create(&mut self) -> OffleResult<PersonaCreated> {
        require_name(&self.draft)?;
        let created = self.client.create_persona(&self.draft).await.map_err(|e| {
            warn!(error = %e, "Failed to create persona");
            e
        })?;
        self.draft.clear();
        self.refresh().await?;
        Ok(created)
    }

    /// Opens the edit form pre-filled from the persona's full record.
    pub async fn begin_edit(&mut self, persona_id: &str) -> OffleResult<()> {
        let cached = self
            .selected
            .as_ref()
            .filter(|p| p.id == persona_id)
            .map(PersonaDraft::from);
        let draft = match cached {
            Some(draft) => draft,
            None => PersonaDraft::from(self.select(persona_id).await?),
        };
        self.edit = Some(PersonaEdit {
            id: persona_id.to_string(),
            draft,
        });
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Sends the full name and description of the open edit form.
    ///
    /// The new name shows in the list immediately; if the server refuses the
    /// update the list is rolled back and the form stays open.
    pub async fn save_edit(&mut self) -> OffleResult<String> {
        let Some(edit) = self.edit.clone() else {
            return Err(OffleError::InvalidInput("no persona is being edited".to_string()));
        };
        require_name(&edit.draft)?;

        let before = self.personas.clone();
        if let Some(entry) = self.personas.iter_mut().find(|p| p.id == edit.id) {
            entry.name.clone_from(&edit.draft.name);
        }

        let message = match self.client.update_persona(&edit.id, &edit.draft).await {
            Ok(message) => message,
            Err(e) => {
                warn!(persona_id = %edit.id, error = %e, "Failed to update persona");
                self.personas = before;
                return Err(e);
            }
        };

        self.edit = None;
        if let Some(selected) = self.selected.as_mut().filter(|p| p.id == edit.id) {
            selected.name = edit.draft.name;
            selected.description = Some(edit.draft.description);
        }
        self.refresh().await?;
        Ok(message)
    }
}

fn require_name(draft: &PersonaDraft) -> OffleResult<()> {
    if draft.name.trim().is_empty() {
        return Err(OffleError::InvalidInput("persona name is required".to_string()));
    }
    Ok(())
}
