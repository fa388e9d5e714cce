use offle_client::ApiClient;
use offle_core::{ChatMessage, OffleError, OffleResult, PersonaSummary};
use std::sync::Arc;
use tracing::{debug, warn};

/// The user and assistant turns appended by one successful send.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatExchange {
    pub user: ChatMessage,
    pub assistant: ChatMessage,
}

/// Persona picker plus transcript.
///
/// The transcript is append-only in the order the user acted. The history
/// id is an opaque continuation token: once held it is sent with every
/// message and never replaced by a later response.
pub struct ChatView {
    client: Arc<ApiClient>,
    personas: Vec<PersonaSummary>,
    loading: bool,
    selected: Option<PersonaSummary>,
    messages: Vec<ChatMessage>,
    history_id: Option<String>,
    /// Contents of the message input.
    pub draft: String,
}

impl ChatView {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            personas: Vec::new(),
            loading: true,
            selected: None,
            messages: Vec::new(),
            history_id: None,
            draft: String::new(),
        }
    }

    pub fn personas(&self) -> &[PersonaSummary] {
        &self.personas
    }

    /// True until the first persona list has arrived.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn selected(&self) -> Option<&PersonaSummary> {
        self.selected.as_ref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn history_id(&self) -> Option<&str> {
        self.history_id.as_deref()
    }

    pub async fn refresh_personas(&mut self) -> OffleResult<()> {
        match self.client.owned_personas().await {
            Ok(personas) => {
                self.personas = personas;
                self.loading = false;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch personas");
                Err(e)
            }
        }
    }

    /// Switches to `persona`, starting from an empty transcript, and loads
    /// its stored history.
    pub async fn select(&mut self, persona: PersonaSummary) -> OffleResult<()> {
        let persona_id = persona.id.clone();
        self.selected = Some(persona);
        self.messages.clear();
        self.history_id = None;
        self.load_history(&persona_id).await
    }

    /// Like [`Self::select`], for a persona from the loaded list.
    pub async fn select_by_id(&mut self, persona_id: &str) -> OffleResult<()> {
        let persona = self
            .personas
            .iter()
            .find(|p| p.id == persona_id)
            .cloned()
            .ok_or_else(|| OffleError::InvalidInput(format!("unknown persona '{persona_id}'")))?;
        self.select(persona).await
    }

    /// Replaces the transcript with every stored turn for `persona_id`,
    /// flattened across histories in backend order. The first history's id
    /// becomes the continuation token.
    pub async fn load_history(&mut self, persona_id: &str) -> OffleResult<()> {
        let histories = match self.client.persona_histories(persona_id).await {
            Ok(histories) => histories,
            Err(e) => {
                warn!(persona_id, error = %e, "Failed to fetch message history");
                return Err(e);
            }
        };

        if let Some(first) = histories.first() {
            self.history_id = Some(first.id.clone());
        }
        self.messages = histories.into_iter().flat_map(|h| h.messages).collect();
        debug!(
            persona_id,
            messages = self.messages.len(),
            history_id = ?self.history_id,
            "History loaded"
        );
        Ok(())
    }

    /// Sends `content` to the selected persona.
    ///
    /// Returns `Ok(None)` without touching the network when no persona is
    /// selected or the content is blank.
    pub async fn send(&mut self, content: &str) -> OffleResult<Option<ChatExchange>> {
        let Some(persona_id) = self.selected.as_ref().map(|p| p.id.clone()) else {
            return Ok(None);
        };
        if content.trim().is_empty() {
            return Ok(None);
        }

        let reply = self
            .client
            .chat(&persona_id, self.history_id.as_deref(), content)
            .await
            .map_err(|e| {
                warn!(persona_id = %persona_id, error = %e, "Failed to send message");
                e
            })?;

        if self.history_id.is_none() {
            self.history_id = reply.message_history_id;
        }

        let exchange = ChatExchange {
            user: ChatMessage::user(content),
            assistant: ChatMessage::assistant(reply.response),
        };
        self.messages.push(exchange.user.clone());
        self.messages.push(exchange.assistant.clone());
        Ok(Some(exchange))
    }

    /// Sends the message input and clears it on success.
    pub async fn send_draft(&mut self) -> OffleResult<Option<ChatExchange>> {
        let content = self.draft.clone();
        let exchange = self.send(&content).await?;
        if exchange.is_some() {
            self.draft.clear();
        }
        Ok(exchange)
    }
}
