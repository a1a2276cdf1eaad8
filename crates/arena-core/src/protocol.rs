//! Backend wire protocol
//!
//! Battle stream (server → client), one record per line:
//!
//!   data: {"model": "gpt", "token": "Hel"}
//!   data: {"model": "gpt", "response": "Hello"}
//!   data: {"done": true}
//!
//! Fields are not exclusive: a single record may carry a token, a response
//! and the done flag at once. They are interpreted in that order.
//!
//! The avatar chat stream uses the same framing with one speaker, so its
//! records carry no `model`:
//!
//!   data: {"token": "Hel"}
//!   data: {"done": true}

use crate::types::{ChatEvent, ChatMessage, Entity, StreamEvent};
use serde::{Deserialize, Serialize};

/// Prefix marking a record line.
pub const DATA_PREFIX: &str = "data: ";

pub const BATTLE_PATH: &str = "/api/ai/battle";
pub const ANALYZE_PATH: &str = "/api/analyze";
pub const CHAT_PATH: &str = "/api/ai/claude/stream";

// ---------------------------------------------------------------------------
// Client → Server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BattleRequest {
    pub prompt: String,
    pub session_id: String,
}

impl BattleRequest {
    /// Request with a fresh `battle-<unix millis>` session id.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            session_id: format!("battle-{}", chrono::Utc::now().timestamp_millis()),
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }
}

/// Chat turn: the whole conversation so far, ending with the user message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub session_id: String,
}

impl ChatRequest {
    /// Request with a fresh `avatar-<unix millis>` session id.
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            session_id: format!("avatar-{}", chrono::Utc::now().timestamp_millis()),
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalyzeRequest {
    pub url: String,
}

// ---------------------------------------------------------------------------
// Server → Client
// ---------------------------------------------------------------------------

/// Raw record payload as sent by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamRecord {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub done: Option<bool>,
}

impl StreamRecord {
    /// Interpret the record as zero or more events.
    ///
    /// Empty strings carry nothing, an unknown model drops only the
    /// entity-bound events.
    pub fn into_events(self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        let entity = self.model.as_deref().and_then(Entity::from_wire);

        if let Some(entity) = entity {
            if let Some(text) = self.token.filter(|t| !t.is_empty()) {
                events.push(StreamEvent::Token { entity, text });
            }
            if let Some(text) = self.response.filter(|r| !r.is_empty()) {
                events.push(StreamEvent::Response { entity, text });
            }
        }
        if self.done == Some(true) {
            events.push(StreamEvent::Done);
        }
        events
    }

    /// Interpret the record for the single-speaker chat stream. Any
    /// non-empty token counts, whatever `model` says.
    pub fn into_chat_events(self) -> Vec<ChatEvent> {
        let mut events = Vec::new();
        if let Some(text) = self.token.filter(|t| !t.is_empty()) {
            events.push(ChatEvent::Token(text));
        }
        if self.done == Some(true) {
            events.push(ChatEvent::Done);
        }
        events
    }
}
