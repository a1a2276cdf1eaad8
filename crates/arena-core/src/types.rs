//! Core types for Arena

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One of the competing response sources in a battle.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Entity {
    Claude,
    Gpt,
    Gemini,
}

impl Entity {
    /// All entities in display order. A board slot is `ALL[entity.index()]`.
    pub const ALL: [Entity; 3] = [Entity::Claude, Entity::Gpt, Entity::Gemini];

    pub const fn index(self) -> usize {
        match self {
            Entity::Claude => 0,
            Entity::Gpt => 1,
            Entity::Gemini => 2,
        }
    }

    /// Wire name used in the `model` field.
    pub fn as_str(self) -> &'static str {
        match self {
            Entity::Claude => "claude",
            Entity::Gpt => "gpt",
            Entity::Gemini => "gemini",
        }
    }

    /// Upper-case name shown on cards and in the knockout summary.
    pub fn display_name(self) -> &'static str {
        match self {
            Entity::Claude => "CLAUDE",
            Entity::Gpt => "GPT",
            Entity::Gemini => "GEMINI",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "claude" => Some(Entity::Claude),
            "gpt" => Some(Entity::Gpt),
            "gemini" => Some(Entity::Gemini),
            _ => None,
        }
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-entity lifecycle within one battle.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Idle,
    Running,
    Complete,
}

/// Presentation state for one entity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntityState {
    pub status: Status,
    /// Final response text, set once on completion.
    pub accumulated: String,
    /// Tokens received since the battle started; cleared on completion.
    pub partial: String,
    /// Time from battle start to completion.
    pub elapsed: Option<Duration>,
}

impl EntityState {
    pub fn running() -> Self {
        Self {
            status: Status::Running,
            ..Default::default()
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == Status::Complete
    }
}

/// A typed event decoded from one stream record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental fragment of an entity's response.
    Token { entity: Entity, text: String },
    /// Full response; the entity is finished.
    Response { entity: Entity, text: String },
    /// End of the battle stream.
    Done,
}

impl StreamEvent {
    pub fn entity(&self) -> Option<Entity> {
        match self {
            StreamEvent::Token { entity, .. } | StreamEvent::Response { entity, .. } => {
                Some(*entity)
            }
            StreamEvent::Done => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Avatar chat
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the avatar conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Event from the single-speaker chat stream. Tokens carry no entity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatEvent {
    Token(String),
    Done,
}
