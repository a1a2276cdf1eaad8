//! Avatar conversation - message history and the streaming reply
//!
//! A turn appends the user message and an empty assistant message. Chat
//! tokens accumulate into that assistant message until `done`, a stop or a
//! failure ends the turn.

use crate::protocol::ChatRequest;
use crate::types::{ChatEvent, ChatMessage, Role};
use tracing::debug;

/// Assistant message shown when a turn fails.
pub const ERROR_REPLY: &str = "Sorry, there was an error processing your request.";

/// What an applied chat event changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChatUpdate {
    Token(String),
    Finished,
}

#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<ChatMessage>,
    streaming: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a turn and build its request. `None` for blank text.
    ///
    /// The request carries the history up to and including the new user
    /// message. A reply still streaming from an earlier turn is stopped.
    pub fn begin_turn(&mut self, text: &str) -> Option<ChatRequest> {
        if text.trim().is_empty() {
            return None;
        }
        if self.streaming {
            debug!("new turn while streaming; keeping partial reply");
        }
        self.messages.push(ChatMessage::user(text));
        let request = ChatRequest::new(self.messages.clone());
        self.messages.push(ChatMessage::assistant(""));
        self.streaming = true;
        Some(request)
    }

    pub fn apply(&mut self, event: &ChatEvent) -> Option<ChatUpdate> {
        if !self.streaming {
            debug!("ignoring chat event outside a turn: {:?}", event);
            return None;
        }
        match event {
            ChatEvent::Token(text) => {
                let reply = self.messages.last_mut()?;
                reply.content.push_str(text);
                Some(ChatUpdate::Token(text.clone()))
            }
            ChatEvent::Done => {
                self.streaming = false;
                Some(ChatUpdate::Finished)
            }
        }
    }

    /// End the turn, keeping whatever reply has arrived.
    pub fn stop(&mut self) {
        self.streaming = false;
    }

    /// End the turn with the error reply. An assistant message that never
    /// received a token is replaced rather than left empty.
    pub fn fail(&mut self) {
        self.streaming = false;
        let placeholder = self
            .messages
            .last()
            .is_some_and(|m| m.role == Role::Assistant && m.content.is_empty());
        if placeholder {
            self.messages.pop();
        }
        self.messages.push(ChatMessage::assistant(ERROR_REPLY));
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.streaming = false;
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Text of the latest assistant message.
    pub fn reply(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == Role::Assistant)
            .map(|m| m.content.as_str())
    }

    pub fn is_streaming(&self) -> bool {
        self.streaming
    }
}
