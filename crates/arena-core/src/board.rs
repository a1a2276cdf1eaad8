//! Battle board - per-entity presentation state
//!
//! A fixed table indexed by [`Entity`]. The board only mutates while it is
//! accepting input: between [`Board::begin`] and the first of a `Done`
//! event, [`Board::stop`] or [`Board::reset`].

use crate::types::{Entity, EntityState, Status, StreamEvent};
use std::time::Instant;
use tracing::debug;

/// What an applied event changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Update {
    Token { entity: Entity, text: String },
    Completed { entity: Entity },
    Finished,
}

#[derive(Debug)]
pub struct Board {
    entities: [EntityState; 3],
    running: bool,
    accepting: bool,
    started_at: Option<Instant>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            entities: Default::default(),
            running: false,
            accepting: false,
            started_at: None,
        }
    }

    /// Start a battle: every entity Running with cleared buffers.
    pub fn begin(&mut self) {
        self.begin_at(Instant::now());
    }

    pub fn begin_at(&mut self, now: Instant) {
        self.entities = std::array::from_fn(|_| EntityState::running());
        self.running = true;
        self.accepting = true;
        self.started_at = Some(now);
    }

    pub fn apply(&mut self, event: &StreamEvent) -> Option<Update> {
        self.apply_at(event, Instant::now())
    }

    /// Apply one event. Returns `None` if the event was ignored.
    pub fn apply_at(&mut self, event: &StreamEvent, now: Instant) -> Option<Update> {
        if !self.accepting {
            debug!("board not accepting, dropping {:?}", event);
            return None;
        }

        match event {
            StreamEvent::Token { entity, text } => {
                let state = &mut self.entities[entity.index()];
                if state.status != Status::Running {
                    return None;
                }
                state.partial.push_str(text);
                Some(Update::Token {
                    entity: *entity,
                    text: text.clone(),
                })
            }
            StreamEvent::Response { entity, text } => {
                let elapsed = self.started_at.map(|s| now.saturating_duration_since(s));
                let state = &mut self.entities[entity.index()];
                if state.status != Status::Running {
                    debug!("{} already {:?}, ignoring response", entity, state.status);
                    return None;
                }
                state.status = Status::Complete;
                state.accumulated = text.clone();
                state.partial.clear();
                state.elapsed = elapsed;
                Some(Update::Completed { entity: *entity })
            }
            StreamEvent::Done => {
                self.running = false;
                self.accepting = false;
                Some(Update::Finished)
            }
        }
    }

    /// Halt input after a stream failure or cancellation. Entity text is kept.
    pub fn stop(&mut self) {
        self.running = false;
        self.accepting = false;
    }

    pub fn reset(&mut self) {
        self.entities = Default::default();
        self.running = false;
        self.accepting = false;
        self.started_at = None;
    }

    pub fn get(&self, entity: Entity) -> &EntityState {
        &self.entities[entity.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, &EntityState)> {
        Entity::ALL.into_iter().zip(self.entities.iter())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    pub fn all_complete(&self) -> bool {
        self.entities.iter().all(EntityState::is_complete)
    }
}
