//! Arena Core - Entity table, wire protocol, chat, scoring and configuration

pub mod board;
pub mod config;
pub mod conversation;
pub mod error;
pub mod growth;
pub mod protocol;
pub mod scoring;
pub mod types;

pub use board::{Board, Update};
pub use config::ArenaConfig;
pub use conversation::{ChatUpdate, Conversation};
pub use error::{Error, Result};
pub use protocol::*;
pub use types::*;
