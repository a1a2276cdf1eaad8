//! Arena Client - Streaming battle and chat consumer, analyzer client

pub mod analyze;
pub mod battle;
pub mod chat;
pub mod consumer;
pub mod error;
pub mod line;

pub use analyze::{overall_score, AnalysisObserver, AnalyzeClient, AnalyzeError};
pub use battle::{BattleClient, BattleHandle, BattleOutcome};
pub use chat::{ChatClient, ChatOutcome};
pub use consumer::{
    chat_stream, event_stream, parse_line, parse_record, record_stream, StreamConsumer,
    StreamOutcome,
};
pub use error::{ClientError, ClientResult};
pub use line::LineBuffer;
pub use tokio_util::sync::CancellationToken;
