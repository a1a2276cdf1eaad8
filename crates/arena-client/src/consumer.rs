//! Stream consumer: bytes → lines → records → events
//!
//! The battle and chat endpoints share the framing and record shape. They
//! differ only in how a record is interpreted.

use crate::error::{ClientError, ClientResult};
use crate::line::LineBuffer;
use arena_core::{ChatEvent, StreamEvent, StreamRecord, DATA_PREFIX};
use futures::{Stream, StreamExt};
use tracing::debug;

/// How a stream that did not fail came to an end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// The backend sent `done`.
    Finished,
    /// The body ended without `done`.
    Ended,
    /// The caller cancelled.
    Cancelled,
}

/// Decode one line into its raw record. `None` if it is not a record or
/// its payload is malformed.
pub fn parse_record(line: &str) -> Option<StreamRecord> {
    let payload = line.strip_prefix(DATA_PREFIX)?;
    match serde_json::from_str::<StreamRecord>(payload) {
        Ok(record) => Some(record),
        Err(e) => {
            debug!("dropping malformed record: {} ({})", payload, e);
            None
        }
    }
}

/// Parse one battle line.
pub fn parse_line(line: &str) -> Option<Vec<StreamEvent>> {
    parse_record(line).map(StreamRecord::into_events)
}

#[derive(Debug, Default)]
pub struct StreamConsumer {
    lines: LineBuffer,
}

impl StreamConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<StreamEvent> {
        self.lines
            .push(chunk)
            .iter()
            .filter_map(|line| parse_line(line))
            .flatten()
            .collect()
    }

    /// Parse whatever unterminated line is left at end of stream.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        self.lines
            .finish()
            .and_then(|line| parse_line(&line))
            .unwrap_or_default()
    }
}

/// Adapt a response body into a stream of interpreted records.
///
/// A transport error ends the stream after yielding it. An unterminated
/// last line is parsed at end of body.
pub fn record_stream<S, B, E, T, F>(
    bytes_stream: S,
    interpret: F,
) -> impl Stream<Item = ClientResult<T>> + Send
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: std::fmt::Display + Send,
    T: Send + 'static,
    F: Fn(StreamRecord) -> Vec<T> + Send + 'static,
{
    async_stream::stream! {
        let mut lines = LineBuffer::new();

        tokio::pin!(bytes_stream);

        while let Some(chunk_result) = bytes_stream.next().await {
            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    yield Err(ClientError::StreamError(e.to_string()));
                    return;
                }
            };
            debug!("chunk: {} bytes", chunk.as_ref().len());

            for line in lines.push(chunk.as_ref()) {
                let Some(record) = parse_record(&line) else { continue };
                for item in interpret(record) {
                    yield Ok(item);
                }
            }
        }

        if let Some(record) = lines.finish().and_then(|line| parse_record(&line)) {
            for item in interpret(record) {
                yield Ok(item);
            }
        }
    }
}

/// Battle events from a response body.
pub fn event_stream<S, B, E>(bytes_stream: S) -> impl Stream<Item = ClientResult<StreamEvent>> + Send
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: std::fmt::Display + Send,
{
    record_stream(bytes_stream, StreamRecord::into_events)
}

/// Chat events from a response body. Tokens need no `model`.
pub fn chat_stream<S, B, E>(bytes_stream: S) -> impl Stream<Item = ClientResult<ChatEvent>> + Send
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send,
    E: std::fmt::Display + Send,
{
    record_stream(bytes_stream, StreamRecord::into_chat_events)
}
