//! Client error types

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("request failed: {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("stream error: {0}")]
    StreamError(String),

    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error(transparent)]
    Core(#[from] arena_core::Error),
}
