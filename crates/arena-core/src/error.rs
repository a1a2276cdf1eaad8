//! Error types for Arena

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid backend url: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
