//! Client configuration
//!
//! Loaded from TOML, falls back to defaults if no config file exists. The
//! backend base URL can be overridden by `ARENA_BACKEND_URL`.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

pub const BACKEND_URL_ENV: &str = "ARENA_BACKEND_URL";
pub const DEFAULT_CONFIG_FILE: &str = "arena.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ArenaConfig {
    /// Base URL of the backend serving `/api/analyze` and `/api/ai/battle`.
    pub backend_url: String,
    /// Overall timeout for the analyze call. The battle stream has none.
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8001".into(),
            request_timeout_secs: 120,
            connect_timeout_secs: 10,
        }
    }
}

impl ArenaConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::debug!("No config at {} - using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Apply `ARENA_BACKEND_URL` if set and non-empty.
    pub fn with_env(self) -> Self {
        let value = std::env::var(BACKEND_URL_ENV).ok();
        self.with_backend_override(value)
    }

    pub fn with_backend_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.backend_url = url.trim().to_string();
        }
        self
    }

    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    pub fn base_url(&self) -> Result<Url> {
        let url = Url::parse(&self.backend_url)
            .map_err(|e| Error::invalid_url(&self.backend_url, e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(Error::invalid_url(&self.backend_url, "not a base url"));
        }
        Ok(url)
    }

    /// Join an absolute API path onto the base URL, keeping any base path
    /// prefix (`http://host/prefix` + `/api/x` → `http://host/prefix/api/x`).
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut base = self.base_url()?;
        let joined = format!(
            "{}/{}",
            base.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        base.set_path(&joined);
        Ok(base)
    }
}
