//! Website analyzer client
//!
//! The report is opaque to this crate apart from `overall_score`. Any
//! failure collapses to a single user-facing message, with no retry.

use crate::error::ClientResult;
use arena_core::{AnalyzeRequest, ArenaConfig, ANALYZE_PATH};
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

pub const EMPTY_URL_MESSAGE: &str = "Please enter a website URL";
pub const FAILED_MESSAGE: &str = "Failed to analyze website. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error("{}", EMPTY_URL_MESSAGE)]
    EmptyUrl,

    /// Underlying cause; not shown to users.
    #[error("analysis failed: {0}")]
    Failed(String),
}

impl AnalyzeError {
    pub fn user_message(&self) -> &'static str {
        match self {
            AnalyzeError::EmptyUrl => EMPTY_URL_MESSAGE,
            AnalyzeError::Failed(_) => FAILED_MESSAGE,
        }
    }
}

/// Callbacks around one analysis.
pub trait AnalysisObserver {
    /// The URL was accepted and the request is about to be sent.
    fn started(&mut self) {}
    /// Always called after `started`; `None` on failure.
    fn completed(&mut self, report: Option<&Value>);
}

/// Observer that ignores everything.
impl AnalysisObserver for () {
    fn completed(&mut self, _report: Option<&Value>) {}
}

pub struct AnalyzeClient {
    client: Client,
    url: Url,
}

impl AnalyzeClient {
    pub fn new(config: &ArenaConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            url: config.endpoint(ANALYZE_PATH)?,
        })
    }

    pub async fn analyze(&self, url: &str) -> Result<Value, AnalyzeError> {
        self.analyze_with(url, &mut ()).await
    }

    pub async fn analyze_with<O>(&self, url: &str, observer: &mut O) -> Result<Value, AnalyzeError>
    where
        O: AnalysisObserver + ?Sized,
    {
        let url = url.trim();
        if url.is_empty() {
            return Err(AnalyzeError::EmptyUrl);
        }

        observer.started();
        match self.request(url).await {
            Ok(report) => {
                observer.completed(Some(&report));
                Ok(report)
            }
            Err(e) => {
                error!("analyze {} failed: {}", url, e);
                observer.completed(None);
                Err(e)
            }
        }
    }

    async fn request(&self, url: &str) -> Result<Value, AnalyzeError> {
        debug!("analyze request: {}", url);
        let response = self
            .client
            .post(self.url.clone())
            .json(&AnalyzeRequest { url: url.to_string() })
            .send()
            .await
            .map_err(|e| AnalyzeError::Failed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalyzeError::Failed(format!("{}: {}", status, body)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| AnalyzeError::Failed(e.to_string()))
    }
}

/// The report's weighted overall score, if present.
pub fn overall_score(report: &Value) -> Option<f64> {
    report.get("overall_score").and_then(Value::as_f64)
}
