// src/services/source.rs

//! Events API client.
//!
//! Fetches the current list of events and reports a tri-state outcome so the
//! watcher can tell "no events upstream" apart from "the request failed".

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::models::{EventRecord, Snapshot, SourceConfig};
use crate::utils::http;

/// Result of one fetch from the events source.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// At least one event was retrieved.
    Events(Snapshot),
    /// The source answered successfully with zero events.
    Empty,
    /// The request failed; the reason is for logging only.
    Failed(String),
}

impl FetchOutcome {
    fn from_result(result: Result<Snapshot>) -> Self {
        match result {
            Ok(snapshot) if snapshot.is_empty() => FetchOutcome::Empty,
            Ok(snapshot) => FetchOutcome::Events(snapshot),
            Err(e) => FetchOutcome::Failed(e.to_string()),
        }
    }
}

/// A source of event snapshots.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Retrieve the current events. Never returns an error: failures are
    /// reported as [`FetchOutcome::Failed`].
    async fn fetch(&self) -> FetchOutcome;
}

/// Envelope of every events API response.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    error: bool,
    /// Event array on success, usually a message string on error
    #[serde(default)]
    response: Option<Value>,
}

/// Decode an events API body into a snapshot.
///
/// Entries that are not valid events are skipped with a warning. A body that
/// carried entries but yielded none is an error.
pub fn parse_events(body: &str) -> Result<Snapshot> {
    let envelope: ApiResponse = serde_json::from_str(body)?;

    if envelope.error {
        let message = match envelope.response {
            Some(Value::String(message)) => message,
            Some(other) => other.to_string(),
            None => "no message".to_string(),
        };
        return Err(AppError::fetch(format!("API reported an error: {message}")));
    }

    let entries = match envelope.response {
        None | Some(Value::Null) => return Ok(Snapshot::new()),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(AppError::fetch(format!(
                "expected an event array, got {other}"
            )));
        }
    };

    let total = entries.len();
    let mut snapshot = Snapshot::new();
    for entry in entries {
        match serde_json::from_value::<EventRecord>(entry) {
            Ok(event) => {
                snapshot.insert(event);
            }
            Err(e) => log::warn!("Skipping malformed event: {}", e),
        }
    }

    if total > 0 && snapshot.is_empty() {
        return Err(AppError::fetch(format!(
            "none of {total} events could be decoded"
        )));
    }

    Ok(snapshot)
}

/// HTTP-backed events source.
pub struct ApiEventSource {
    client: Client,
    api_url: String,
}

impl ApiEventSource {
    /// Create a source with its own client built from `config`.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = http::create_client(&config.user_agent, config.timeout_secs)?;
        Ok(Self::with_client(client, &config.api_url))
    }

    pub fn with_client(client: Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    async fn fetch_snapshot(&self) -> Result<Snapshot> {
        let response = self.client.get(&self.api_url).send().await?;
        let status = response.status();
        log::debug!("API status: {}", status);

        let body = response.text().await?;
        if status != StatusCode::OK {
            return Err(AppError::fetch(format!(
                "unexpected status {status}: {}",
                body.trim()
            )));
        }

        parse_events(&body)
    }
}

#[async_trait]
impl EventSource for ApiEventSource {
    async fn fetch(&self) -> FetchOutcome {
        let outcome = FetchOutcome::from_result(self.fetch_snapshot().await);
        match &outcome {
            FetchOutcome::Events(snapshot) => log::debug!("Got {} events", snapshot.len()),
            FetchOutcome::Empty => log::debug!("API returned no events"),
            FetchOutcome::Failed(reason) => log::warn!("Event fetch failed: {}", reason),
        }
        outcome
    }
}
