// src/services/notifier.rs

//! Change notification delivery.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{ChangeRecord, NotifierConfig};
use crate::services::embed::{MessageStyle, build_message};
use crate::utils::http;

/// Status codes the webhook uses to acknowledge a message.
const ACCEPTED: [StatusCode; 2] = [StatusCode::OK, StatusCode::NO_CONTENT];

/// Delivers change records to an external channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one change. Errors are returned to the caller for logging and
    /// are never retried.
    async fn notify(&self, change: &ChangeRecord) -> Result<()>;
}

/// Posts change records to a Discord-compatible webhook.
pub struct WebhookNotifier {
    client: Client,
    webhook_url: Url,
    style: MessageStyle,
}

impl WebhookNotifier {
    pub fn new(config: &NotifierConfig, user_agent: &str, webhook_url: Url) -> Result<Self> {
        let client = http::create_client(user_agent, config.timeout_secs)?;
        Ok(Self::with_client(
            client,
            webhook_url,
            MessageStyle::from_config(config)?,
        ))
    }

    pub fn with_client(client: Client, webhook_url: Url, style: MessageStyle) -> Self {
        Self {
            client,
            webhook_url,
            style,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, change: &ChangeRecord) -> Result<()> {
        let message = build_message(change, &self.style, Utc::now());

        let response = self
            .client
            .post(self.webhook_url.clone())
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if ACCEPTED.contains(&status) {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::delivery(status.as_u16(), body.trim()))
    }
}
