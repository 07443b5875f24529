// src/error.rs

//! Unified error handling for the event watcher.

use std::fmt;

use thiserror::Error;

/// Result type alias for watcher operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Events API returned something unusable
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Webhook rejected the message
    #[error("Delivery failed with status {status}: {body}")]
    Delivery { status: u16, body: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a fetch error.
    pub fn fetch(message: impl fmt::Display) -> Self {
        Self::Fetch(message.to_string())
    }

    /// Create a delivery error from a rejected webhook response.
    pub fn delivery(status: u16, body: impl Into<String>) -> Self {
        Self::Delivery {
            status,
            body: body.into(),
        }
    }
}
