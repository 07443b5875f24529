// src/services/mod.rs

//! Service layer for the event watcher.
//!
//! This module contains the external collaborators of the watch loop:
//! - Event retrieval (`EventSource`, `ApiEventSource`)
//! - Change delivery (`Notifier`, `WebhookNotifier`)
//! - Webhook payload construction (`embed`)

pub mod embed;
mod notifier;
mod source;

pub use notifier::{Notifier, WebhookNotifier};
pub use source::{ApiEventSource, EventSource, FetchOutcome, parse_events};
