// src/services/embed.rs

//! Discord webhook message construction.
//!
//! Turns a [`ChangeRecord`] into a webhook payload with a single embed:
//! kind-specific title and color, event summary, schedule and route fields,
//! and for updates a list of what changed.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use url::Url;

use crate::models::{
    ChangeKind, ChangeRecord, EventRecord, FieldChange, FieldDelta, NotifierConfig,
};
use crate::utils::time::{TimestampStyle, display_timestamp};
use crate::utils::{resolve_url, truncate};

// Discord embed limits
const TITLE_LIMIT: usize = 256;
const DESCRIPTION_LIMIT: usize = 4096;
const FIELD_VALUE_LIMIT: usize = 1024;

const NOT_SPECIFIED: &str = "Not specified";
const UNKNOWN: &str = "Unknown";

/// Webhook execute payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WebhookMessage {
    pub username: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Embed {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub color: u32,
    pub description: String,
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<EmbedMedia>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<EmbedMedia>,
    pub footer: EmbedFooter,
    /// RFC 3339
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl EmbedField {
    fn new(name: &str, value: impl AsRef<str>, inline: bool) -> Self {
        Self {
            name: name.to_string(),
            value: truncate(value.as_ref(), FIELD_VALUE_LIMIT),
            inline,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmbedMedia {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EmbedFooter {
    pub text: String,
}

/// Presentation settings shared by every message.
#[derive(Debug, Clone)]
pub struct MessageStyle {
    pub username: String,
    pub site_url: Url,
}

impl MessageStyle {
    pub fn from_config(config: &NotifierConfig) -> crate::error::Result<Self> {
        Ok(Self {
            username: config.username.clone(),
            site_url: Url::parse(&config.site_url)?,
        })
    }

    /// Absolute link to the event page, if the event has a path.
    fn event_link(&self, event: &EventRecord) -> Option<String> {
        event
            .url
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| resolve_url(&self.site_url, path))
    }
}

/// Embed sidebar color for a change kind.
pub fn color(kind: ChangeKind) -> u32 {
    match kind {
        ChangeKind::Created => 0x2ECC71,
        ChangeKind::Removed => 0xE74C3C,
        ChangeKind::Updated => 0xE67E22,
    }
}

fn title(kind: ChangeKind, event: &EventRecord) -> String {
    let name = event.display_name();
    let title = match kind {
        ChangeKind::Created => format!("🆕 Event Added: **{name}**"),
        ChangeKind::Removed => format!("❌ Event Removed: **{name}**"),
        ChangeKind::Updated => format!("🔄 Event Updated: **{name}**"),
    };
    truncate(&title, TITLE_LIMIT)
}

fn time_or_placeholder(raw: Option<&str>) -> String {
    match raw {
        Some(raw) if !raw.is_empty() => display_timestamp(raw, TimestampStyle::LongDateTime),
        _ => NOT_SPECIFIED.to_string(),
    }
}

/// Render one field change as a line of the "Changes" field.
fn change_line(change: &FieldChange) -> String {
    match &change.delta {
        FieldDelta::ContentChanged => format!("📝 **{} changed**", change.label),
        FieldDelta::Values { old, new } => format!(
            "**{}:** `{}` -> `{}`",
            change.label,
            old.as_deref().unwrap_or("none"),
            new.as_deref().unwrap_or("none")
        ),
    }
}

/// Build the webhook payload for a change.
pub fn build_message(
    change: &ChangeRecord,
    style: &MessageStyle,
    now: DateTime<Utc>,
) -> WebhookMessage {
    let kind = change.kind();
    let event = change.event();
    let link = style.event_link(event);

    let mut description = format!(
        "✨ **Organized by:** {}\n🎮 **Game:** {}",
        event.organizer().unwrap_or(UNKNOWN),
        event.game.as_deref().unwrap_or(UNKNOWN)
    );
    if let Some(link) = &link {
        description.push_str(&format!("\n🔗 [View Event on TruckersMP]({link})"));
    }

    let mut fields = vec![
        EmbedField::new("📅 Date", time_or_placeholder(event.start_at.as_deref()), false),
        EmbedField::new(
            "🕒 Meetup Time",
            time_or_placeholder(event.meetup_at.as_deref()),
            true,
        ),
        EmbedField::new(
            "🚦 Departure Time",
            time_or_placeholder(event.start_at.as_deref()),
            true,
        ),
        EmbedField::new(
            "🌍 Server",
            format!("**{}**", event.server_name().as_deref().unwrap_or(UNKNOWN)),
            false,
        ),
        EmbedField::new(
            "🚩 Start Location",
            event
                .departure
                .as_ref()
                .map(|l| l.display())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            false,
        ),
        EmbedField::new(
            "🏁 End Location",
            event
                .arrive
                .as_ref()
                .map(|l| l.display())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            false,
        ),
    ];

    if kind == ChangeKind::Updated {
        let lines: Vec<String> = change.field_changes().iter().map(change_line).collect();
        let value = if lines.is_empty() {
            "No details".to_string()
        } else {
            lines.join("\n")
        };
        fields.push(EmbedField::new("🔧 Changes", value, false));
    }

    let media = |url: &Option<String>| {
        url.as_ref()
            .filter(|u| !u.is_empty())
            .map(|u| EmbedMedia { url: u.clone() })
    };

    WebhookMessage {
        username: style.username.clone(),
        embeds: vec![Embed {
            title: title(kind, event),
            url: link,
            color: color(kind),
            description: truncate(&description, DESCRIPTION_LIMIT),
            fields,
            image: media(&event.map),
            thumbnail: media(&event.banner),
            footer: EmbedFooter {
                text: format!("Event ID: {} | TruckersMP API", event.id),
            },
            timestamp: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Location, Server, Vtc};
    use chrono::TimeZone;

    fn style() -> MessageStyle {
        MessageStyle::from_config(&NotifierConfig::default()).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 30, 12, 0, 0).unwrap()
    }

    fn sample_event() -> EventRecord {
        let mut event = EventRecord::new("4821");
        event.name = Some("Sunday Convoy".into());
        event.start_at = Some("2024-05-01 18:00:00".into());
        event.server = Some(Server::named("Simulation 1").into());
        event.departure = Some(Location::new("Berlin", "Tradeaux").into());
        event.arrive = Some(Location::new("Prague", "Posped").into());
        event.url = Some("/events/4821-sunday-convoy".into());
        event.game = Some("ETS2".into());
        event.map = Some("https://example.com/map.png".into());
        event.vtc = Some(
            Vtc {
                name: Some("Nordic Haulers".into()),
                ..Vtc::default()
            }
            .into(),
        );
        event
    }

    #[test]
    fn test_created_message() {
        let message = build_message(&ChangeRecord::Created(sample_event()), &style(), now());
        let embed = &message.embeds[0];

        assert_eq!(message.username, "TruckersMP Events Bot");
        assert_eq!(embed.title, "🆕 Event Added: **Sunday Convoy**");
        assert_eq!(embed.color, 0x2ECC71);
        assert_eq!(
            embed.url.as_deref(),
            Some("https://truckersmp.com/events/4821-sunday-convoy")
        );
        assert!(embed.description.contains("**Organized by:** Nordic Haulers"));
        assert!(embed.description.contains("**Game:** ETS2"));
        assert_eq!(embed.fields.len(), 6);
        assert_eq!(embed.fields[0].value, "<t:1714586400:F>");
        assert_eq!(embed.fields[1].value, "Not specified");
        assert_eq!(embed.fields[3].value, "**Simulation 1**");
        assert_eq!(embed.fields[4].value, "Berlin (Tradeaux)");
        assert_eq!(embed.footer.text, "Event ID: 4821 | TruckersMP API");
        assert_eq!(embed.timestamp, "2024-04-30T12:00:00Z");
        assert!(embed.thumbnail.is_none());
    }

    #[test]
    fn test_removed_message_color() {
        let message = build_message(&ChangeRecord::Removed(sample_event()), &style(), now());
        assert_eq!(message.embeds[0].color, 0xE74C3C);
        assert!(message.embeds[0].title.starts_with("❌ Event Removed"));
    }

    #[test]
    fn test_updated_message_lists_changes() {
        let change = ChangeRecord::Updated {
            event: sample_event(),
            changes: vec![
                FieldChange {
                    label: "Name",
                    delta: FieldDelta::Values {
                        old: Some("Saturday Convoy".into()),
                        new: Some("Sunday Convoy".into()),
                    },
                },
                FieldChange {
                    label: "Banner",
                    delta: FieldDelta::Values {
                        old: Some("https://example.com/b.png".into()),
                        new: None,
                    },
                },
                FieldChange {
                    label: "Description",
                    delta: FieldDelta::ContentChanged,
                },
            ],
        };

        let message = build_message(&change, &style(), now());
        let embed = &message.embeds[0];
        assert_eq!(embed.color, 0xE67E22);

        let changes = embed.fields.last().unwrap();
        assert_eq!(changes.name, "🔧 Changes");
        assert_eq!(
            changes.value,
            "**Name:** `Saturday Convoy` -> `Sunday Convoy`\n\
             **Banner:** `https://example.com/b.png` -> `none`\n\
             📝 **Description changed**"
        );
    }

    #[test]
    fn test_sparse_event_uses_placeholders() {
        let message = build_message(
            &ChangeRecord::Created(EventRecord::new("9")),
            &style(),
            now(),
        );
        let embed = &message.embeds[0];

        assert!(embed.url.is_none());
        assert!(!embed.description.contains("View Event"));
        assert_eq!(embed.fields[0].value, "Not specified");
        assert_eq!(embed.fields[3].value, "**Unknown**");
        assert_eq!(embed.fields[5].value, "Unknown");
        assert!(embed.image.is_none());
    }

    #[test]
    fn test_serialized_payload_shape() {
        let message = build_message(&ChangeRecord::Created(sample_event()), &style(), now());
        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["embeds"][0]["image"]["url"], "https://example.com/map.png");
        assert_eq!(value["embeds"][0]["fields"][1]["inline"], true);
        assert!(value["embeds"][0].get("thumbnail").is_none());
    }

    #[test]
    fn test_long_title_is_truncated() {
        let mut event = sample_event();
        event.name = Some("x".repeat(400));
        let message = build_message(&ChangeRecord::Created(event), &style(), now());

        let title = &message.embeds[0].title;
        assert_eq!(title.chars().count(), TITLE_LIMIT);
        assert!(title.ends_with('…'));
    }
}
