// src/models/event.rs

//! Event record as returned by the events API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single event from the events API.
///
/// Only the attributes the watcher reads are modelled; everything else is kept
/// in `extra` so a stored snapshot carries the upstream object unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventRecord {
    /// Stable event identifier (string or integer upstream)
    #[serde(with = "event_id")]
    pub id: String,

    /// Event title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Departure time, `YYYY-MM-DD HH:MM:SS` UTC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_at: Option<String>,

    /// Meetup time, `YYYY-MM-DD HH:MM:SS` UTC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meetup_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<Nested<Server>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure: Option<Nested<Location>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrive: Option<Nested<Location>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Route map image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map: Option<String>,

    /// Banner image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,

    /// Site-relative path of the event page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<String>,

    /// Organizing VTC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vtc: Option<Nested<Vtc>>,

    /// Attributes not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventRecord {
    /// Create a record with only an id set.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            start_at: None,
            meetup_at: None,
            server: None,
            departure: None,
            arrive: None,
            description: None,
            map: None,
            banner: None,
            url: None,
            game: None,
            vtc: None,
            extra: Map::new(),
        }
    }

    /// Event name, or an empty string when the API omitted it.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Server name, or the raw value when the server is not an object.
    pub fn server_name(&self) -> Option<String> {
        self.server.as_ref().and_then(|s| s.name())
    }

    /// Name of the organizing VTC.
    pub fn organizer(&self) -> Option<&str> {
        self.vtc
            .as_ref()
            .and_then(Nested::object)
            .and_then(|v| v.name.as_deref())
    }
}

/// A nested attribute that is normally an object.
///
/// Values of any other shape are kept as they arrived, so an unexpected
/// shape never makes the whole event undecodable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Nested<T> {
    Object(T),
    Other(Value),
}

impl<T> Nested<T> {
    pub fn object(&self) -> Option<&T> {
        match self {
            Nested::Object(inner) => Some(inner),
            Nested::Other(_) => None,
        }
    }
}

impl<T> From<T> for Nested<T> {
    fn from(inner: T) -> Self {
        Nested::Object(inner)
    }
}

impl Nested<Server> {
    pub fn name(&self) -> Option<String> {
        match self {
            Nested::Object(server) => server.name.clone(),
            Nested::Other(value) => Some(raw_text(value)),
        }
    }
}

impl Nested<Location> {
    /// Render as `"{city} ({location})"`, or the raw value for other shapes.
    pub fn display(&self) -> String {
        match self {
            Nested::Object(location) => location.display(),
            Nested::Other(value) => raw_text(value),
        }
    }
}

/// Strings render bare, anything else as compact JSON.
fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Game server the event runs on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Server {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Server {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            extra: Map::new(),
        }
    }
}

/// Departure or arrival point of a convoy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Company or place inside the city
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Location {
    pub fn new(city: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            location: Some(location.into()),
            extra: Map::new(),
        }
    }

    /// Render as `"{city} ({location})"`.
    pub fn display(&self) -> String {
        format!(
            "{} ({})",
            self.city.as_deref().unwrap_or_default(),
            self.location.as_deref().unwrap_or_default()
        )
    }
}

/// Virtual trucking company that organizes the event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Vtc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The API sends numeric ids; older snapshots may hold them as strings.
mod event_id {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S: Serializer>(id: &str, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(D::Error::custom(format!(
                "event id must be a string or number, got {other}"
            ))),
        }
    }
}
