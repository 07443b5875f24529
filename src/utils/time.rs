// src/utils/time.rs

//! Timestamp rendering for chat messages.
//!
//! Event times arrive as `YYYY-MM-DD HH:MM:SS` in UTC and are rendered as
//! Discord timestamp markup (`<t:UNIX:STYLE>`), which every client shows in
//! its own local time zone.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Wire format of event timestamps.
pub const API_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Discord timestamp display styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampStyle {
    /// `16:20`
    ShortTime,
    /// `16:20:30`
    LongTime,
    /// `20/04/2021`
    ShortDate,
    /// `20 April 2021`
    LongDate,
    /// `20 April 2021 16:20`
    ShortDateTime,
    /// `Tuesday, 20 April 2021 16:20`
    #[default]
    LongDateTime,
    /// `2 months ago`
    Relative,
}

impl TimestampStyle {
    fn code(&self) -> char {
        match self {
            TimestampStyle::ShortTime => 't',
            TimestampStyle::LongTime => 'T',
            TimestampStyle::ShortDate => 'd',
            TimestampStyle::LongDate => 'D',
            TimestampStyle::ShortDateTime => 'f',
            TimestampStyle::LongDateTime => 'F',
            TimestampStyle::Relative => 'R',
        }
    }
}

/// Parse an API timestamp, also accepting RFC 3339.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, API_TIME_FORMAT) {
        return Some(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Render a raw timestamp as Discord markup.
///
/// Never fails: input that does not parse is returned unchanged.
pub fn display_timestamp(raw: &str, style: TimestampStyle) -> String {
    match parse_timestamp(raw) {
        Some(dt) => format!("<t:{}:{}>", dt.timestamp(), style.code()),
        None => raw.to_string(),
    }
}
