// src/utils/mod.rs

//! Utility functions and helpers.

pub mod http;
pub mod time;

use unicode_segmentation::UnicodeSegmentation;
use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Shorten `text` to at most `max` grapheme clusters, ending with `…` when cut.
pub fn truncate(text: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let mut graphemes = text.grapheme_indices(true);
    match graphemes.nth(max - 1) {
        Some((idx, g)) if idx + g.len() < text.len() => {
            let keep: String = text.graphemes(true).take(max - 1).collect();
            format!("{keep}…")
        }
        _ => text.to_string(),
    }
}
