//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, Utc};

/// Current wall-clock time in the community's local time zone
pub fn local_now(utc_offset_minutes: i32) -> NaiveDateTime {
    to_local(Utc::now(), utc_offset_minutes)
}

/// Convert a UTC instant to local wall-clock time
pub fn to_local(instant: DateTime<Utc>, utc_offset_minutes: i32) -> NaiveDateTime {
    let offset = FixedOffset::east_opt(utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix());
    instant.with_timezone(&offset).naive_local()
}

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase, trim and collapse a free-form tag; empty tags become `None`
pub fn normalize_tag(tag: &str) -> Option<String> {
    let tag = normalize_whitespace(tag.trim().trim_start_matches('#')).to_lowercase();
    if tag.is_empty() {
        None
    } else {
        Some(tag)
    }
}

/// Normalize a list of tags, dropping empties and duplicates while keeping order
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut seen = Vec::new();
    for tag in tags {
        if let Some(tag) = normalize_tag(tag.as_ref()) {
            if !seen.contains(&tag) {
                seen.push(tag);
            }
        }
    }
    seen
}

/// Check that a string is an absolute http(s) URL
pub fn is_http_url(value: &str) -> bool {
    match url::Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}

/// Calculate pagination offset (pages are 1-based)
pub fn calculate_offset(page: usize, page_size: usize) -> usize {
    page.saturating_sub(1).saturating_mul(page_size)
}

/// Split a comma-separated query value into trimmed, non-empty parts
pub fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
