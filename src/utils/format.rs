// src/utils/format.rs

use chrono::{DateTime, Utc};
use url::Url;

/// Formats a duration in seconds as `m:ss`.
pub fn format_time(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Short month/day label, e.g. "Oct 7".
pub fn short_date(at: &DateTime<Utc>) -> String {
    at.format("%b %-d").to_string()
}

/// Deterministic avatar URL for a display name.
/// The name is percent-encoded into the query string of `base`.
pub fn avatar_url(base: &Url, name: &str) -> String {
    let mut url = base.clone();
    url.query_pairs_mut()
        .append_pair("name", name)
        .append_pair("background", "4F46E5")
        .append_pair("color", "fff")
        .append_pair("bold", "true");
    url.into()
}
