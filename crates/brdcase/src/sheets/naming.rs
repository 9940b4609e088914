use std::path::Path;
use std::sync::LazyLock;

use chrono::{Local, NaiveDateTime};
use regex::Regex;

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Length of a timestamp rendered with [`TIMESTAMP_FORMAT`].
pub const TIMESTAMP_LEN: usize = 15;

/// Used when nothing of the filename survives sanitizing.
const FALLBACK_NAME: &str = "document";

static RE_DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_-]").unwrap());

static RE_UNDERSCORE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());

/// Drops the extension and reduces the stem to `[A-Za-z0-9_-]`, with runs of
/// underscores collapsed and trimmed from both ends.
pub fn sanitize_filename(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);

    let replaced = RE_DISALLOWED.replace_all(stem, "_");
    let collapsed = RE_UNDERSCORE_RUN.replace_all(&replaced, "_");

    match collapsed.trim_matches('_') {
        "" => FALLBACK_NAME.to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// `{sanitized filename}_{timestamp}`, at most `max_len` characters.
///
/// Only the filename part is shortened while `max_len` leaves room for one
/// filename character, the separator and the timestamp. Below that the whole
/// name is cut to `max_len`.
pub fn worksheet_name(filename: &str, generated_at: NaiveDateTime, max_len: usize) -> String {
    let sanitized = sanitize_filename(filename);
    let timestamp = generated_at.format(TIMESTAMP_FORMAT).to_string();

    let max_filename_len = max_len.saturating_sub(timestamp.len() + 1).max(1);
    let truncated: String = sanitized.chars().take(max_filename_len).collect();

    format!("{}_{}", truncated, timestamp)
        .chars()
        .take(max_len)
        .collect()
}

pub fn worksheet_name_now(filename: &str, max_len: usize) -> String {
    worksheet_name(filename, Local::now().naive_local(), max_len)
}
