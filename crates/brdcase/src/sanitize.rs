//! Helpers for sanitizing data before it enters tracing span attributes
//! and error messages.
//!
//! Logs are safe to share for debugging. Upload paths and full API response
//! bodies must not leak into them.

use std::path::Path;

/// Maximum length for API error bodies carried in errors and logs.
pub const MAX_ERROR_BODY_LENGTH: usize = 200;

/// Returns only the filename component of a path (no directory).
///
/// Safe for span fields: reveals the file name, never the directory.
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// Truncates a response body to `MAX_ERROR_BODY_LENGTH` characters.
///
/// Counts characters, not bytes, so multi-byte text never splits mid-char.
pub fn truncate_body(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_ERROR_BODY_LENGTH) {
        Some((cut, _)) => format!("{}... (truncated)", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
