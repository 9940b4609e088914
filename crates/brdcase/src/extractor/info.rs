use std::path::Path;

use serde::Serialize;
use tracing::warn;

use crate::extractor::page_text;
use crate::sanitize;

/// First-page text must exceed this many trimmed chars to count as text-bearing.
const HAS_TEXT_MIN_CHARS: usize = 10;

/// Basic facts about a staged document, used for logging and intake checks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentInfo {
    pub file_name: String,
    /// Size in MiB rounded to two decimals.
    pub file_size_mb: f64,
    pub num_pages: usize,
    /// Whether the first page carries extractable text (a scan usually does not).
    pub has_text: bool,
}

/// Never fails: unreadable documents yield zeroed fields and a warning.
pub fn document_info(path: &Path) -> DocumentInfo {
    let mut info = DocumentInfo {
        file_name: sanitize::redact_path(path),
        file_size_mb: 0.0,
        num_pages: 0,
        has_text: false,
    };

    match std::fs::metadata(path) {
        Ok(metadata) => info.file_size_mb = round_mb(metadata.len()),
        Err(e) => {
            warn!("Error getting document info for {}: {}", info.file_name, e);
            return info;
        }
    }

    match lopdf::Document::load(path) {
        Ok(doc) => {
            let pages = doc.get_pages();
            info.num_pages = pages.len();
            if let Some(first) = pages.keys().next() {
                info.has_text = page_text::page_text(&doc, *first)
                    .map(|text| text.chars().count() > HAS_TEXT_MIN_CHARS)
                    .unwrap_or(false);
            }
        }
        Err(e) => warn!("Error getting document info for {}: {}", info.file_name, e),
    }

    info
}

fn round_mb(bytes: u64) -> f64 {
    let mb = bytes as f64 / (1024.0 * 1024.0);
    (mb * 100.0).round() / 100.0
}
