use std::path::Path;

use crate::error::ExtractError;
use crate::extractor::TextSource;

/// Marker lopdf emits for CID fonts it cannot decode.
const IDENTITY_H_PATTERN: &str = "?Identity-H Unimplemented?";

/// Pulls text page by page through lopdf, pages separated by a blank line.
#[derive(Debug, Default, Clone, Copy)]
pub struct PageTextSource;

impl PageTextSource {
    pub fn new() -> Self {
        Self
    }
}

impl TextSource for PageTextSource {
    fn name(&self) -> &'static str {
        "page_text"
    }

    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let _span = tracing::info_span!("extractor.page_text").entered();

        let pdf_bytes = std::fs::read(path).map_err(|e| ExtractError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })?;

        let doc = lopdf::Document::load_mem(&pdf_bytes)
            .map_err(|e| ExtractError::Pdf(format!("Failed to load PDF: {}", e)))?;

        Ok(extract_pages(&doc))
    }
}

pub(crate) fn extract_pages(doc: &lopdf::Document) -> String {
    let mut pages = Vec::new();

    for (page_num, _) in doc.get_pages() {
        if let Some(text) = page_text(doc, page_num) {
            pages.push(text);
        }
    }

    pages.join("\n\n").trim().to_string()
}

/// Text of a single page, or `None` when the page yields nothing usable.
pub(crate) fn page_text(doc: &lopdf::Document, page_num: u32) -> Option<String> {
    let text = doc.extract_text(&[page_num]).ok()?;
    let text = text.replace(IDENTITY_H_PATTERN, "");
    let trimmed = text.trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
