use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::error::ExtractError;
use crate::extractor::TextSource;

/// Decodes the whole document's content streams with `pdf_extract`.
///
/// Handles font encodings lopdf gives up on, at the cost of layout.
/// `pdf_extract` can panic on malformed documents, so every call runs under
/// [`std::panic::catch_unwind`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentStreamSource;

impl ContentStreamSource {
    pub fn new() -> Self {
        Self
    }
}

impl TextSource for ContentStreamSource {
    fn name(&self) -> &'static str {
        "content_stream"
    }

    fn extract(&self, path: &Path) -> Result<String, ExtractError> {
        let _span = tracing::info_span!("extractor.content_stream").entered();

        let pdf_bytes = std::fs::read(path).map_err(|e| ExtractError::ReadDocument {
            path: path.to_path_buf(),
            source: e,
        })?;

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(&pdf_bytes)
        }));

        match result {
            Ok(Ok(text)) => Ok(text.trim().to_string()),
            Ok(Err(e)) => Err(ExtractError::Pdf(format!("Content stream decoding failed: {}", e))),
            Err(_) => Err(ExtractError::Pdf(
                "Content stream decoding panicked (malformed document)".to_string(),
            )),
        }
    }
}
