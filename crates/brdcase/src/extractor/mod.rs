pub mod content_stream;
pub mod info;
pub mod normalize;
pub mod page_text;

use std::path::Path;

use tracing::{info, warn};

use crate::config::schema::ExtractionMode;
use crate::error::ExtractError;
use crate::sanitize;

pub use content_stream::ContentStreamSource;
pub use info::{document_info, DocumentInfo};
pub use page_text::PageTextSource;

const PDF_EXTENSION: &str = "pdf";

/// Minimum share of alphanumeric characters among non-whitespace characters.
const MIN_ALPHANUMERIC_RATIO: f64 = 0.5;

/// One way of pulling raw text out of a document.
pub trait TextSource: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, path: &Path) -> Result<String, ExtractError>;
}

/// Normalized document text that passed the length and density checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    /// Accepts `text` only when it has at least `min_chars` characters and is
    /// at least half alphanumeric.
    pub fn validate(text: String, min_chars: usize) -> Result<Self, String> {
        let total = text.chars().count();
        if total < min_chars {
            return Err(format!(
                "content too short: {} characters, minimum {}",
                total, min_chars
            ));
        }

        let visible = text.chars().filter(|c| !c.is_whitespace()).count();
        let alphanumeric = text.chars().filter(|c| c.is_alphanumeric()).count();
        if visible == 0 || (alphanumeric as f64) < visible as f64 * MIN_ALPHANUMERIC_RATIO {
            return Err("content appears to be invalid or corrupted".to_string());
        }

        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn line_count(&self) -> usize {
        self.0.lines().count()
    }
}

/// Runs the configured extraction strategies over a document and normalizes
/// the result.
pub struct TextExtractor {
    primary: Box<dyn TextSource>,
    fallback: Option<Box<dyn TextSource>>,
    min_chars: usize,
}

impl TextExtractor {
    pub fn from_mode(mode: ExtractionMode, min_chars: usize) -> Self {
        match mode {
            ExtractionMode::Auto => Self::with_sources(
                Box::new(PageTextSource::new()),
                Some(Box::new(ContentStreamSource::new())),
                min_chars,
            ),
            ExtractionMode::PageText => {
                Self::with_sources(Box::new(PageTextSource::new()), None, min_chars)
            }
            ExtractionMode::ContentStream => {
                Self::with_sources(Box::new(ContentStreamSource::new()), None, min_chars)
            }
        }
    }

    pub fn with_sources(
        primary: Box<dyn TextSource>,
        fallback: Option<Box<dyn TextSource>>,
        min_chars: usize,
    ) -> Self {
        Self {
            primary,
            fallback,
            min_chars,
        }
    }

    pub fn min_chars(&self) -> usize {
        self.min_chars
    }

    pub fn extract(&self, path: &Path) -> Result<ExtractedText, ExtractError> {
        let file = sanitize::redact_path(path);
        let _span = tracing::info_span!("extractor.extract", file = %file).entered();

        if !path.is_file() {
            return Err(ExtractError::NotFound(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if extension != PDF_EXTENSION {
            return Err(ExtractError::UnsupportedFormat(extension));
        }

        info!(method = self.primary.name(), "Extracting text");
        let mut result = self.accept(run_source(self.primary.as_ref(), path));

        if let (Err(reason), Some(fallback)) = (&result, &self.fallback) {
            info!(
                method = fallback.name(),
                reason = %reason,
                "Primary extraction rejected, falling back"
            );
            result = self.accept(run_source(fallback.as_ref(), path));
        }

        let text = result.map_err(|reason| ExtractError::InsufficientContent { file, reason })?;

        info!(
            chars = text.char_count(),
            lines = text.line_count(),
            "Text extracted"
        );

        Ok(text)
    }

    /// Normalizes one strategy's output and applies the length and density checks.
    fn accept(&self, raw: String) -> Result<ExtractedText, String> {
        let trimmed = raw.trim().chars().count();
        if trimmed < self.min_chars {
            return Err(format!(
                "fewer than {} characters of text ({} found)",
                self.min_chars, trimmed
            ));
        }
        ExtractedText::validate(normalize::clean_text(&raw), self.min_chars)
    }
}

/// A failing strategy yields empty text so the next one still gets a chance.
fn run_source(source: &dyn TextSource, path: &Path) -> String {
    match source.extract(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("{} extraction failed: {}", source.name(), e);
            String::new()
        }
    }
}
