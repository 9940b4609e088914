//! Stages local files into the upload directory the way an upload handler would.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{info, warn};

use brdcase::config::Config;
use brdcase::pipeline::{estimate_processing_time, format_file_size, DocumentReport};
use brdcase::sanitize::redact_path;
use brdcase::{document_info, SourceDocument};

pub struct Intake {
    upload_directory: PathBuf,
    allowed_extensions: Vec<String>,
    max_upload_bytes: u64,
}

impl Intake {
    pub fn from_config(config: &Config) -> Self {
        Self {
            upload_directory: PathBuf::from(&config.upload_directory),
            allowed_extensions: config
                .allowed_extensions
                .iter()
                .map(|e| e.to_ascii_lowercase())
                .collect(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    /// Copies `input` into the upload directory under a unique name.
    ///
    /// Rejections come back as a failed report so the caller can keep going.
    pub fn stage(&self, input: &Path) -> Result<SourceDocument, DocumentReport> {
        let filename = redact_path(input);

        if !self.is_allowed(&filename) {
            return Err(DocumentReport::failure(
                filename,
                format!(
                    "File type not allowed. Allowed types: {}",
                    self.allowed_extensions.join(", ")
                ),
            ));
        }

        let size = std::fs::metadata(input)
            .map(|m| m.len())
            .map_err(|e| DocumentReport::failure(&filename, format!("Cannot read file: {}", e)))?;

        if size > self.max_upload_bytes {
            return Err(DocumentReport::failure(
                &filename,
                format!(
                    "File too large. Maximum size: {}",
                    format_file_size(self.max_upload_bytes)
                ),
            ));
        }

        let staged = self.upload_directory.join(format!(
            "{}_{}",
            Local::now().format("%Y%m%d_%H%M%S_%f"),
            secure_filename(&filename)
        ));
        std::fs::copy(input, &staged)
            .map_err(|e| DocumentReport::failure(&filename, format!("Failed to stage file: {}", e)))?;

        let size_mb = size as f64 / (1024.0 * 1024.0);
        info!(
            "File saved: {} ({}), estimated processing time ~{} seconds",
            filename,
            format_file_size(size),
            estimate_processing_time(size_mb)
        );

        let doc_info = document_info(&staged);
        if doc_info.num_pages > 0 && !doc_info.has_text {
            warn!(
                pages = doc_info.num_pages,
                "First page of {} has no extractable text; it may be a scan", filename
            );
        }

        Ok(SourceDocument::new(staged, filename))
    }

    fn is_allowed(&self, filename: &str) -> bool {
        match filename.rsplit_once('.') {
            Some((_, ext)) => self
                .allowed_extensions
                .iter()
                .any(|allowed| allowed == &ext.to_ascii_lowercase()),
            None => false,
        }
    }
}

/// Keeps ASCII alphanumerics, dots, dashes and underscores; everything else becomes `_`.
fn secure_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
