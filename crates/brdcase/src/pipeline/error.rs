use thiserror::Error;

use crate::error::{ExtractError, GenerateError, SheetError};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("PDF extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Test case generation failed: {0}")]
    Generation(#[from] GenerateError),

    #[error("Google Sheets write failed: {0}")]
    Sheets(#[from] SheetError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineWarning {
    /// A later generation batch failed; earlier batches were kept.
    PartialGeneration { advisory: String },
    CleanupFailed { file: String, error: String },
}

impl std::fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineWarning::PartialGeneration { advisory } => f.write_str(advisory),
            PipelineWarning::CleanupFailed { file, error } => {
                write!(f, "Could not remove staged file {}: {}", file, error)
            }
        }
    }
}
