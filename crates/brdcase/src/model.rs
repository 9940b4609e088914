//! Core records passed between the extraction, generation and sheet stages.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::sanitize;

/// Priority of a generated test case.
///
/// Parsed case-insensitively, rendered capitalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Numeric order for sorting, most urgent first.
    pub fn sort_order(&self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!(
                "invalid priority '{}' (expected High, Medium or Low)",
                other
            )),
        }
    }
}

/// One UI/UX test case. All four fields are required and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub description: String,
    /// Newline-delimited instructions.
    pub steps: String,
    pub expected_result: String,
    pub priority: Priority,
}

/// Test-case category targeted by a single generation batch.
///
/// Declaration order is generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    HappyPath,
    Validation,
    EdgeCases,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::HappyPath,
        Category::Validation,
        Category::EdgeCases,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::HappyPath => "UI Happy Path",
            Category::Validation => "UI Validation & Interaction",
            Category::EdgeCases => "UI Edge Cases & Responsive",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered test cases produced by one category prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCaseBatch {
    pub category: Category,
    pub test_cases: Vec<TestCase>,
}

impl TestCaseBatch {
    pub fn len(&self) -> usize {
        self.test_cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.test_cases.is_empty()
    }
}

/// An uploaded requirement document staged on disk for one request.
///
/// Consumed once by the pipeline, which deletes the staged file afterwards
/// whatever the outcome.
#[derive(Debug)]
pub struct SourceDocument {
    path: PathBuf,
    filename: String,
}

impl SourceDocument {
    /// `filename` is the original upload name, used for labels and worksheet names.
    pub fn new(path: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            filename: filename.into(),
        }
    }

    /// Uses the staged file's own name as the upload name.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let filename = sanitize::redact_path(&path);
        Self { path, filename }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn size_bytes(&self) -> Option<u64> {
        std::fs::metadata(&self.path).map(|m| m.len()).ok()
    }

    /// Deletes the staged file. Returns false when nothing was removed.
    pub fn cleanup(&self) -> std::io::Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Cleaned up file: {}", sanitize::redact_path(&self.path));
                Ok(true)
            }
            Err(e) => {
                warn!(
                    "Error cleaning up file {}: {}",
                    sanitize::redact_path(&self.path),
                    e
                );
                Err(e)
            }
        }
    }
}

/// Outcome of one successful worksheet write. Never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorksheetResult {
    pub worksheet_name: String,
    /// Every row sent, including title, spacer and header rows.
    pub rows_written: usize,
    pub url: String,
}
