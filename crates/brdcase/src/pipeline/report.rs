//! Per-document and aggregate results handed back to the caller.

use serde::Serialize;

/// Coverage never reported above this, whatever the achieved count.
pub const MAX_COVERAGE_PERCENT: f64 = 95.0;

/// Outcome of one document.
///
/// A partial generation is still a success; its advisory travels in `error`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentReport {
    pub filename: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worksheet_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_test_cases: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_test_cases: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet_url: Option<String>,
}

impl DocumentReport {
    pub fn failure(filename: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            success: false,
            error: Some(error.into()),
            worksheet_name: None,
            total_test_cases: None,
            target_test_cases: None,
            coverage_percentage: None,
            sheet_url: None,
        }
    }

    pub fn success(
        filename: impl Into<String>,
        worksheet_name: impl Into<String>,
        achieved: usize,
        target: usize,
        sheet_url: impl Into<String>,
        advisory: Option<String>,
    ) -> Self {
        Self {
            filename: filename.into(),
            success: true,
            error: advisory,
            worksheet_name: Some(worksheet_name.into()),
            total_test_cases: Some(achieved),
            target_test_cases: Some(target),
            coverage_percentage: Some(coverage_estimate(achieved, target)),
            sheet_url: Some(sheet_url.into()),
        }
    }
}

/// Aggregate over every document of one request, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchReport {
    pub success: bool,
    pub message: String,
    pub total_files: usize,
    pub successful_files: usize,
    pub failed_files: usize,
    pub results: Vec<DocumentReport>,
}

impl BatchReport {
    pub fn from_results(results: Vec<DocumentReport>) -> Self {
        let successful_files = results.iter().filter(|r| r.success).count();
        let failed_files = results.len() - successful_files;
        let success = failed_files == 0;

        let message = if success {
            "All files processed successfully"
        } else {
            "Some files failed to process"
        };

        Self {
            success,
            message: message.to_string(),
            total_files: results.len(),
            successful_files,
            failed_files,
            results,
        }
    }
}

/// Display-only heuristic: `min(95, 40 + achieved / target * 50)`, one decimal.
pub fn coverage_estimate(achieved: usize, target: usize) -> f64 {
    if target == 0 {
        return 0.0;
    }
    let raw = 40.0 + (achieved as f64 / target as f64) * 50.0;
    (raw.min(MAX_COVERAGE_PERCENT) * 10.0).round() / 10.0
}

pub fn format_file_size(size_bytes: u64) -> String {
    let mut size = size_bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{:.1} {}", size, unit);
        }
        size /= 1024.0;
    }
    format!("{:.1} TB", size)
}

/// Rough processing estimate in seconds: ten plus five per megabyte.
pub fn estimate_processing_time(size_mb: f64) -> u64 {
    (10.0 + size_mb * 5.0) as u64
}
