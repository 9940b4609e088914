//! Per-document orchestration: extract, generate, write, clean up.

pub mod config;
pub mod context;
pub mod error;
pub mod progress;
pub mod report;
pub mod runner;

pub use config::PipelineConfig;
pub use context::PipelineContext;
pub use error::{PipelineError, PipelineWarning};
pub use progress::{LogProgress, NoopProgress, Phase, ProgressEvent, ProgressReporter};
pub use report::{
    coverage_estimate, estimate_processing_time, format_file_size, BatchReport, DocumentReport,
};
pub use runner::Pipeline;
