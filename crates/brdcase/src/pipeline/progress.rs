use tracing::{error, info};

/// The three stages a document passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Extracting,
    Generating,
    Writing,
}

impl Phase {
    /// 1-based position, for "Step n/3" style messages.
    pub fn step(&self) -> usize {
        match self {
            Phase::Extracting => 1,
            Phase::Generating => 2,
            Phase::Writing => 3,
        }
    }
}

/// Events emitted by the pipeline during processing.
pub enum ProgressEvent {
    Phase {
        phase: Phase,
        message: String,
    },
    Completed {
        worksheet_name: String,
        test_cases: usize,
        sheet_url: String,
    },
    Failed {
        error: String,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Writes progress to the log, one line per event.
pub struct LogProgress {
    filename: String,
}

impl LogProgress {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

impl ProgressReporter for LogProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Phase { phase, message } => {
                info!(file = %self.filename, "Step {}/3: {}", phase.step(), message);
            }
            ProgressEvent::Completed {
                worksheet_name,
                test_cases,
                sheet_url,
            } => {
                info!(
                    file = %self.filename,
                    worksheet = %worksheet_name,
                    test_cases,
                    url = %sheet_url,
                    "Completed"
                );
            }
            ProgressEvent::Failed { error } => {
                error!(file = %self.filename, "Failed: {}", error);
            }
        }
    }
}
