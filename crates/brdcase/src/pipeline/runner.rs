use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tracing::{debug, error, info, info_span, warn, Instrument, Span};

use crate::error::ExtractError;
use crate::extractor::TextExtractor;
use crate::generator::{ChatClient, TestCaseGenerator};
use crate::model::SourceDocument;
use crate::sheets::{worksheet_name_now, SheetWriter, SpreadsheetApi};

use super::config::PipelineConfig;
use super::context::PipelineContext;
use super::error::{PipelineError, PipelineWarning};
use super::progress::{LogProgress, Phase, ProgressEvent, ProgressReporter};
use super::report::{BatchReport, DocumentReport};

pub struct Pipeline {
    config: Arc<PipelineConfig>,
    extractor: Arc<TextExtractor>,
    generator: TestCaseGenerator,
    writer: SheetWriter,
}

impl Pipeline {
    /// Production constructor: builds every stage from config around the given clients.
    pub fn from_config(
        config: Arc<PipelineConfig>,
        chat: Box<dyn ChatClient>,
        sheets: Box<dyn SpreadsheetApi>,
    ) -> Self {
        let extractor = TextExtractor::from_mode(config.extraction_mode, config.min_chars);
        let generator = TestCaseGenerator::new(chat, config.max_tokens, config.temperature);
        let writer = SheetWriter::new(sheets, config.spreadsheet_name.clone());

        Self::new(config, extractor, generator, writer)
    }

    /// Inject specific stages.
    pub fn new(
        config: Arc<PipelineConfig>,
        extractor: TextExtractor,
        generator: TestCaseGenerator,
        writer: SheetWriter,
    ) -> Self {
        Self {
            config,
            extractor: Arc::new(extractor),
            generator,
            writer,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline for a single document.
    /// Returns a (DocumentReport, PipelineContext) pair.
    ///
    /// The staged file is removed before returning, whatever the outcome.
    pub async fn run(
        &self,
        ctx: PipelineContext,
        progress: &dyn ProgressReporter,
    ) -> (DocumentReport, PipelineContext) {
        let span = info_span!("pipeline",
            filename = %ctx.document.filename(),
            target_count = ctx.target_count,
        );

        let (report, mut ctx) = self.run_steps(ctx, progress).instrument(span).await;
        self.step_cleanup(&mut ctx);
        (report, ctx)
    }

    async fn run_steps(
        &self,
        mut ctx: PipelineContext,
        progress: &dyn ProgressReporter,
    ) -> (DocumentReport, PipelineContext) {
        // Step 1: Extract text
        progress.report(ProgressEvent::Phase {
            phase: Phase::Extracting,
            message: "Extracting text from PDF...".to_string(),
        });
        if let Err(e) = self
            .step_extract(&mut ctx)
            .instrument(info_span!("extract_text"))
            .await
        {
            return Self::fail(ctx, e, progress);
        }

        // Step 2: Generate test cases
        progress.report(ProgressEvent::Phase {
            phase: Phase::Generating,
            message: "Generating test cases...".to_string(),
        });
        if let Err(e) = self
            .step_generate(&mut ctx)
            .instrument(info_span!("generate_test_cases"))
            .await
        {
            return Self::fail(ctx, e, progress);
        }

        // Step 3: Write worksheet
        progress.report(ProgressEvent::Phase {
            phase: Phase::Writing,
            message: "Writing to Google Sheets...".to_string(),
        });
        if let Err(e) = self
            .step_write(&mut ctx)
            .instrument(info_span!("write_worksheet"))
            .await
        {
            return Self::fail(ctx, e, progress);
        }

        let (Some(generation), Some(worksheet)) = (ctx.generation.as_ref(), ctx.worksheet.as_ref())
        else {
            // Both steps above set their results on success.
            return (
                DocumentReport::failure(ctx.document.filename(), "Pipeline ended without a result"),
                ctx,
            );
        };

        progress.report(ProgressEvent::Completed {
            worksheet_name: worksheet.worksheet_name.clone(),
            test_cases: generation.len(),
            sheet_url: worksheet.url.clone(),
        });

        let report = DocumentReport::success(
            ctx.document.filename(),
            worksheet.worksheet_name.clone(),
            generation.len(),
            ctx.target_count,
            worksheet.url.clone(),
            generation.advisory.clone(),
        );
        (report, ctx)
    }

    fn fail(
        ctx: PipelineContext,
        error: PipelineError,
        progress: &dyn ProgressReporter,
    ) -> (DocumentReport, PipelineContext) {
        let err_msg = error.to_string();
        progress.report(ProgressEvent::Failed {
            error: err_msg.clone(),
        });
        (DocumentReport::failure(ctx.document.filename(), err_msg), ctx)
    }

    /// Runs the extractor on the blocking pool. A panic in
    /// the parser is re-raised here for [`Pipeline::run_isolated`] to catch.
    async fn step_extract(&self, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        let extractor = Arc::clone(&self.extractor);
        let path = ctx.document.path().to_path_buf();
        let span = Span::current();

        let joined =
            tokio::task::spawn_blocking(move || span.in_scope(|| extractor.extract(&path))).await;
        let text = match joined {
            Ok(result) => result?,
            Err(e) => match e.try_into_panic() {
                Ok(panic) => std::panic::resume_unwind(panic),
                Err(e) => {
                    return Err(ExtractError::Pdf(format!("Extraction task failed: {}", e)).into())
                }
            },
        };
        ctx.extracted = Some(text);
        Ok(())
    }

    async fn step_generate(&self, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        let text = ctx.extracted.as_ref().map(|t| t.as_str()).unwrap_or_default();
        let generation = self
            .generator
            .generate(text, ctx.target_count, self.config.batch_mode)
            .await?;

        if let Some(advisory) = &generation.advisory {
            warn!("Partial generation: {}", advisory);
            ctx.warnings.push(PipelineWarning::PartialGeneration {
                advisory: advisory.clone(),
            });
        }

        info!(
            test_cases = generation.len(),
            target = ctx.target_count,
            "Generation finished"
        );
        ctx.generation = Some(generation);
        Ok(())
    }

    async fn step_write(&self, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        let test_cases = ctx
            .generation
            .as_ref()
            .map(|g| g.test_cases())
            .unwrap_or_default();

        let filename = ctx.document.filename();
        let worksheet_name = worksheet_name_now(filename, self.config.max_worksheet_name_len);
        ctx.worksheet_name = Some(worksheet_name.clone());

        let result = self
            .writer
            .write(
                &test_cases,
                &worksheet_name,
                filename,
                &self.config.test_id_prefix,
            )
            .await?;

        ctx.worksheet = Some(result);
        Ok(())
    }

    fn step_cleanup(&self, ctx: &mut PipelineContext) {
        match ctx.document.cleanup() {
            Ok(removed) => debug!(removed, "Staged file cleanup finished"),
            Err(e) => ctx.warnings.push(PipelineWarning::CleanupFailed {
                file: ctx.document.filename().to_string(),
                error: e.to_string(),
            }),
        }
    }

    /// Like [`Pipeline::run`], but a panic anywhere in the document's pipeline
    /// becomes a failed report instead of unwinding into the caller.
    pub async fn run_isolated(
        &self,
        document: SourceDocument,
        target_count: usize,
        progress: &dyn ProgressReporter,
    ) -> DocumentReport {
        let filename = document.filename().to_string();
        let staged = document.path().to_path_buf();
        let ctx = PipelineContext::new(document, target_count);

        match AssertUnwindSafe(self.run(ctx, progress)).catch_unwind().await {
            Ok((report, _ctx)) => report,
            Err(panic) => {
                let err_msg = format!("Unexpected error: {}", panic_message(panic.as_ref()));
                error!(file = %filename, "{}", err_msg);

                let _ = SourceDocument::new(staged, filename.clone()).cleanup();
                progress.report(ProgressEvent::Failed {
                    error: err_msg.clone(),
                });
                DocumentReport::failure(filename, err_msg)
            }
        }
    }

    /// Processes documents one at a time in order. A failing document never
    /// stops the ones after it.
    ///
    /// Entries already rejected before staging (`Err`) go into the report as
    /// they are, in their input position.
    pub async fn run_all<I>(&self, documents: I, target_count: usize) -> BatchReport
    where
        I: IntoIterator<Item = Result<SourceDocument, DocumentReport>>,
    {
        let documents: Vec<_> = documents.into_iter().collect();
        let total = documents.len();
        let mut results = Vec::with_capacity(total);

        for (index, entry) in documents.into_iter().enumerate() {
            match entry {
                Ok(document) => {
                    info!("Processing file {}/{}: {}", index + 1, total, document.filename());
                    let progress = LogProgress::new(document.filename());
                    results.push(self.run_isolated(document, target_count, &progress).await);
                }
                Err(rejected) => {
                    warn!(
                        "Skipping file {}/{}: {}: {}",
                        index + 1,
                        total,
                        rejected.filename,
                        rejected.error.as_deref().unwrap_or("rejected")
                    );
                    results.push(rejected);
                }
            }
        }

        let report = BatchReport::from_results(results);
        info!(
            successful = report.successful_files,
            failed = report.failed_files,
            "{}",
            report.message
        );
        report
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
