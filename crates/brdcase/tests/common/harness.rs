//! Test harness for isolated pipeline runs.
//!
//! Each harness owns a temporary upload directory, stages synthetic PDFs into
//! it and wires a `Pipeline` to scripted API fakes.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use brdcase::config::Config;
use brdcase::error::GenerateError;
use brdcase::pipeline::{DocumentReport, NoopProgress, Pipeline, PipelineConfig};
use brdcase::SourceDocument;

use super::fakes::{InMemorySheets, RequestLog, ScriptedChatClient};
use super::pdf::build_pdf;

pub struct TestHarness {
    temp_dir: TempDir,
    /// Staged uploads live here; the pipeline must leave it empty.
    pub upload_dir: PathBuf,
    pub config: Config,
    pub sheets: InMemorySheets,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_sheets(InMemorySheets::new())
    }

    pub fn with_sheets(sheets: InMemorySheets) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let upload_dir = temp_dir.path().join("uploads");
        std::fs::create_dir_all(&upload_dir).expect("Failed to create upload dir");

        let mut config = Config::default();
        config.upload_directory = upload_dir.display().to_string();

        Self {
            temp_dir,
            upload_dir,
            config,
            sheets,
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes a PDF with the given pages into the upload directory.
    pub fn stage_pdf(&self, filename: &str, pages: &[&str]) -> SourceDocument {
        let path = self.upload_dir.join(filename);
        std::fs::write(&path, build_pdf(pages)).expect("Failed to write PDF");
        SourceDocument::new(path, filename)
    }

    pub fn stage_bytes(&self, filename: &str, bytes: &[u8]) -> SourceDocument {
        let path = self.upload_dir.join(filename);
        std::fs::write(&path, bytes).expect("Failed to write input file");
        SourceDocument::new(path, filename)
    }

    /// A pipeline over the harness config answering with `replies` in order.
    pub fn pipeline(&self, replies: Vec<Result<String, GenerateError>>) -> (Pipeline, RequestLog) {
        let (chat, requests) = ScriptedChatClient::new(replies);
        let pipeline = Pipeline::from_config(
            Arc::new(PipelineConfig::from_config(&self.config)),
            Box::new(chat),
            Box::new(self.sheets.clone()),
        );
        (pipeline, requests)
    }

    /// Runs one document end to end.
    pub async fn run(
        &self,
        document: SourceDocument,
        target_count: usize,
        replies: Vec<Result<String, GenerateError>>,
    ) -> (DocumentReport, RequestLog) {
        let (pipeline, requests) = self.pipeline(replies);
        let report = pipeline
            .run_isolated(document, target_count, &NoopProgress)
            .await;
        (report, requests)
    }

    /// Files still present in the upload directory.
    pub fn staged_files(&self) -> Vec<PathBuf> {
        std::fs::read_dir(&self.upload_dir)
            .expect("Failed to read upload dir")
            .filter_map(|e| e.ok().map(|e| e.path()))
            .collect()
    }

    pub fn spreadsheet_name(&self) -> &str {
        &self.config.sheets.spreadsheet_name
    }
}
