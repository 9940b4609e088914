use crate::extractor::ExtractedText;
use crate::generator::Generation;
use crate::model::{SourceDocument, WorksheetResult};

use super::error::PipelineWarning;

pub struct PipelineContext {
    // Input
    pub document: SourceDocument,
    pub target_count: usize,

    // Step 1 result, Some after step_extract
    pub extracted: Option<ExtractedText>,

    // Step 2 result, Some after step_generate
    pub generation: Option<Generation>,

    // Step 3 results
    pub worksheet_name: Option<String>,
    pub worksheet: Option<WorksheetResult>,

    // Non-fatal warnings
    pub warnings: Vec<PipelineWarning>,
}

impl PipelineContext {
    pub fn new(document: SourceDocument, target_count: usize) -> Self {
        Self {
            document,
            target_count,
            extracted: None,
            generation: None,
            worksheet_name: None,
            worksheet: None,
            warnings: Vec::new(),
        }
    }

    pub fn test_case_count(&self) -> usize {
        self.generation.as_ref().map(Generation::len).unwrap_or(0)
    }
}
