use crate::config::{Config, ExtractionMode};

/// The slice of configuration the runner needs, detached from the file layout.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub extraction_mode: ExtractionMode,
    pub min_chars: usize,
    pub default_target_count: usize,
    pub batch_mode: bool,
    pub max_tokens: u32,
    pub temperature: f32,
    pub spreadsheet_name: String,
    pub test_id_prefix: String,
    pub max_worksheet_name_len: usize,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            extraction_mode: config.extraction.mode,
            min_chars: config.extraction.min_chars,
            default_target_count: config.generation.target_count,
            batch_mode: config.generation.batch_mode,
            max_tokens: config.generation.max_tokens,
            temperature: config.generation.temperature,
            spreadsheet_name: config.sheets.spreadsheet_name.clone(),
            test_id_prefix: config.sheets.test_id_prefix.clone(),
            max_worksheet_name_len: config.sheets.max_worksheet_name_len,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
