use serde::{Deserialize, Serialize};

pub const CONFIG_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    #[serde(default = "default_upload_directory")]
    pub upload_directory: String,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: u64,
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
    /// Display-only coverage goal, echoed at startup.
    #[serde(default = "default_coverage_target")]
    pub coverage_target: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            upload_directory: default_upload_directory(),
            max_upload_bytes: default_max_upload_bytes(),
            allowed_extensions: default_allowed_extensions(),
            extraction: ExtractionConfig::default(),
            generation: GenerationConfig::default(),
            sheets: SheetsConfig::default(),
            coverage_target: default_coverage_target(),
        }
    }
}

fn default_upload_directory() -> String {
    "uploads".to_string()
}

fn default_max_upload_bytes() -> u64 {
    16 * 1024 * 1024
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["pdf".to_string()]
}

fn default_coverage_target() -> u32 {
    80
}

/// Which text-extraction strategies run, and in what order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Page text first, content-stream decoding when that yields too little.
    #[default]
    Auto,
    PageText,
    ContentStream,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    #[serde(default)]
    pub mode: ExtractionMode,
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
}

fn default_min_chars() -> usize {
    100
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            mode: ExtractionMode::Auto,
            min_chars: default_min_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub api_key_file: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_target_count")]
    pub target_count: usize,
    #[serde(default = "default_true")]
    pub batch_mode: bool,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4-turbo-preview".to_string()
}

fn default_api_key_env() -> Option<String> {
    Some("OPENAI_API_KEY".to_string())
}

fn default_max_tokens() -> u32 {
    4000
}

fn default_temperature() -> f32 {
    0.7
}

fn default_generation_timeout() -> u64 {
    60
}

fn default_target_count() -> usize {
    55
}

fn default_true() -> bool {
    true
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key: None,
            api_key_file: None,
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_generation_timeout(),
            target_count: default_target_count(),
            batch_mode: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsConfig {
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,
    #[serde(default = "default_spreadsheet_name")]
    pub spreadsheet_name: String,
    #[serde(default = "default_test_id_prefix")]
    pub test_id_prefix: String,
    #[serde(default = "default_max_worksheet_name_len")]
    pub max_worksheet_name_len: usize,
    #[serde(default = "default_sheets_timeout")]
    pub timeout_secs: u64,
}

fn default_credentials_file() -> String {
    "credentials/service-account.json".to_string()
}

fn default_spreadsheet_name() -> String {
    "BRD_TestCases_Output".to_string()
}

fn default_test_id_prefix() -> String {
    "TC".to_string()
}

fn default_max_worksheet_name_len() -> usize {
    100
}

fn default_sheets_timeout() -> u64 {
    30
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            credentials_file: default_credentials_file(),
            spreadsheet_name: default_spreadsheet_name(),
            test_id_prefix: default_test_id_prefix(),
            max_worksheet_name_len: default_max_worksheet_name_len(),
            timeout_secs: default_sheets_timeout(),
        }
    }
}
