use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrdcaseError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Generation error: {0}")]
    Generate(#[from] GenerateError),

    #[error("Spreadsheet error: {0}")]
    Sheet(#[from] SheetError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Secret resolution failed: {0}")]
    Secret(#[from] crate::secrets::SecretError),
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Unsupported document format: '{0}' (expected a .pdf file)")]
    UnsupportedFormat(String),

    #[error(
        "Failed to extract sufficient text from '{file}' ({reason}). \
         File may be a scanned image or corrupted."
    )]
    InsufficientContent { file: String, reason: String },

    #[error("Failed to read document '{path}': {source}")]
    ReadDocument {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to process PDF: {0}")]
    Pdf(String),
}

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Generative API error: {0}")]
    ApiCallFailed(String),

    #[error("Malformed generative API response: {0}")]
    ApiResponseMalformed(String),

    #[error("Generative API request timed out: {0}")]
    Timeout(String),

    #[error("Invalid target test case count: {0}")]
    InvalidTarget(usize),
}

impl GenerateError {
    /// True for failures of the response shape rather than the call itself.
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, GenerateError::ApiResponseMalformed(_))
    }
}

#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Spreadsheet credentials unavailable: {0}")]
    CredentialsMissing(String),

    #[error("Spreadsheet unavailable: {0}")]
    SpreadsheetUnavailable(String),

    #[error("Failed to write worksheet: {0}")]
    WriteFailed(String),

    #[error("Spreadsheet request timed out: {0}")]
    Timeout(String),
}

pub type Result<T> = std::result::Result<T, BrdcaseError>;
