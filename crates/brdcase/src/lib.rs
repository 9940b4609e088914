pub mod config;
pub mod error;
pub mod extractor;
pub mod generator;
pub mod model;
pub mod pipeline;
pub mod sanitize;
pub mod secrets;
pub mod sheets;

pub use config::{load_config, prepare_environment, Config, StartupReport};
pub use error::{BrdcaseError, ConfigError, ExtractError, GenerateError, Result, SheetError};
pub use extractor::{document_info, DocumentInfo, ExtractedText, TextExtractor};
pub use generator::{ChatClient, Generation, OpenAiClient, TestCaseGenerator};
pub use model::{Category, Priority, SourceDocument, TestCase, TestCaseBatch, WorksheetResult};
pub use pipeline::{BatchReport, DocumentReport, Pipeline, PipelineConfig, PipelineContext};
pub use secrets::{SecretError, SecretSources};
pub use sheets::{GoogleSheetsClient, SheetWriter, SpreadsheetApi};
