pub mod loader;
pub mod schema;
pub mod startup;

pub use loader::{apply_env_overrides, load_config, load_config_from_str};
pub use schema::{Config, ExtractionConfig, ExtractionMode, GenerationConfig, SheetsConfig};
pub use startup::{prepare_environment, StartupReport};
