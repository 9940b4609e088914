//! Startup checks run once before any document is accepted.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::schema::Config;
use crate::error::ConfigError;
use crate::secrets::{validate_api_key, SecretSources};

/// What the startup checks found. Warnings do not stop the service.
#[derive(Debug, Default)]
pub struct StartupReport {
    pub upload_directory: PathBuf,
    pub warnings: Vec<String>,
}

impl StartupReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Creates the upload directory and checks that the generative API key and
/// spreadsheet credentials look usable.
///
/// Only a failure to create the upload directory is fatal.
pub fn prepare_environment(config: &Config) -> Result<StartupReport, ConfigError> {
    let upload_directory = PathBuf::from(&config.upload_directory);
    std::fs::create_dir_all(&upload_directory).map_err(|e| ConfigError::ReadFile {
        path: upload_directory.clone(),
        source: e,
    })?;

    let mut warnings = Vec::new();

    let generation = &config.generation;
    let sources = SecretSources::new(
        generation.api_key.as_deref(),
        generation.api_key_file.as_deref(),
        generation.api_key_env.as_deref(),
    );
    match sources.resolve() {
        Ok(key) => {
            if let Err(e) = validate_api_key(&key, "OpenAI API") {
                warnings.push(e.to_string());
            }
        }
        Err(e) => warnings.push(format!("OpenAI API key not configured: {}", e)),
    }

    if !Path::new(&config.sheets.credentials_file).exists() {
        warnings.push(format!(
            "Google credentials file not found at: {}",
            config.sheets.credentials_file
        ));
    }

    for warning in &warnings {
        warn!("{}", warning);
    }

    info!(
        model = %generation.model,
        target_count = generation.target_count,
        coverage_target = config.coverage_target,
        spreadsheet = %config.sheets.spreadsheet_name,
        "Configuration ready"
    );

    Ok(StartupReport {
        upload_directory,
        warnings,
    })
}
