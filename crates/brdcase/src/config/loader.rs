use std::path::Path;

use tracing::debug;

use crate::config::schema::{Config, CONFIG_VERSION};
use crate::error::ConfigError;
use crate::sheets::naming::TIMESTAMP_LEN;

const SCHEMA_JSON: &str = include_str!("../../../../schema/config-v1.json");

/// Environment variables that override file values, paired with a setter.
const ENV_OVERRIDES: &[(&str, fn(&mut Config, String))] = &[
    ("OPENAI_MODEL", |c, v| c.generation.model = v),
    ("GOOGLE_CREDENTIALS_FILE", |c, v| c.sheets.credentials_file = v),
    ("GOOGLE_SHEET_NAME", |c, v| c.sheets.spreadsheet_name = v),
    ("TEST_CASE_PREFIX", |c, v| c.sheets.test_id_prefix = v),
    ("UPLOAD_FOLDER", |c, v| c.upload_directory = v),
];

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

/// Applies the deployment environment variables on top of `config`, then
/// re-validates the result.
pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
    for (name, apply) in ENV_OVERRIDES {
        if let Ok(value) = std::env::var(name) {
            let value = value.trim().to_string();
            if !value.is_empty() {
                debug!("Config override from environment: {}", name);
                apply(config, value);
            }
        }
    }

    validate_config(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();

    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != CONFIG_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    // Room for the timestamp, its separator and at least one filename char
    let min_name_len = TIMESTAMP_LEN + 2;
    if config.sheets.max_worksheet_name_len < min_name_len {
        return Err(ConfigError::Validation {
            message: format!(
                "sheets.max_worksheet_name_len must be at least {} (got {})",
                min_name_len, config.sheets.max_worksheet_name_len
            ),
        });
    }

    if config.sheets.spreadsheet_name.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "sheets.spreadsheet_name cannot be empty".to_string(),
        });
    }

    let base_url = &config.generation.base_url;
    if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
        return Err(ConfigError::Validation {
            message: format!("generation.base_url must be an http(s) URL: {}", base_url),
        });
    }

    if config.generation.target_count == 0 {
        return Err(ConfigError::Validation {
            message: "generation.target_count must be at least 1".to_string(),
        });
    }

    if config.extraction.min_chars == 0 {
        return Err(ConfigError::Validation {
            message: "extraction.min_chars must be at least 1".to_string(),
        });
    }

    Ok(())
}
