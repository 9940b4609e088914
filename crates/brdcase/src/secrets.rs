//! Secret resolution for the generative API key.
//!
//! A key can come from three places, checked in priority order:
//!
//! 1. **Direct value** - inline in the config file, for quick local runs
//! 2. **File reference** - Docker secrets style (`/run/secrets/openai_key`)
//! 3. **Env var reference** - `OPENAI_API_KEY` by default
//!
//! Resolved values are wrapped in [`SecretString`] so they never end up in
//! `Debug` output or logs.

use secrecy::{ExposeSecret, SecretString};
use std::fs;

/// Shortest key accepted as plausibly real.
pub const MIN_API_KEY_LENGTH: usize = 20;

/// Prefixes of template values copied from sample `.env` files.
const PLACEHOLDER_PREFIXES: &[&str] = &["your_", "sk-xxx"];

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("No secret source provided (need one of: direct value, file path, or env var name)")]
    NoSourceProvided,

    #[error("Failed to read secret from file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Environment variable '{name}' not set")]
    EnvVarNotSet { name: String },

    #[error("Environment variable '{name}' contains invalid UTF-8")]
    EnvVarNotUnicode { name: String },

    #[error("{service} key rejected: {reason}")]
    KeyRejected { service: String, reason: String },
}

pub type Result<T> = std::result::Result<T, SecretError>;

/// The configured places a secret may be read from.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretSources<'a> {
    pub direct: Option<&'a str>,
    pub file: Option<&'a str>,
    pub env_var: Option<&'a str>,
}

impl<'a> SecretSources<'a> {
    pub fn new(direct: Option<&'a str>, file: Option<&'a str>, env_var: Option<&'a str>) -> Self {
        Self {
            direct,
            file,
            env_var,
        }
    }

    /// Resolves the secret from the first non-empty source.
    ///
    /// A configured source that fails (unreadable file, unset env var) is an
    /// error; later sources are not consulted.
    pub fn resolve(&self) -> Result<SecretString> {
        if let Some(value) = non_empty(self.direct) {
            return Ok(SecretString::from(value.to_string()));
        }

        if let Some(path) = non_empty(self.file) {
            let expanded = expand_home(path);
            return fs::read_to_string(&expanded)
                .map(|content| SecretString::from(content.trim().to_string()))
                .map_err(|source| SecretError::FileReadError {
                    path: expanded,
                    source,
                });
        }

        if let Some(name) = non_empty(self.env_var) {
            return match std::env::var(name) {
                // Env files often leave a trailing newline
                Ok(value) => Ok(SecretString::from(value.trim().to_string())),
                Err(std::env::VarError::NotPresent) => Err(SecretError::EnvVarNotSet {
                    name: name.to_string(),
                }),
                Err(std::env::VarError::NotUnicode(_)) => Err(SecretError::EnvVarNotUnicode {
                    name: name.to_string(),
                }),
            };
        }

        Err(SecretError::NoSourceProvided)
    }

    /// Like [`resolve`](Self::resolve) but treats "nothing configured" as `None`.
    pub fn resolve_optional(&self) -> Result<Option<SecretString>> {
        match self.resolve() {
            Ok(secret) => Ok(Some(secret)),
            Err(SecretError::NoSourceProvided) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn is_configured(&self) -> bool {
        non_empty(self.direct).is_some()
            || non_empty(self.file).is_some()
            || non_empty(self.env_var).is_some()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Rejects keys that are empty, too short, or still template placeholders.
pub fn validate_api_key(key: &SecretString, service: &str) -> Result<()> {
    let raw = key.expose_secret().trim();
    let rejected = |reason: &str| SecretError::KeyRejected {
        service: service.to_string(),
        reason: reason.to_string(),
    };

    if raw.is_empty() {
        return Err(rejected("key not configured"));
    }
    if raw.chars().count() < MIN_API_KEY_LENGTH {
        return Err(rejected("key appears to be invalid (too short)"));
    }
    if PLACEHOLDER_PREFIXES.iter().any(|p| raw.starts_with(p)) {
        return Err(rejected("key is still using a placeholder value"));
    }

    Ok(())
}

/// Expands a leading `~` to the user's home directory (HOME, then USERPROFILE).
///
/// `~user/path` is not supported.
fn expand_home(path: &str) -> String {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME").or_else(|| std::env::var_os("USERPROFILE")) {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}
