//! Service-account authentication for the spreadsheet API.
//!
//! Implements the OAuth2 JWT bearer grant (RFC 7523): a short-lived RS256
//! assertion signed with the service account's private key is exchanged for
//! an access token, which is cached until shortly before it expires.

use std::path::Path;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use log::{debug, info};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::SheetError;
use crate::sanitize::truncate_body;

pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

const JWT_BEARER_GRANT_TYPE: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Assertion lifetime; the token endpoint rejects anything over an hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Tokens are refreshed this long before they expire.
const REFRESH_MARGIN_SECS: i64 = 60;

/// The fields used from a service-account key file.
pub struct ServiceAccountKey {
    pub client_email: String,
    private_key: SecretString,
    pub token_uri: String,
}

#[derive(Deserialize)]
struct KeyFile {
    client_email: String,
    private_key: String,
    #[serde(default = "default_token_uri")]
    token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    /// Reads and parses the key file. Every failure is `CredentialsMissing`.
    pub fn from_file(path: &Path) -> Result<Self, SheetError> {
        if !path.exists() {
            return Err(SheetError::CredentialsMissing(format!(
                "Google credentials file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            SheetError::CredentialsMissing(format!(
                "Failed to read credentials file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, SheetError> {
        let file: KeyFile = serde_json::from_str(content).map_err(|e| {
            SheetError::CredentialsMissing(format!("Invalid service account key: {}", e))
        })?;

        if file.client_email.trim().is_empty() {
            return Err(SheetError::CredentialsMissing(
                "Service account key has an empty client_email".to_string(),
            ));
        }

        Ok(Self {
            client_email: file.client_email,
            private_key: SecretString::from(file.private_key),
            token_uri: file.token_uri,
        })
    }

    fn encoding_key(&self) -> Result<EncodingKey, SheetError> {
        EncodingKey::from_rsa_pem(self.private_key.expose_secret().as_bytes()).map_err(|e| {
            SheetError::CredentialsMissing(format!("Invalid service account private key: {}", e))
        })
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: String,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    ASSERTION_LIFETIME_SECS
}

struct CachedToken {
    token: SecretString,
    expires_at: i64,
}

impl CachedToken {
    fn share(&self) -> SecretString {
        SecretString::from(self.token.expose_secret().to_owned())
    }
}

/// Hands out access tokens for one service account, caching between calls.
pub struct TokenProvider {
    client: Client,
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    /// Fails with `CredentialsMissing` when the private key is not a valid RSA PEM.
    pub fn new(client: Client, key: ServiceAccountKey) -> Result<Self, SheetError> {
        let encoding_key = key.encoding_key()?;
        Ok(Self {
            client,
            key,
            encoding_key,
            cached: Mutex::new(None),
        })
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    pub async fn access_token(&self) -> Result<SecretString, SheetError> {
        let mut cached = self.cached.lock().await;
        let now = Utc::now().timestamp();

        if let Some(token) = cached.as_ref() {
            if now < token.expires_at - REFRESH_MARGIN_SECS {
                return Ok(token.share());
            }
            debug!("Cached access token near expiry, refreshing");
        }

        let fresh = self.exchange(now).await?;
        let token = fresh.share();
        *cached = Some(fresh);
        Ok(token)
    }

    fn assertion(&self, now: i64) -> Result<String, SheetError> {
        let claims = Claims {
            iss: &self.key.client_email,
            scope: SCOPES.join(" "),
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_LIFETIME_SECS,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key).map_err(
            |e| SheetError::CredentialsMissing(format!("Failed to sign token assertion: {}", e)),
        )
    }

    async fn exchange(&self, now: i64) -> Result<CachedToken, SheetError> {
        let assertion = self.assertion(now)?;
        info!(
            "Requesting access token for service account {}",
            self.key.client_email
        );

        let params = [
            ("grant_type", JWT_BEARER_GRANT_TYPE),
            ("assertion", assertion.as_str()),
        ];

        let response = self
            .client
            .post(&self.key.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SheetError::Timeout(format!("Token request timed out: {}", e))
                } else {
                    SheetError::CredentialsMissing(format!("Token request failed: {}", e))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SheetError::CredentialsMissing(format!(
                "Token exchange failed ({}): {}",
                status,
                truncate_body(&body)
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            SheetError::CredentialsMissing(format!("Failed to parse token response: {}", e))
        })?;

        debug!("Access token valid for {}s", token.expires_in);

        Ok(CachedToken {
            token: SecretString::from(token.access_token),
            expires_at: now + token.expires_in,
        })
    }
}
