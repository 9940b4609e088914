//! Chat-completions client for the generative text API.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use crate::config::schema::GenerationConfig;
use crate::error::{ConfigError, GenerateError};
use crate::sanitize::truncate_body;
use crate::secrets::{validate_api_key, SecretSources};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// One blocking request: system instruction, user instruction, token budget.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Token counters reported by the API. Observability only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: String,
    pub usage: Option<TokenUsage>,
}

#[async_trait]
pub trait ChatClient: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, GenerateError>;
}

/// OpenAI-compatible `/chat/completions` client.
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: SecretString,
}

impl OpenAiClient {
    /// Resolves and checks the API key, then builds the HTTP client.
    pub fn from_config(config: &GenerationConfig) -> Result<Self, ConfigError> {
        let api_key = SecretSources::new(
            config.api_key.as_deref(),
            config.api_key_file.as_deref(),
            config.api_key_env.as_deref(),
        )
        .resolve()?;
        validate_api_key(&api_key, "OpenAI API")?;

        Self::new(
            &config.base_url,
            &config.model,
            api_key,
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn new(
        base_url: &str,
        model: &str,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::Validation {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            endpoint: chat_endpoint(base_url),
            model: model.to_string(),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

fn chat_endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

fn map_transport_error(e: reqwest::Error) -> GenerateError {
    if e.is_timeout() {
        GenerateError::Timeout(e.to_string())
    } else {
        GenerateError::ApiCallFailed(format!("Request failed: {}", e))
    }
}

#[async_trait]
impl ChatClient for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, GenerateError> {
        info!("Calling chat completions API ({})", self.model);

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(GenerateError::ApiCallFailed(format!(
                "API error ({}): {}",
                status,
                truncate_body(&text)
            )));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                GenerateError::Timeout(e.to_string())
            } else {
                GenerateError::ApiResponseMalformed(format!("Failed to parse JSON: {}", e))
            }
        })?;

        parse_completion(&json)
    }
}

fn parse_completion(json: &serde_json::Value) -> Result<ChatResponse, GenerateError> {
    let content = json["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or_else(|| {
            GenerateError::ApiResponseMalformed(
                "Invalid response format: missing choices[0].message.content".to_string(),
            )
        })?;

    let usage = json
        .get("usage")
        .and_then(|u| serde_json::from_value::<TokenUsage>(u.clone()).ok());

    match usage {
        Some(u) => info!(
            "API call successful (input tokens: {}, output tokens: {}, total tokens: {})",
            u.prompt_tokens, u.completion_tokens, u.total_tokens
        ),
        None => debug!("API call successful (no usage reported)"),
    }

    Ok(ChatResponse { content, usage })
}
