//! Google (Gemini) model capability

use crate::error::{GovernorError, GovernorResult};
use crate::model::ModelCapability;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::instrument;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

/// The key travels in a header so it never shows up in a request URL
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Connection settings for the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: 0.0,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// `generateContent` client for a single Gemini model
pub struct GeminiModel {
    config: GeminiConfig,
    http_client: Client,
}

impl GeminiModel {
    pub fn new(config: GeminiConfig) -> GovernorResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(GovernorError::config("Google API key not provided"));
        }

        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GovernorError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl ModelCapability for GeminiModel {
    #[instrument(skip(self, prompt), fields(model = %self.config.model), level = "debug")]
    async fn invoke(&self, prompt: &str) -> GovernorResult<String> {
        let request_body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }],
            "generationConfig": {
                "temperature": self.config.temperature
            }
        });

        let response = self
            .http_client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &error_text));
        }

        let response_json: Value = response.json().await?;
        parse_response(&response_json)
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

fn status_error(status: StatusCode, body: &str) -> GovernorError {
    let message = format!("Google API error (status {}): {}", status, body);
    if status == StatusCode::TOO_MANY_REQUESTS {
        GovernorError::quota_exceeded(message)
    } else {
        GovernorError::provider_with_status(message, status.as_u16())
    }
}

/// Concatenate the text parts of the first candidate
fn parse_response(response: &Value) -> GovernorResult<String> {
    let candidate = response["candidates"]
        .as_array()
        .and_then(|candidates| candidates.first())
        .ok_or_else(|| GovernorError::provider("No candidates in Google response"))?;

    let parts = candidate["content"]["parts"]
        .as_array()
        .ok_or_else(|| GovernorError::provider("No content parts in Google response"))?;

    Ok(parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect())
}
