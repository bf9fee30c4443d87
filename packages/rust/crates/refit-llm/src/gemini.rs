//! Gemini client: blocking `generateContent` calls.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::model::{GeminiModel, LanguageModel, ModelLimits};

/// Default REST endpoint of the Generative Language API.
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Connection settings for [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Model to call.
    pub model: GeminiModel,
    /// API key sent as `x-goog-api-key`.
    pub api_key: String,
    /// Base URL, without trailing slash.
    pub endpoint: String,
    /// Whole-request timeout.
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Settings with the default endpoint and timeout.
    #[must_use]
    pub fn new(model: GeminiModel, api_key: impl Into<String>) -> Self {
        Self {
            model,
            api_key: api_key.into(),
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// HTTP client for one Gemini model.
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Build a client.
    ///
    /// # Errors
    /// [`LlmError::Http`] when the HTTP client cannot be constructed.
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    /// Build a client reading the API key from `api_key_env`.
    ///
    /// # Errors
    /// [`LlmError::MissingApiKey`] when the variable is unset or blank.
    pub fn from_env(model: GeminiModel, api_key_env: &str) -> Result<Self, LlmError> {
        let api_key = std::env::var(api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LlmError::MissingApiKey(api_key_env.to_string()))?;
        Self::new(GeminiConfig::new(model, api_key))
    }

    /// The configured model.
    #[must_use]
    pub fn model(&self) -> GeminiModel {
        self.config.model
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model.code_name()
        )
    }
}

impl LanguageModel for GeminiClient {
    fn name(&self) -> &str {
        self.config.model.code_name()
    }

    fn limits(&self) -> ModelLimits {
        self.config.model.limits()
    }

    fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };
        tracing::debug!(model = %self.config.model, prompt_bytes = prompt.len(), "calling model");

        let res = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()?;
        let status = res.status();
        let text = res.text()?;
        if !status.is_success() {
            return Err(LlmError::Api {
                status: status.as_u16(),
                body: text,
            });
        }
        extract_text(&text)
    }
}

/// Concatenate the text parts of the first candidate.
fn extract_text(body: &str) -> Result<String, LlmError> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::Parse(format!("{e}; body: {body}")))?;
    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or(LlmError::EmptyResponse)?;
    let text: String = candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text)
}
