pub mod models;

pub use models::GeminiModel;

use crate::config::{optional_setting, KeyFromEnv};
use crate::core::LowLevelClient;
use crate::error::{AIError, ConfigError, GeminiError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, info, instrument, warn};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
pub(crate) struct GenerateContentRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

impl GenerateContentRequest {
    /// The prompt is the only input: one content entry with one text part.
    pub(crate) fn from_prompt(prompt: String) -> Self {
        Self {
            contents: vec![GeminiContent { parts: vec![GeminiPart { text: prompt }] }],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, if present and non-empty.
    pub(crate) fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.is_empty())
    }
}

/// Configuration for the Gemini client
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: GeminiModel,
    pub base_url: String,
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: GeminiModel::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl KeyFromEnv for GeminiConfig {
    const KEY_NAME: &'static str = "GEMINI_API_KEY";
}

impl GeminiConfig {
    /// Read key, model and base URL from the environment / `.env`.
    /// A missing key is not an error here; it surfaces at preflight.
    pub fn from_env() -> Self {
        let mut config = Self { api_key: Self::find_key(), ..Self::default() };
        if let Some(model) = optional_setting("GEMINI_MODEL") {
            config.model = GeminiModel::from(model.as_str());
        }
        if let Some(base_url) = optional_setting("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        config
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: GeminiModel) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url.trim_end_matches('/'), self.model.id())
    }

    fn usable_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|key| !key.is_empty())
    }
}

#[derive(Clone, Debug)]
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new(GeminiConfig::from_env())
    }
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        info!(target: "quizify::gemini", model = %config.model.id(), "Creating new Gemini client");
        Self { config, client: Client::new() }
    }

    /// Use a caller-built HTTP client, e.g. one with a request timeout or proxy settings.
    pub fn with_http_client(config: GeminiConfig, client: Client) -> Self {
        info!(target: "quizify::gemini", model = %config.model.id(), "Creating new Gemini client with custom HTTP client");
        Self { config, client }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait]
impl LowLevelClient for GeminiClient {
    #[instrument(target = "quizify::gemini", skip(self, prompt), fields(prompt_len = prompt.len(), model = %self.config.model.id()))]
    async fn ask_raw(&self, prompt: String) -> Result<String, AIError> {
        let api_key = self
            .config
            .usable_key()
            .ok_or(AIError::Gemini(GeminiError::MissingKey { key_name: GeminiConfig::KEY_NAME }))?;

        let request = GenerateContentRequest::from_prompt(prompt);

        debug!(target: "quizify::gemini", "Sending request to Gemini API");
        let response = self
            .client
            .post(self.config.endpoint())
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                // The request URL carries the API key.
                let e = e.without_url();
                error!(target: "quizify::gemini", error = %e, "HTTP request failed");
                AIError::Gemini(GeminiError::Http(e.to_string()))
            })?;

        let status = response.status();
        debug!(target: "quizify::gemini", status = %status, "Received response from Gemini API");

        if status == 429 {
            warn!(target: "quizify::gemini", "Gemini API rate limit exceeded");
            return Err(AIError::Gemini(GeminiError::RateLimit));
        }

        if status == 401 {
            error!(target: "quizify::gemini", "Gemini API authentication failed");
            return Err(AIError::Gemini(GeminiError::Authentication));
        }

        if !status.is_success() {
            let body = response.text().await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(target: "quizify::gemini", status = %status, error = %body, "Gemini API error");
            return Err(AIError::Gemini(GeminiError::Status { status: status.as_u16(), body }));
        }

        let envelope: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!(target: "quizify::gemini", error = %e, "Failed to parse Gemini response JSON");
                AIError::Gemini(GeminiError::Envelope(e.to_string()))
            })?;

        debug!(target: "quizify::gemini", candidates = envelope.candidates.len(), "Parsed Gemini response");

        let result = envelope.first_text().ok_or_else(|| {
            error!(target: "quizify::gemini", "No text in first Gemini candidate");
            AIError::Gemini(GeminiError::EmptyResponse)
        });

        if let Ok(text) = &result {
            info!(target: "quizify::gemini", response_len = text.len(), "Successfully received Gemini response");
        }

        result
    }

    fn clone_box(&self) -> Box<dyn LowLevelClient> {
        Box::new(self.clone())
    }

    fn preflight(&self) -> Result<(), ConfigError> {
        match self.config.usable_key() {
            Some(_) => Ok(()),
            None => Err(ConfigError::MissingCredential { key_name: GeminiConfig::KEY_NAME }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> GenerateContentResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn request_body_has_single_text_part() {
        let body = serde_json::to_value(GenerateContentRequest::from_prompt("hello".into())).unwrap();
        assert_eq!(body, json!({"contents": [{"parts": [{"text": "hello"}]}]}));
    }

    #[test]
    fn first_text_reads_first_candidate() {
        let env = envelope(json!({
            "candidates": [
                {"content": {"parts": [{"text": "first"}, {"text": "second"}]}},
                {"content": {"parts": [{"text": "other"}]}}
            ]
        }));
        assert_eq!(env.first_text().as_deref(), Some("first"));
    }

    #[test]
    fn first_text_is_none_for_missing_pieces() {
        assert!(envelope(json!({})).first_text().is_none());
        assert!(envelope(json!({"candidates": []})).first_text().is_none());
        assert!(envelope(json!({"candidates": [{"finishReason": "SAFETY"}]})).first_text().is_none());
        assert!(envelope(json!({"candidates": [{"content": {"parts": []}}]})).first_text().is_none());
        assert!(envelope(json!({"candidates": [{"content": {"parts": [{"text": ""}]}}]})).first_text().is_none());
    }

    #[test]
    fn endpoint_joins_base_and_model() {
        let config = GeminiConfig::default()
            .with_base_url("http://localhost:1234/v1beta/")
            .with_model(GeminiModel::Override("custom".into()));
        assert_eq!(config.endpoint(), "http://localhost:1234/v1beta/models/custom:generateContent");
    }

    #[test]
    fn preflight_rejects_blank_key() {
        let client = GeminiClient::new(GeminiConfig::default().with_api_key("   "));
        assert_eq!(
            client.preflight(),
            Err(ConfigError::MissingCredential { key_name: "GEMINI_API_KEY" })
        );
        let client = GeminiClient::new(GeminiConfig::default().with_api_key("k"));
        assert!(client.preflight().is_ok());
    }

    #[test]
    fn debug_redacts_key() {
        let config = GeminiConfig::default().with_api_key("secret-key");
        assert!(!format!("{:?}", config).contains("secret-key"));
    }
}
