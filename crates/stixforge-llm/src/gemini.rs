//! Gemini provider implementation
//!
//! Sends prompts to the Google Gemini `generateContent` API. This is the
//! secondary extraction backend, used when the primary produces nothing.
//!
//! The API takes the system instructions and the user payload as two parts
//! of a single content block; the credential travels as a query parameter.

use crate::LlmError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stixforge_domain::traits::ChatProvider;
use tracing::{debug, warn};

/// Default Gemini API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Gemini generateContent provider
pub struct GeminiProvider {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
    max_retries: u32,
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiProvider {
    /// Create a new provider with the given API key.
    ///
    /// Like the primary provider, a missing key surfaces as a configuration
    /// error at call time rather than at construction.
    pub fn new(api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key,
            client,
            max_retries: DEFAULT_MAX_RETRIES,
            temperature: 0.2,
            max_output_tokens: 4096,
        }
    }

    /// Create a provider reading the credential from `GEMINI_API_KEY`.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());
        Self::new(api_key)
    }

    /// Override the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the request timeout, rebuilding the HTTP client
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap();
        self
    }

    /// Set sampling temperature and output token budget
    pub fn with_generation(mut self, temperature: f32, max_output_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_output_tokens = max_output_tokens;
        self
    }

    /// Send the instructions and user payload, return the completion text
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::Configuration("GEMINI_API_KEY is not set".to_string()))?;

        let url = format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        );

        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: system }, Part { text: user }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        };

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self.client.post(&url).json(&request_body).send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        let parsed: GenerateContentResponse =
                            response.json().await.map_err(|e| {
                                LlmError::InvalidResponse(format!(
                                    "Failed to parse response: {}",
                                    e
                                ))
                            })?;
                        return Self::extract_content(parsed);
                    }

                    let status = response.status();
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    warn!("Gemini responded with HTTP {}", status);
                    last_error = Some(LlmError::Communication(format!(
                        "HTTP {}: {}",
                        status, error_text
                    )));
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                debug!("retrying Gemini call in {:?}", delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }

    fn extract_content(parsed: GenerateContentResponse) -> Result<String, LlmError> {
        let text = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| {
                LlmError::InvalidResponse("Response carried no candidate text".to_string())
            })?;

        if text.trim().is_empty() {
            return Err(LlmError::EmptyCompletion);
        }

        Ok(text)
    }
}

impl ChatProvider for GeminiProvider {
    type Error = LlmError;

    fn name(&self) -> &str {
        "gemini"
    }

    fn complete(&self, system: &str, user: &str) -> Result<String, Self::Error> {
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(async { self.complete(system, user).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_defaults() {
        let provider = GeminiProvider::new(Some("key".to_string()));
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(provider.model, DEFAULT_MODEL);
        assert_eq!(provider.temperature, 0.2);
        assert_eq!(provider.max_output_tokens, 4096);
    }

    #[tokio::test]
    async fn test_missing_credential_is_configuration_error() {
        let provider = GeminiProvider::new(None);
        let result = provider.complete("system", "user").await;
        assert!(matches!(result, Err(LlmError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_communication_error() {
        let provider = GeminiProvider::new(Some("key".to_string()))
            .with_base_url("http://127.0.0.1:1/v1beta/models")
            .with_max_retries(1);

        let result = provider.complete("system", "user").await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }

    #[test]
    fn test_extract_content_no_candidates() {
        let parsed = GenerateContentResponse { candidates: vec![] };
        assert!(matches!(
            GeminiProvider::extract_content(parsed),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_extract_content_text() {
        let parsed = GenerateContentResponse {
            candidates: vec![Candidate {
                content: CandidateContent {
                    parts: vec![CandidatePart {
                        text: Some("[]".to_string()),
                    }],
                },
            }],
        };
        assert_eq!(GeminiProvider::extract_content(parsed).unwrap(), "[]");
    }
}
