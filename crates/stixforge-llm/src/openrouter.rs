//! OpenRouter provider implementation
//!
//! Sends system/user message pairs to the OpenRouter chat-completions API,
//! targeting a DeepSeek model by default. This is the primary extraction
//! backend.
//!
//! # Features
//!
//! - Bearer authentication from process configuration
//! - Retry logic with exponential backoff on transport failures
//! - Request timeout on the HTTP client (the only timeout in the call path)
//!
//! # Examples
//!
//! ```no_run
//! use stixforge_llm::OpenRouterProvider;
//!
//! let provider = OpenRouterProvider::new(Some("sk-or-...".to_string()));
//! ```

use crate::LlmError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stixforge_domain::traits::ChatProvider;
use tracing::{debug, warn};

/// Default OpenRouter chat-completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Default model served through OpenRouter
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat:free";

/// Default request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Environment variables checked for the API credential, in order.
const API_KEY_VARS: &[&str] = &["DEEPSEEK_API_KEY", "OPENROUTER_API_KEY"];

/// OpenRouter chat-completions provider
pub struct OpenRouterProvider {
    endpoint: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
    max_retries: u32,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl OpenRouterProvider {
    /// Create a new provider with the given API key.
    ///
    /// A missing key is not an immediate error: the provider reports a
    /// configuration error on its first call instead, so a fallback
    /// orchestrator can still try other backends.
    pub fn new(api_key: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key,
            client,
            max_retries: DEFAULT_MAX_RETRIES,
            temperature: 0.1,
            max_tokens: 4000,
        }
    }

    /// Create a provider reading the credential from the environment
    /// (`DEEPSEEK_API_KEY`, then `OPENROUTER_API_KEY`).
    pub fn from_env() -> Self {
        let api_key = API_KEY_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok())
            .filter(|key| !key.is_empty());
        Self::new(api_key)
    }

    /// Override the API endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
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

    /// Set sampling temperature and completion token budget
    pub fn with_generation(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Send a system/user message pair and return the completion text
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            LlmError::Configuration(
                "DEEPSEEK_API_KEY / OPENROUTER_API_KEY is not set".to_string(),
            )
        })?;

        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        // Retry on transport failures and non-2xx responses only; a parsed
        // but unusable body is returned to the caller immediately.
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&self.endpoint)
                .bearer_auth(api_key)
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    if response.status().is_success() {
                        let parsed: ChatCompletionResponse =
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
                    warn!("OpenRouter responded with HTTP {}", status);
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
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                debug!("retrying OpenRouter call in {:?}", delay);
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }

    fn extract_content(parsed: ChatCompletionResponse) -> Result<String, LlmError> {
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                LlmError::InvalidResponse("Response carried no completion text".to_string())
            })?;

        if content.trim().is_empty() {
            return Err(LlmError::EmptyCompletion);
        }

        Ok(content)
    }
}

impl ChatProvider for OpenRouterProvider {
    type Error = LlmError;

    fn name(&self) -> &str {
        "openrouter"
    }

    fn complete(&self, system: &str, user: &str) -> Result<String, Self::Error> {
        // Blocking wrapper for the async call; the pipeline invokes this
        // from a blocking task.
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
        let provider = OpenRouterProvider::new(Some("key".to_string()));
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model, DEFAULT_MODEL);
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_provider_builders() {
        let provider = OpenRouterProvider::new(Some("key".to_string()))
            .with_endpoint("http://localhost:9999/v1/chat/completions")
            .with_model("deepseek/deepseek-chat")
            .with_max_retries(5)
            .with_generation(0.2, 2000);
        assert_eq!(
            provider.endpoint,
            "http://localhost:9999/v1/chat/completions"
        );
        assert_eq!(provider.model, "deepseek/deepseek-chat");
        assert_eq!(provider.max_retries, 5);
        assert_eq!(provider.temperature, 0.2);
        assert_eq!(provider.max_tokens, 2000);
    }

    #[tokio::test]
    async fn test_missing_credential_is_configuration_error() {
        let provider = OpenRouterProvider::new(None);
        let result = provider.complete("system", "user").await;
        assert!(matches!(result, Err(LlmError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_communication_error() {
        let provider = OpenRouterProvider::new(Some("key".to_string()))
            .with_endpoint("http://127.0.0.1:1/v1/chat/completions")
            .with_max_retries(1);

        let result = provider.complete("system", "user").await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }

    #[test]
    fn test_extract_content_empty_completion() {
        let parsed = ChatCompletionResponse {
            choices: vec![ChatChoice {
                message: ChatResponseMessage {
                    content: Some("   ".to_string()),
                },
            }],
        };
        assert!(matches!(
            OpenRouterProvider::extract_content(parsed),
            Err(LlmError::EmptyCompletion)
        ));
    }

    #[test]
    fn test_extract_content_missing_choices() {
        let parsed = ChatCompletionResponse { choices: vec![] };
        assert!(matches!(
            OpenRouterProvider::extract_content(parsed),
            Err(LlmError::InvalidResponse(_))
        ));
    }
}
