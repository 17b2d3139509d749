//! Stixforge LLM Provider Layer
//!
//! Pluggable chat-completion provider implementations.
//!
//! # Architecture
//!
//! This crate provides implementations of the `ChatProvider` trait from
//! `stixforge-domain`. Two independent remote backends are supported so the
//! extraction pipeline's fallback has meaning, plus a deterministic mock.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `OpenRouterProvider`: DeepSeek via the OpenRouter chat-completions API
//! - `GeminiProvider`: Google Gemini generateContent API
//!
//! # Examples
//!
//! ```
//! use stixforge_llm::MockProvider;
//! use stixforge_domain::traits::ChatProvider;
//!
//! let provider = MockProvider::new("Hello from LLM!");
//! let result = provider.complete("system", "user").unwrap();
//! assert_eq!(result, "Hello from LLM!");
//! ```

#![warn(missing_docs)]

pub mod gemini;
pub mod openrouter;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use stixforge_domain::traits::ChatProvider;
use thiserror::Error;

pub use gemini::GeminiProvider;
pub use openrouter::OpenRouterProvider;

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Missing or invalid provider configuration (e.g. no API key)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the provider
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The provider returned an empty completion
    #[error("Empty completion from provider")]
    EmptyCompletion,
}

/// Mock chat provider for deterministic testing
///
/// Returns pre-configured responses without making any network calls.
/// Responses are keyed on the user message; a default response covers
/// everything else.
///
/// # Examples
///
/// ```
/// use stixforge_llm::MockProvider;
/// use stixforge_domain::traits::ChatProvider;
///
/// let mut provider = MockProvider::new("[]");
/// provider.add_response("user text", "[{\"type\":\"tool\"}]");
/// assert_eq!(provider.complete("sys", "user text").unwrap(), "[{\"type\":\"tool\"}]");
/// assert_eq!(provider.complete("sys", "other").unwrap(), "[]");
/// assert_eq!(provider.call_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    name: String,
    default_response: String,
    responses: Arc<Mutex<HashMap<String, String>>>,
    always_fail: bool,
    call_count: Arc<Mutex<usize>>,
}

impl MockProvider {
    /// Create a new MockProvider with a fixed response for all prompts
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            name: "mock".to_string(),
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            always_fail: false,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Create a provider that fails every call with a communication error
    pub fn failing() -> Self {
        let mut provider = Self::new("");
        provider.always_fail = true;
        provider
    }

    /// Set the provider name reported in logs
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add a specific response for a given user message
    pub fn add_response(&mut self, user: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(user.into(), response.into());
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl ChatProvider for MockProvider {
    type Error = LlmError;

    fn name(&self) -> &str {
        &self.name
    }

    fn complete(&self, _system: &str, user: &str) -> Result<String, Self::Error> {
        *self.call_count.lock().unwrap() += 1;

        if self.always_fail {
            return Err(LlmError::Communication("Mock failure".to_string()));
        }

        let responses = self.responses.lock().unwrap();
        if let Some(response) = responses.get(user) {
            return Ok(response.clone());
        }

        Ok(self.default_response.clone())
    }
}
