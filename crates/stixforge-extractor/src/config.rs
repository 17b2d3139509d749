//! Configuration for the extraction pipeline

use crate::prompt::PromptFlavor;
use serde::{Deserialize, Serialize};

/// Configuration for the extraction pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// HTTP request timeout applied by provider clients (seconds).
    /// This is the only timeout in the call path; callers wanting a
    /// tighter bound apply their own at the boundary.
    pub request_timeout_secs: u64,

    /// Retry attempts per provider call (transport failures only)
    pub max_retries: u32,

    /// Sampling temperature for completions
    pub temperature: f32,

    /// Completion token budget per call
    pub max_completion_tokens: u32,

    /// Instruction template used for both providers
    #[serde(default)]
    pub flavor: PromptFlavor,
}

impl Default for PipelineConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            request_timeout_secs: 60,
            max_retries: 3,
            temperature: 0.1,
            max_completion_tokens: 4000,
            flavor: PromptFlavor::OneShot,
        }
    }
}

impl PipelineConfig {
    /// Fast preset: single attempt, short timeout
    pub fn fast() -> Self {
        Self {
            request_timeout_secs: 30,
            max_retries: 1,
            ..Self::default()
        }
    }

    /// Thorough preset: more retries, larger completion budget
    pub fn thorough() -> Self {
        Self {
            request_timeout_secs: 120,
            max_retries: 5,
            max_completion_tokens: 8000,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be at least 1".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "temperature {} out of range [0.0, 2.0]",
                self.temperature
            ));
        }
        if self.max_completion_tokens == 0 {
            return Err("max_completion_tokens must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
