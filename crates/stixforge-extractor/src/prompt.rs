//! Extraction prompt templates and composition
//!
//! Templates are static, embedded at compile time, and treated as
//! immutable process-wide configuration. Each one ends with a `Text:`
//! section holding the substitution placeholder.

use serde::{Deserialize, Serialize};

/// Placeholder replaced by the source document text.
pub const TEXT_PLACEHOLDER: &str = "[TEXT_CONTENT]";

const ONE_SHOT_TEMPLATE: &str = include_str!("prompts/one_shot_extraction.txt");
const DEEPSEEK_TEMPLATE: &str = include_str!("prompts/stix_extraction_deepseek.txt");
const GEMINI_TEMPLATE: &str = include_str!("prompts/stix_extraction_gemini.txt");

/// Extraction instruction flavor: one provider-agnostic template plus
/// model-tuned variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromptFlavor {
    /// Provider-agnostic instructions, the default for both backends
    OneShot,
    /// Variant tuned for DeepSeek-family models
    DeepSeek,
    /// Variant tuned for Gemini-family models
    Gemini,
}

impl Default for PromptFlavor {
    fn default() -> Self {
        PromptFlavor::OneShot
    }
}

impl PromptFlavor {
    /// The raw instruction template for this flavor.
    pub fn template(&self) -> &'static str {
        match self {
            PromptFlavor::OneShot => ONE_SHOT_TEMPLATE,
            PromptFlavor::DeepSeek => DEEPSEEK_TEMPLATE,
            PromptFlavor::Gemini => GEMINI_TEMPLATE,
        }
    }
}

/// Render the full single-prompt form: the template with the source text
/// substituted into its placeholder.
pub fn render(flavor: PromptFlavor, text: &str) -> String {
    flavor.template().replace(TEXT_PLACEHOLDER, text)
}

/// Compose the system/user message pair for a chat-completion call: the
/// instructions (everything before the `Text:` section) as the system
/// message, the document as the user payload.
pub fn messages(flavor: PromptFlavor, text: &str) -> (String, String) {
    let template = flavor.template();
    let system = template
        .split(TEXT_PLACEHOLDER)
        .next()
        .unwrap_or(template)
        .trim_end()
        .trim_end_matches("Text:")
        .trim_end()
        .to_string();
    let user = format!("Text:\n{}", text);
    (system, user)
}
