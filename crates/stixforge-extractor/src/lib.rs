//! Stixforge Extractor
//!
//! Converts unreliable LLM completions into well-formed STIX bundles.
//!
//! # Overview
//!
//! An external LLM asked to extract threat-intelligence entities returns
//! free-form text: the JSON payload may be wrapped in markdown, truncated,
//! malformed, or structurally inconsistent. This crate repairs or salvages
//! what it can, reconciles identifiers, and always produces an internally
//! consistent bundle — falling back to a second provider when the first
//! yields nothing, and to an empty bundle when both fail.
//!
//! # Architecture
//!
//! ```text
//! Text → Prompt → Provider → Sanitizer → Recovery → Normalizer → StixBundle
//!                     │                                              ▲
//!                     └── empty or error → fallback provider ────────┘
//! ```
//!
//! # Key Features
//!
//! - **Sanitization**: strips markdown fencing, locates the JSON payload
//! - **Recovery**: bracket-balance repair and brace-depth fragment salvage
//! - **Normalization**: id assignment and envelope repair, idempotent
//! - **Fallback**: two fixed provider stages, errors treated as empty
//! - **Merge**: first-seen-wins reconciliation across extraction attempts
//!
//! # Example Usage
//!
//! ```no_run
//! use stixforge_extractor::{PipelineConfig, StixPipeline};
//! use stixforge_llm::{GeminiProvider, OpenRouterProvider};
//!
//! # async fn example() {
//! let pipeline = StixPipeline::new(
//!     OpenRouterProvider::from_env(),
//!     GeminiProvider::from_env(),
//!     PipelineConfig::default(),
//! );
//!
//! let bundle = pipeline
//!     .extract_bundle("APT-0 deployed Emotet against banks.", "report.txt")
//!     .await;
//!
//! println!("extracted {} objects", bundle.object_count());
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod config;
mod prompt;
mod sanitize;
mod recover;
mod normalize;
mod merge;
mod pipeline;

#[cfg(test)]
mod tests;

pub use config::PipelineConfig;
pub use error::ExtractionError;
pub use merge::merge_bundles;
pub use normalize::normalize_bundle;
pub use pipeline::StixPipeline;
pub use prompt::{messages, render, PromptFlavor, TEXT_PLACEHOLDER};
pub use recover::recover_json;
pub use sanitize::sanitize_response;
