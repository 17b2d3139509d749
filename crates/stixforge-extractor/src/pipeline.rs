//! The fallback extraction pipeline

use crate::config::PipelineConfig;
use crate::error::ExtractionError;
use crate::normalize::normalize_bundle;
use crate::prompt;
use crate::recover::recover_json;
use crate::sanitize::sanitize_response;
use std::fmt::Display;
use std::sync::Arc;
use stixforge_domain::traits::{ChatProvider, JobStatus, StatusSink};
use stixforge_domain::StixBundle;
use tracing::{debug, info, warn};

/// Two-provider extraction pipeline with fallback.
///
/// Each document runs through prompt composition, one blocking provider
/// round-trip, sanitization, JSON recovery, and normalization. If the
/// primary provider errors or yields an empty bundle the same text is
/// retried through the secondary; if both fail the result is a fresh empty
/// bundle. A provider error and an empty result are deliberately treated
/// the same — the distinction only matters for logging, not correctness.
///
/// The pipeline holds no mutable state; every invocation is independent.
pub struct StixPipeline<P, S>
where
    P: ChatProvider,
    S: ChatProvider,
{
    primary: Arc<P>,
    secondary: Arc<S>,
    config: PipelineConfig,
    status: Arc<dyn StatusSink>,
}

impl<P, S> StixPipeline<P, S>
where
    P: ChatProvider + Send + Sync + 'static,
    S: ChatProvider + Send + Sync + 'static,
    P::Error: Display,
    S::Error: Display,
{
    /// Create a new pipeline over a primary and a secondary provider
    pub fn new(primary: P, secondary: S, config: PipelineConfig) -> Self {
        Self {
            primary: Arc::new(primary),
            secondary: Arc::new(secondary),
            config,
            status: Arc::new(()),
        }
    }

    /// Inject a status sink for per-document progress reporting
    pub fn with_status_sink(mut self, sink: Arc<dyn StatusSink>) -> Self {
        self.status = sink;
        self
    }

    /// Extract a STIX bundle from document text.
    ///
    /// Total: the worst-case outcome is a syntactically valid, semantically
    /// empty bundle. Absence of data is represented as data, never as an
    /// error; callers needing to distinguish "no entities" from "both
    /// providers failed" must log at the call site.
    pub async fn extract_bundle(&self, text: &str, label: &str) -> StixBundle {
        info!(
            "starting extraction for '{}' ({} chars)",
            label,
            text.len()
        );

        self.status.report(label, JobStatus::CallingPrimary);
        match self.run_provider(Arc::clone(&self.primary), text).await {
            Ok(bundle) if !bundle.is_empty() => {
                info!(
                    "primary provider extracted {} objects",
                    bundle.object_count()
                );
                self.status.report(
                    label,
                    JobStatus::Completed {
                        object_count: bundle.object_count(),
                    },
                );
                return bundle;
            }
            Ok(_) => {
                info!("primary provider returned an empty bundle, falling back");
            }
            Err(e) => {
                warn!("primary provider failed, falling back: {}", e);
            }
        }
        self.status.report(label, JobStatus::PrimaryEmpty);

        self.status.report(label, JobStatus::CallingSecondary);
        let bundle = match self.run_provider(Arc::clone(&self.secondary), text).await {
            Ok(bundle) => {
                if bundle.is_empty() {
                    info!("secondary provider also returned an empty bundle");
                } else {
                    info!(
                        "secondary provider extracted {} objects",
                        bundle.object_count()
                    );
                }
                bundle
            }
            Err(e) => {
                warn!("secondary provider failed as well: {}", e);
                StixBundle::empty()
            }
        };

        self.status.report(
            label,
            JobStatus::Completed {
                object_count: bundle.object_count(),
            },
        );
        bundle
    }

    /// One provider attempt: compose the prompt, call the provider in a
    /// blocking task, then sanitize, recover, and normalize the completion.
    async fn run_provider<C>(
        &self,
        provider: Arc<C>,
        text: &str,
    ) -> Result<StixBundle, ExtractionError>
    where
        C: ChatProvider + Send + Sync + 'static,
        C::Error: Display,
    {
        let (system, user) = prompt::messages(self.config.flavor, text);
        let provider_name = provider.name().to_string();
        debug!(
            "calling provider '{}' (prompt {} chars)",
            provider_name,
            system.len() + user.len()
        );

        let raw = tokio::task::spawn_blocking(move || {
            provider
                .complete(&system, &user)
                .map_err(|e| ExtractionError::Provider(format!("{}: {}", provider_name, e)))
        })
        .await
        .map_err(|e| ExtractionError::Task(format!("join error: {}", e)))??;

        debug!("raw completion length: {} chars", raw.len());

        let sanitized = sanitize_response(&raw);
        let recovered = recover_json(&sanitized);
        Ok(normalize_bundle(recovered))
    }
}
