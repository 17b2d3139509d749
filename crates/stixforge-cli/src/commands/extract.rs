//! The extract command: upload a document, run the pipeline, persist the
//! bundle, and attach it to the document record.

use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::jobs::InMemoryJobTracker;
use crate::output::Formatter;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use stixforge_domain::traits::{DocumentStore, ObjectStore};
use stixforge_domain::DocumentRecord;
use stixforge_extractor::StixPipeline;
use stixforge_ingest::{
    upload_document_with_text, DefaultTextExtractor, MIME_DOCX, MIME_JSON, MIME_MSWORD, MIME_PDF,
    MIME_TEXT,
};
use stixforge_llm::{GeminiProvider, OpenRouterProvider};
use stixforge_store::{persist_bundle, FsBlobStore, SqliteDocumentStore};

/// Run the full upload-and-extract flow for one document.
pub async fn execute_extract(
    args: ExtractArgs,
    config: &Config,
    data_dir: PathBuf,
    formatter: &Formatter,
) -> Result<()> {
    let bytes = fs::read(&args.path)?;
    let file_name = args
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::InvalidInput(format!("unusable path: {}", args.path.display())))?
        .to_string();
    let mime = args
        .mime
        .clone()
        .unwrap_or_else(|| guess_mime(&args.path).to_string());

    let blobs = FsBlobStore::new(data_dir.join("blobs"))?;
    let mut records = SqliteDocumentStore::new(data_dir.join("documents.db"))?;

    // Upload original + extracted text, then register the record.
    let uploaded = upload_document_with_text(
        &blobs,
        &DefaultTextExtractor::new(),
        &bytes,
        &file_name,
        &mime,
        &args.user,
    )?;
    let record = DocumentRecord::new(&file_name, &mime, &uploaded.text_url);
    let document_id = record.id.clone();
    records.insert_document(record)?;

    let text = String::from_utf8_lossy(&blobs.get(&uploaded.text_url)?).into_owned();

    // Both providers read their credentials from the environment; a missing
    // key only disables that provider's stage of the fallback chain.
    let pipeline_cfg = &config.pipeline;
    let tracker = Arc::new(InMemoryJobTracker::new());
    let pipeline = StixPipeline::new(
        OpenRouterProvider::from_env()
            .with_timeout(pipeline_cfg.request_timeout_secs)
            .with_max_retries(pipeline_cfg.max_retries)
            .with_generation(pipeline_cfg.temperature, pipeline_cfg.max_completion_tokens),
        GeminiProvider::from_env()
            .with_timeout(pipeline_cfg.request_timeout_secs)
            .with_max_retries(pipeline_cfg.max_retries)
            .with_generation(pipeline_cfg.temperature, pipeline_cfg.max_completion_tokens),
        pipeline_cfg.clone(),
    )
    .with_status_sink(tracker.clone());

    let bundle = pipeline.extract_bundle(&text, &document_id).await;

    let bundle_url = persist_bundle(&blobs, &bundle, &args.user, &document_id)?;
    records.attach_bundle_url(&document_id, &bundle_url)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&bundle)?);
        return Ok(());
    }

    println!(
        "{}",
        formatter.success(&format!("document {} ingested", document_id))
    );
    if bundle.is_empty() {
        println!(
            "{}",
            formatter.warning("no entities extracted (empty bundle stored)")
        );
    }
    println!("{}", formatter.format_bundle_summary(&bundle));
    println!("bundle stored at {}", bundle_url);
    Ok(())
}

/// Guess the declared MIME type from the file extension.
fn guess_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("pdf") => MIME_PDF,
        Some("docx") => MIME_DOCX,
        Some("doc") => MIME_MSWORD,
        Some("json") => MIME_JSON,
        _ => MIME_TEXT,
    }
}
