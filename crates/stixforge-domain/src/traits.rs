//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the extraction core and
//! infrastructure. Implementations live in other crates.

use crate::DocumentRecord;

/// Trait for remote LLM chat-completion providers.
///
/// Implemented by the infrastructure layer (stixforge-llm).
pub trait ChatProvider {
    /// Error type for provider operations
    type Error;

    /// Provider name, used for logging and status reports.
    fn name(&self) -> &str;

    /// Send a system/user message pair and return the raw completion text.
    ///
    /// A single blocking network round-trip; the underlying transport's
    /// request timeout is the only timeout applied.
    fn complete(&self, system: &str, user: &str) -> Result<String, Self::Error>;
}

/// Trait for keyed blob storage with URL-addressable retrieval.
///
/// Keys are hierarchical strings (e.g. `documents/{user}/stix/{id}.json`).
/// Overwriting an existing key must be supported.
pub trait ObjectStore {
    /// Error type for store operations
    type Error;

    /// Store content under a key and return its public URL.
    fn put(&self, key: &str, content: &[u8], content_type: &str) -> Result<String, Self::Error>;

    /// Retrieve content previously stored, by its public URL.
    fn get(&self, url: &str) -> Result<Vec<u8>, Self::Error>;
}

/// Trait for persisted document records.
pub trait DocumentStore {
    /// Error type for record operations
    type Error;

    /// Insert a new document record.
    fn insert_document(&mut self, record: DocumentRecord) -> Result<(), Self::Error>;

    /// Get a document record by id.
    fn get_document(&self, id: &str) -> Result<Option<DocumentRecord>, Self::Error>;

    /// List all document records, newest first.
    fn list_documents(&self) -> Result<Vec<DocumentRecord>, Self::Error>;

    /// Attach a STIX bundle URL to a document after extraction.
    fn attach_bundle_url(&mut self, id: &str, url: &str) -> Result<(), Self::Error>;
}

/// Trait for document text extraction.
///
/// Total by contract: unsupported or unreadable content yields a
/// descriptive placeholder string, never an error. Downstream treats any
/// string (including a placeholder) as valid input text.
pub trait TextExtractor {
    /// Extract plain text from document bytes, given the declared MIME type.
    fn extract_text(&self, bytes: &[u8], declared_mime: &str) -> String;
}

/// Lifecycle stages of one extraction run, as reported to a [`StatusSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    /// The primary provider is being called.
    CallingPrimary,
    /// The primary provider produced nothing usable; falling back.
    PrimaryEmpty,
    /// The secondary provider is being called.
    CallingSecondary,
    /// The run finished with the given number of extracted objects.
    Completed {
        /// Objects in the final bundle (zero when all providers failed).
        object_count: usize,
    },
}

/// Where extraction progress reports go.
///
/// The pipeline itself stays stateless: job tracking is owned by the
/// request-handling layer, which injects a sink and keeps whatever keyed
/// store it wants behind it.
pub trait StatusSink: Send + Sync {
    /// Record a status transition for the given document.
    fn report(&self, document_id: &str, status: JobStatus);
}

/// No-op sink for callers that do not track progress.
impl StatusSink for () {
    fn report(&self, _document_id: &str, _status: JobStatus) {}
}
