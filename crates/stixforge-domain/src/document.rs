//! Document records - file metadata plus pointers to stored artifacts

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// A persisted document record.
///
/// One row per uploaded document: file metadata, the URL of the extracted
/// text blob, and (once extraction has run) the URL of the STIX bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Unique document identifier.
    pub id: String,

    /// Original file name as uploaded.
    pub file_name: String,

    /// Declared MIME type of the uploaded file.
    pub file_type: String,

    /// URL of the extracted plain-text blob.
    pub text_url: String,

    /// URL of the persisted STIX bundle, attached after extraction.
    pub stix_bundle_url: Option<String>,

    /// Creation timestamp (seconds since Unix epoch).
    pub created_at: u64,
}

impl DocumentRecord {
    /// Create a new record with a generated id and the current timestamp.
    pub fn new(
        file_name: impl Into<String>,
        file_type: impl Into<String>,
        text_url: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            file_name: file_name.into(),
            file_type: file_type.into(),
            text_url: text_url.into(),
            stix_bundle_url: None,
            created_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        }
    }
}
