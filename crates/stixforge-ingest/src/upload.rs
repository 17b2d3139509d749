//! Upload flow: store the original document and its extracted text

use stixforge_domain::traits::{ObjectStore, TextExtractor};
use tracing::info;

/// URLs and size of a stored document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    /// URL of the original file blob.
    pub original_url: String,
    /// URL of the extracted plain-text blob.
    pub text_url: String,
    /// Size of the original file in bytes.
    pub file_size: usize,
}

/// Store a document's original bytes and its extracted text.
///
/// The original lands at `documents/{user}/{file_name}`, the text at
/// `documents/{user}/text/{stem}.txt`. Re-uploading the same file name
/// overwrites both blobs.
pub fn upload_document_with_text<S, E>(
    store: &S,
    extractor: &E,
    bytes: &[u8],
    file_name: &str,
    file_type: &str,
    user_id: &str,
) -> Result<UploadedDocument, S::Error>
where
    S: ObjectStore,
    E: TextExtractor,
{
    let original_key = format!("documents/{}/{}", user_id, file_name);
    let original_url = store.put(&original_key, bytes, file_type)?;

    let text = extractor.extract_text(bytes, file_type);

    let stem = file_name.split('.').next().unwrap_or(file_name);
    let text_key = format!("documents/{}/text/{}.txt", user_id, stem);
    let text_url = store.put(&text_key, text.as_bytes(), "text/plain")?;

    info!(
        "uploaded '{}' ({} bytes, {}) with {} chars of extracted text",
        file_name,
        bytes.len(),
        file_type,
        text.len()
    );

    Ok(UploadedDocument {
        original_url,
        text_url,
        file_size: bytes.len(),
    })
}
