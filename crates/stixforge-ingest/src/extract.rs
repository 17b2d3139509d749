//! Plain-text extraction from uploaded document bytes

use stixforge_domain::traits::TextExtractor;
use tracing::debug;

/// MIME type for plain text files.
pub const MIME_TEXT: &str = "text/plain";

/// MIME type for JSON files (including pre-built STIX bundles).
pub const MIME_JSON: &str = "application/json";

/// MIME type for PDF files.
pub const MIME_PDF: &str = "application/pdf";

/// MIME type for Word (docx) files.
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// MIME type for legacy Word (doc) files.
pub const MIME_MSWORD: &str = "application/msword";

/// Default text extractor.
///
/// Plain text and JSON pass through; binary document formats yield a
/// placeholder describing why no text is available. Never fails.
#[derive(Debug, Clone, Default)]
pub struct DefaultTextExtractor;

impl DefaultTextExtractor {
    /// Create a new extractor.
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for DefaultTextExtractor {
    fn extract_text(&self, bytes: &[u8], declared_mime: &str) -> String {
        debug!(
            "extracting text from {} bytes declared as '{}'",
            bytes.len(),
            declared_mime
        );
        match declared_mime {
            MIME_TEXT | MIME_JSON => String::from_utf8_lossy(bytes).into_owned(),
            MIME_PDF => {
                "PDF text extraction is not available. The document was stored, \
                 but no text content could be recovered from it."
                    .to_string()
            }
            MIME_DOCX | MIME_MSWORD => {
                "Word document text extraction is not available. The document was \
                 stored, but no text content could be recovered from it."
                    .to_string()
            }
            other => format!(
                "Unsupported file type: {}. Text extraction not available.",
                other
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        let extractor = DefaultTextExtractor::new();
        let text = extractor.extract_text(b"APT-0 deployed Emotet.", MIME_TEXT);
        assert_eq!(text, "APT-0 deployed Emotet.");
    }

    #[test]
    fn test_json_passes_through() {
        let extractor = DefaultTextExtractor::new();
        let text = extractor.extract_text(b"{\"type\":\"bundle\"}", MIME_JSON);
        assert_eq!(text, "{\"type\":\"bundle\"}");
    }

    #[test]
    fn test_invalid_utf8_is_lossy_not_fatal() {
        let extractor = DefaultTextExtractor::new();
        let text = extractor.extract_text(&[0x41, 0xFF, 0x42], MIME_TEXT);
        assert!(text.starts_with('A'));
        assert!(text.ends_with('B'));
    }

    #[test]
    fn test_pdf_yields_placeholder() {
        let extractor = DefaultTextExtractor::new();
        let text = extractor.extract_text(b"%PDF-1.7 ...", MIME_PDF);
        assert!(text.contains("PDF"));
        assert!(text.contains("not available"));
    }

    #[test]
    fn test_docx_yields_placeholder() {
        let extractor = DefaultTextExtractor::new();
        let text = extractor.extract_text(b"PK...", MIME_DOCX);
        assert!(text.contains("Word"));
    }

    #[test]
    fn test_unknown_type_yields_descriptive_placeholder() {
        let extractor = DefaultTextExtractor::new();
        let text = extractor.extract_text(b"GIF89a", "image/gif");
        assert!(text.contains("image/gif"));
        assert!(text.contains("Unsupported"));
    }
}
