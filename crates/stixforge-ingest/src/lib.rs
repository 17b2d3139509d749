//! Stixforge Ingest
//!
//! Document intake: plain-text extraction from uploaded bytes and the
//! upload flow that stores the original file alongside its extracted text.
//!
//! Text extraction is total by contract — unsupported formats produce a
//! descriptive placeholder string, never an error. The extraction core
//! treats any string, placeholders included, as valid input text.

#![warn(missing_docs)]

mod extract;
mod upload;

pub use extract::{DefaultTextExtractor, MIME_DOCX, MIME_JSON, MIME_MSWORD, MIME_PDF, MIME_TEXT};
pub use upload::{upload_document_with_text, UploadedDocument};
