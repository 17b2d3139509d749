//! Stixforge Storage Layer
//!
//! Implements the `ObjectStore` and `DocumentStore` traits: keyed blob
//! storage with URL-addressable retrieval (filesystem-backed, plus an
//! in-memory variant for tests) and SQLite-backed document records.
//!
//! # Examples
//!
//! ```no_run
//! use stixforge_store::SqliteDocumentStore;
//!
//! let store = SqliteDocumentStore::new(":memory:").unwrap();
//! // Store is now ready for document record operations
//! ```

#![warn(missing_docs)]

mod blob;
mod bundle;
mod records;

use thiserror::Error;

pub use blob::{FsBlobStore, MemoryBlobStore};
pub use bundle::{persist_bundle, stix_bundle_key};
pub use records::SqliteDocumentStore;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Key contains path traversal or other forbidden segments
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// URL does not belong to this store
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Blob or record not found
    #[error("Not found: {0}")]
    NotFound(String),
}
