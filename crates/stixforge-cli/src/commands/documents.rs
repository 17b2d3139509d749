//! The documents command: list ingested documents.

use crate::error::Result;
use crate::output::Formatter;
use std::path::PathBuf;
use stixforge_domain::traits::DocumentStore;
use stixforge_store::SqliteDocumentStore;

/// List all document records, newest first.
pub fn execute_documents(data_dir: PathBuf, formatter: &Formatter) -> Result<()> {
    let store = SqliteDocumentStore::new(data_dir.join("documents.db"))?;
    let records = store.list_documents()?;
    println!("{}", formatter.format_documents(&records));
    Ok(())
}
