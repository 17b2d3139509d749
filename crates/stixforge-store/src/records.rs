//! SQLite-backed document records

use crate::StoreError;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use stixforge_domain::traits::DocumentStore;
use stixforge_domain::DocumentRecord;

/// SQLite-based implementation of `DocumentStore`
///
/// One row per uploaded document: file metadata, the extracted-text URL,
/// and the STIX bundle URL once extraction has run.
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own
/// store instance.
pub struct SqliteDocumentStore {
    conn: Connection,
}

impl SqliteDocumentStore {
    /// Create a new store with the given database path.
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentRecord> {
        Ok(DocumentRecord {
            id: row.get(0)?,
            file_name: row.get(1)?,
            file_type: row.get(2)?,
            text_url: row.get(3)?,
            stix_bundle_url: row.get(4)?,
            created_at: row.get::<_, i64>(5)? as u64,
        })
    }
}

impl DocumentStore for SqliteDocumentStore {
    type Error = StoreError;

    fn insert_document(&mut self, record: DocumentRecord) -> Result<(), Self::Error> {
        self.conn.execute(
            "INSERT INTO documents (id, file_name, file_type, text_url, stix_bundle_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &record.id,
                &record.file_name,
                &record.file_type,
                &record.text_url,
                &record.stix_bundle_url,
                record.created_at as i64,
            ],
        )?;
        Ok(())
    }

    fn get_document(&self, id: &str) -> Result<Option<DocumentRecord>, Self::Error> {
        let record = self
            .conn
            .query_row(
                "SELECT id, file_name, file_type, text_url, stix_bundle_url, created_at
                 FROM documents WHERE id = ?1",
                params![id],
                Self::row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    fn list_documents(&self) -> Result<Vec<DocumentRecord>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, file_name, file_type, text_url, stix_bundle_url, created_at
             FROM documents ORDER BY created_at DESC, id",
        )?;
        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn attach_bundle_url(&mut self, id: &str, url: &str) -> Result<(), Self::Error> {
        let updated = self.conn.execute(
            "UPDATE documents SET stix_bundle_url = ?2 WHERE id = ?1",
            params![id, url],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> DocumentRecord {
        DocumentRecord::new(name, "text/plain", format!("memory://text/{}", name))
    }

    #[test]
    fn test_insert_and_get() {
        let mut store = SqliteDocumentStore::new(":memory:").unwrap();
        let original = record("report.txt");
        store.insert_document(original.clone()).unwrap();

        let fetched = store.get_document(&original.id).unwrap().unwrap();
        assert_eq!(fetched, original);
    }

    #[test]
    fn test_get_missing_is_none() {
        let store = SqliteDocumentStore::new(":memory:").unwrap();
        assert!(store.get_document("nope").unwrap().is_none());
    }

    #[test]
    fn test_attach_bundle_url() {
        let mut store = SqliteDocumentStore::new(":memory:").unwrap();
        let original = record("report.txt");
        store.insert_document(original.clone()).unwrap();

        store
            .attach_bundle_url(&original.id, "memory://documents/u/stix/d.json")
            .unwrap();

        let fetched = store.get_document(&original.id).unwrap().unwrap();
        assert_eq!(
            fetched.stix_bundle_url.as_deref(),
            Some("memory://documents/u/stix/d.json")
        );
    }

    #[test]
    fn test_attach_bundle_url_missing_document() {
        let mut store = SqliteDocumentStore::new(":memory:").unwrap();
        assert!(matches!(
            store.attach_bundle_url("missing", "memory://x"),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_newest_first() {
        let mut store = SqliteDocumentStore::new(":memory:").unwrap();
        let mut older = record("older.txt");
        older.created_at = 100;
        let mut newer = record("newer.txt");
        newer.created_at = 200;
        store.insert_document(older).unwrap();
        store.insert_document(newer).unwrap();

        let listed = store.list_documents().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].file_name, "newer.txt");
        assert_eq!(listed[1].file_name, "older.txt");
    }

    #[test]
    fn test_persists_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let db_path = dir.path().join("documents.db");
        let original = record("durable.txt");

        {
            let mut store = SqliteDocumentStore::new(&db_path).unwrap();
            store.insert_document(original.clone()).unwrap();
        }

        let store = SqliteDocumentStore::new(&db_path).unwrap();
        assert_eq!(store.get_document(&original.id).unwrap(), Some(original));
    }
}
