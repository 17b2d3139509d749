//! Blob store implementations: filesystem-backed and in-memory

use crate::StoreError;
use std::collections::HashMap;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use stixforge_domain::traits::ObjectStore;
use tracing::debug;

/// URL scheme used by [`FsBlobStore`].
const FILE_SCHEME: &str = "file://";

/// URL scheme used by [`MemoryBlobStore`].
const MEMORY_SCHEME: &str = "memory://";

/// Filesystem-backed blob store.
///
/// Hierarchical keys map to paths under a root directory; `put` overwrites
/// existing keys, so re-extraction is idempotent. Returned URLs use the
/// `file://` scheme and resolve back through `get`.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create a store rooted at the given directory, creating it if needed.
    pub fn new<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Resolve a key to a path, rejecting traversal outside the root.
    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(key);
        let traversal = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if key.is_empty() || traversal {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl ObjectStore for FsBlobStore {
    type Error = StoreError;

    fn put(&self, key: &str, content: &[u8], content_type: &str) -> Result<String, Self::Error> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        debug!(
            "stored {} bytes at '{}' ({})",
            content.len(),
            key,
            content_type
        );
        Ok(format!("{}{}", FILE_SCHEME, path.display()))
    }

    fn get(&self, url: &str) -> Result<Vec<u8>, Self::Error> {
        let path = url
            .strip_prefix(FILE_SCHEME)
            .ok_or_else(|| StoreError::InvalidUrl(url.to_string()))?;
        fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StoreError::NotFound(url.to_string()),
            _ => StoreError::Io(e),
        })
    }
}

/// In-memory blob store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryBlobStore {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether the store holds no blobs.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ObjectStore for MemoryBlobStore {
    type Error = StoreError;

    fn put(&self, key: &str, content: &[u8], _content_type: &str) -> Result<String, Self::Error> {
        if key.is_empty() {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), content.to_vec());
        Ok(format!("{}{}", MEMORY_SCHEME, key))
    }

    fn get(&self, url: &str) -> Result<Vec<u8>, Self::Error> {
        let key = url
            .strip_prefix(MEMORY_SCHEME)
            .ok_or_else(|| StoreError::InvalidUrl(url.to_string()))?;
        self.entries
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fs_put_get_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(dir.path()).unwrap();

        let url = store
            .put("documents/alice/report.txt", b"hello", "text/plain")
            .unwrap();
        assert!(url.starts_with("file://"));
        assert_eq!(store.get(&url).unwrap(), b"hello");
    }

    #[test]
    fn test_fs_hierarchical_keys_create_directories() {
        let dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(dir.path()).unwrap();

        let url = store
            .put("documents/alice/stix/doc-1.json", b"{}", "application/json")
            .unwrap();
        assert_eq!(store.get(&url).unwrap(), b"{}");
    }

    #[test]
    fn test_fs_overwrite_is_supported() {
        let dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(dir.path()).unwrap();

        let first = store.put("k.json", b"v1", "application/json").unwrap();
        let second = store.put("k.json", b"v2", "application/json").unwrap();

        assert_eq!(first, second);
        assert_eq!(store.get(&second).unwrap(), b"v2");
    }

    #[test]
    fn test_fs_rejects_traversal_keys() {
        let dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(dir.path()).unwrap();

        assert!(matches!(
            store.put("../escape.txt", b"x", "text/plain"),
            Err(StoreError::InvalidKey(_))
        ));
        assert!(matches!(
            store.put("", b"x", "text/plain"),
            Err(StoreError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_fs_missing_blob_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(dir.path()).unwrap();

        let url = format!("file://{}/missing.txt", dir.path().display());
        assert!(matches!(store.get(&url), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_memory_round_trip_and_overwrite() {
        let store = MemoryBlobStore::new();

        let url = store.put("a/b/c.json", b"one", "application/json").unwrap();
        assert_eq!(url, "memory://a/b/c.json");
        assert_eq!(store.get(&url).unwrap(), b"one");

        store.put("a/b/c.json", b"two", "application/json").unwrap();
        assert_eq!(store.get(&url).unwrap(), b"two");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_memory_wrong_scheme_rejected() {
        let store = MemoryBlobStore::new();
        assert!(matches!(
            store.get("file:///tmp/x"),
            Err(StoreError::InvalidUrl(_))
        ));
    }
}
