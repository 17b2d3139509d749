//! STIX bundle persistence

use stixforge_domain::traits::ObjectStore;
use stixforge_domain::StixBundle;
use tracing::info;

/// Storage key for a document's STIX bundle, scoped by user and document.
pub fn stix_bundle_key(user_id: &str, document_id: &str) -> String {
    format!("documents/{}/stix/{}.json", user_id, document_id)
}

/// Persist a bundle as 2-space-indented UTF-8 JSON and return its URL.
///
/// Writing the same document twice overwrites the previous bundle, so
/// re-extraction replaces rather than accumulates.
pub fn persist_bundle<S>(
    store: &S,
    bundle: &StixBundle,
    user_id: &str,
    document_id: &str,
) -> Result<String, S::Error>
where
    S: ObjectStore,
    S::Error: From<serde_json::Error>,
{
    let content = serde_json::to_string_pretty(bundle)?;
    let key = stix_bundle_key(user_id, document_id);
    let url = store.put(&key, content.as_bytes(), "application/json")?;
    info!(
        "persisted bundle {} ({} objects) at '{}'",
        bundle.id,
        bundle.object_count(),
        key
    );
    Ok(url)
}
