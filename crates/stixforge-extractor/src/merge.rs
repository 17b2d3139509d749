//! Multi-source bundle reconciliation

use serde_json::Value;
use std::collections::HashSet;
use stixforge_domain::StixBundle;
use tracing::info;

/// Merge candidate bundles into one, deduplicating objects by id.
///
/// Bundles are walked in input order and the first occurrence of each id
/// wins; earlier (primary-provider) extractions take precedence over later
/// (fallback) ones, which keeps merges reproducible. Objects without an id
/// are dropped — without one there is nothing to deduplicate on.
///
/// The result is a new bundle with a fresh id; the inputs are read-only.
pub fn merge_bundles(bundles: &[StixBundle]) -> StixBundle {
    let mut seen: HashSet<String> = HashSet::new();
    let mut merged: Vec<Value> = Vec::new();

    for bundle in bundles {
        for object in &bundle.objects {
            let Some(object_id) = object.get("id").and_then(Value::as_str) else {
                continue;
            };
            if seen.insert(object_id.to_string()) {
                merged.push(object.clone());
            }
        }
    }

    info!(
        "merged {} bundles into one with {} unique objects",
        bundles.len(),
        merged.len()
    );
    StixBundle::with_objects(merged)
}
