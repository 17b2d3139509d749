//! The STIX bundle envelope

use crate::id;
use crate::object::StixObject;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// The envelope tag every well-formed bundle carries.
pub const BUNDLE_TYPE: &str = "bundle";

/// A STIX bundle: the top-level envelope wrapping a list of objects.
///
/// Bundles are rebuilt wholesale from recovered data — never mutated
/// object-by-object after construction. The `id` is assigned once at
/// creation time. An empty `objects` list represents "no entities found"
/// or "extraction failed" and is a valid terminal state, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StixBundle {
    /// Envelope tag, always `"bundle"`.
    #[serde(rename = "type")]
    pub bundle_type: String,

    /// Bundle id: `bundle--<uuid>`.
    pub id: String,

    /// Ordered sequence of objects; insertion order reflects extraction or
    /// merge order and is stable for reproducibility.
    pub objects: Vec<Value>,
}

impl StixBundle {
    /// Create an empty bundle with a freshly generated id.
    pub fn empty() -> Self {
        Self::with_objects(Vec::new())
    }

    /// Create a bundle wrapping the given objects, with a fresh id.
    pub fn with_objects(objects: Vec<Value>) -> Self {
        Self {
            bundle_type: BUNDLE_TYPE.to_string(),
            id: id::bundle_id(),
            objects,
        }
    }

    /// Whether the bundle holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Number of objects in the bundle.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Count objects by type, sorted by descending count.
    ///
    /// Entries without a usable `type` field are tallied under `unknown`.
    pub fn type_summary(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for value in &self.objects {
            let object_type = StixObject::from_value(value)
                .as_ref()
                .and_then(|o| o.object_type().map(str::to_string))
                .unwrap_or_else(|| crate::object::UNKNOWN_TYPE.to_string());
            *counts.entry(object_type).or_insert(0) += 1;
        }
        let mut summary: Vec<_> = counts.into_iter().collect();
        summary.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_bundle_shape() {
        let bundle = StixBundle::empty();
        assert_eq!(bundle.bundle_type, "bundle");
        assert!(bundle.id.starts_with("bundle--"));
        assert!(bundle.is_empty());
        assert_eq!(bundle.object_count(), 0);
    }

    #[test]
    fn test_fresh_ids_per_bundle() {
        assert_ne!(StixBundle::empty().id, StixBundle::empty().id);
    }

    #[test]
    fn test_type_summary_counts_and_order() {
        let bundle = StixBundle::with_objects(vec![
            json!({"type": "malware", "id": "malware--aaa111111111"}),
            json!({"type": "malware", "id": "malware--bbb222222222"}),
            json!({"type": "tool", "id": "tool--ccc333333333"}),
            json!("not an object"),
        ]);
        let summary = bundle.type_summary();
        assert_eq!(
            summary,
            vec![
                ("malware".to_string(), 2),
                ("tool".to_string(), 1),
                ("unknown".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_serialization_uses_type_key() {
        let bundle = StixBundle::empty();
        let value = serde_json::to_value(&bundle).unwrap();
        assert_eq!(value["type"], "bundle");
        assert!(value["objects"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_round_trip() {
        let bundle = StixBundle::with_objects(vec![json!({
            "type": "threat-actor",
            "id": "threat-actor--abc123456789",
            "name": "APT-0"
        })]);
        let text = serde_json::to_string(&bundle).unwrap();
        let parsed: StixBundle = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, bundle);
    }
}
