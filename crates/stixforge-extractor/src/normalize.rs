//! Bundle normalization: any recovered shape becomes a well-formed bundle

use serde_json::{Map, Value};
use stixforge_domain::bundle::BUNDLE_TYPE;
use stixforge_domain::object::UNKNOWN_TYPE;
use stixforge_domain::{id, StixBundle, StixObject};
use tracing::{debug, warn};

/// Envelope tag observed in the wild from one backend; treated as a typo
/// for `"bundle"` and normalized away.
const BUNDLE_TYPE_TYPO: &str = "bundle-back";

/// Normalize recovered data into a well-formed [`StixBundle`]. Never fails.
///
/// Policy, in priority order:
///
/// 1. An object tagged `"bundle"` with an `objects` array is used as the
///    base bundle; a missing id gets a freshly generated one.
/// 2. A bare array is wrapped verbatim as the `objects` of a new bundle.
/// 3. Anything else (including recovery failure) yields an empty bundle.
///
/// Afterwards every object whose id is missing or malformed receives a
/// fresh `<type>--<uuid>`; well-formed ids are left untouched, so
/// re-normalizing a normalized bundle is a no-op.
pub fn normalize_bundle(recovered: Option<Value>) -> StixBundle {
    let mut bundle = match recovered {
        Some(Value::Object(map)) if is_bundle_envelope(&map) => from_envelope(map),
        Some(Value::Array(objects)) => {
            debug!("wrapping bare array of {} objects into a bundle", objects.len());
            StixBundle::with_objects(objects)
        }
        Some(other) => {
            warn!(
                "unexpected response shape ({}), producing empty bundle",
                shape_name(&other)
            );
            StixBundle::empty()
        }
        None => StixBundle::empty(),
    };

    assign_ids(&mut bundle.objects);
    check_relationships(&bundle.objects);
    bundle
}

fn is_bundle_envelope(map: &Map<String, Value>) -> bool {
    let tagged = matches!(
        map.get("type").and_then(Value::as_str),
        Some(BUNDLE_TYPE) | Some(BUNDLE_TYPE_TYPO)
    );
    tagged && map.get("objects").map(Value::is_array).unwrap_or(false)
}

fn from_envelope(mut map: Map<String, Value>) -> StixBundle {
    let objects = match map.remove("objects") {
        Some(Value::Array(objects)) => objects,
        _ => Vec::new(),
    };
    let id = match map.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => id::bundle_id(),
    };
    debug!("response is already a bundle with {} objects", objects.len());
    StixBundle {
        bundle_type: BUNDLE_TYPE.to_string(),
        id,
        objects,
    }
}

/// Assign fresh ids to objects that lack a well-formed one.
///
/// Only the `id` field is ever touched; all other fields pass through
/// unchanged. Non-object entries are left exactly as they arrived.
fn assign_ids(objects: &mut [Value]) {
    for value in objects.iter_mut() {
        let Some(map) = value.as_object_mut() else {
            continue;
        };

        let well_formed = map
            .get("id")
            .and_then(Value::as_str)
            .map(id::is_well_formed)
            .unwrap_or(false);
        if well_formed {
            continue;
        }

        let object_type = map
            .get("type")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .unwrap_or(UNKNOWN_TYPE)
            .to_string();
        map.insert(
            "id".to_string(),
            Value::String(id::object_id(&object_type)),
        );
    }
}

/// Opportunistic validation of relationship records: warn about missing
/// reference fields, never reject. Partial data is still useful data.
fn check_relationships(objects: &[Value]) {
    for value in objects {
        let Some(object) = StixObject::from_value(value) else {
            continue;
        };
        if object.is_relationship() && object.relationship_refs().is_none() {
            warn!(
                "relationship {} is missing relationship_type/source_ref/target_ref",
                object.id().unwrap_or("<no id>")
            );
        }
    }
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
