//! Open-vocabulary STIX object model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// STIX type tag used by relationship records.
pub const RELATIONSHIP_TYPE: &str = "relationship";

/// Type prefix assigned to objects that carry no usable `type` field.
pub const UNKNOWN_TYPE: &str = "unknown";

/// A single STIX object: a `type` discriminator plus an open map of fields.
///
/// The type vocabulary is open — the upstream LLM may emit "threat-actor",
/// "malware", "attack-pattern", or any other kind — so this is deliberately
/// a thin typed view over a JSON map rather than an enum per entity kind.
/// Known fields are validated opportunistically, never as a hard schema gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StixObject(pub Map<String, Value>);

impl StixObject {
    /// Borrow a typed view of a JSON value, if it is an object.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_object().cloned().map(Self)
    }

    /// The object's id, if present.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// The object's type discriminator, if present and non-empty.
    pub fn object_type(&self) -> Option<&str> {
        self.0
            .get("type")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
    }

    /// The object's display name, if present.
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    /// Whether this object is a relationship record.
    pub fn is_relationship(&self) -> bool {
        self.object_type() == Some(RELATIONSHIP_TYPE)
    }

    /// The relationship triple `(relationship_type, source_ref, target_ref)`
    /// if all three fields are present.
    pub fn relationship_refs(&self) -> Option<(&str, &str, &str)> {
        let relationship_type = self.0.get("relationship_type").and_then(Value::as_str)?;
        let source_ref = self.0.get("source_ref").and_then(Value::as_str)?;
        let target_ref = self.0.get("target_ref").and_then(Value::as_str)?;
        Some((relationship_type, source_ref, target_ref))
    }

    /// Whether the id's type prefix agrees with the `type` field.
    ///
    /// A mismatch is a violation of STIX convention but is tolerated
    /// everywhere in the pipeline; this only exists for diagnostics.
    pub fn id_matches_type(&self) -> bool {
        match (self.id(), self.object_type()) {
            (Some(id), Some(object_type)) => id
                .split_once(crate::id::ID_SEPARATOR)
                .map(|(prefix, _)| prefix == object_type)
                .unwrap_or(false),
            _ => false,
        }
    }
}
