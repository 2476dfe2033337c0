use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::schema::{ObjectClass, SchemaKey};
use crate::value::AttributeValue;

/// A full point-in-time view of one management object's attributes, either
/// its properties or its statistics.
///
/// The broker client library delivers complete snapshots rather than diffs,
/// so a snapshot is built once from an update event and never mutated; a
/// later update for the same object replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSnapshot {
    schema: SchemaKey,
    attributes: BTreeMap<String, AttributeValue>,
}

impl ObjectSnapshot {
    pub fn new(schema: SchemaKey, attributes: BTreeMap<String, AttributeValue>) -> Self {
        ObjectSnapshot { schema, attributes }
    }

    pub fn schema(&self) -> &SchemaKey {
        &self.schema
    }

    pub fn object_class(&self) -> ObjectClass {
        self.schema.object_class()
    }

    /// Look up one attribute by name. Absence is a normal outcome: optional
    /// statistics may simply not be populated by this broker version.
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The object's display name from its `name` attribute, optionally
    /// falling back to `nodeName` (system objects carry the latter).
    pub fn name(&self, allow_node_name: bool) -> Option<String> {
        let value = match self.attributes.get("name") {
            Some(value) => Some(value),
            None if allow_node_name => self.attributes.get("nodeName"),
            None => None,
        };
        value.map(|v| v.to_string())
    }

    /// Human-readable description for log lines: `class 'name'`.
    pub fn describe(&self) -> String {
        format!(
            "{} '{}'",
            self.schema.class,
            self.name(true).unwrap_or_default()
        )
    }
}
