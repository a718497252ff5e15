//! Schemaless document representation.
//!
//! Documents arrive from the store as loosely-typed JSON objects. The store
//! layer keeps them that way; typed views live in the pipeline crates and
//! every reader resolves missing or mistyped fields explicitly.

use serde_json::{Map, Value};

use sentryx_common::Stage;

/// Identity key inside a serialized document.
pub const ID_FIELD: &str = "_id";
/// Field holding the original post text.
pub const TEXT_FIELD: &str = "text";

/// A stored document: an opaque identity plus its field map.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), fields: Map::new() }
    }

    /// Builder-style field setter.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Build from a JSON object, taking the identity from `_id` (or `id`).
    ///
    /// A missing identity yields an empty `id`; callers decide whether that
    /// is fatal. Returns `None` when `value` is not an object.
    pub fn from_json(value: Value) -> Option<Self> {
        let Value::Object(mut fields) = value else {
            return None;
        };
        let id = fields
            .remove(ID_FIELD)
            .or_else(|| fields.remove("id"))
            .and_then(|v| identity_string(&v))
            .unwrap_or_default();
        Some(Self { id, fields })
    }

    /// Serialize back to a JSON object with `_id` set.
    pub fn to_json(&self) -> Value {
        let mut map = self.fields.clone();
        map.insert(ID_FIELD.to_string(), Value::String(self.id.clone()));
        Value::Object(map)
    }

    pub fn has_identity(&self) -> bool {
        !self.id.trim().is_empty()
    }

    /// Look up a dotted path such as `enrichment.language.code`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.fields.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    /// Stage flag; an absent or non-boolean flag counts as false.
    pub fn flag(&self, stage: Stage) -> bool {
        matches!(self.fields.get(stage.flag_field()), Some(Value::Bool(true)))
    }

    /// Raw text when it is stored as a string.
    pub fn raw_text(&self) -> Option<&str> {
        self.fields.get(TEXT_FIELD).and_then(Value::as_str)
    }

    /// The raw text field whatever its JSON type.
    pub fn raw_text_value(&self) -> Option<&Value> {
        self.fields.get(TEXT_FIELD)
    }
}

fn identity_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        // Extended-JSON object ids: {"$oid": "..."}
        Value::Object(map) => map.get("$oid").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Partial replacement of top-level fields: keys in `unset` are removed,
/// then `set` is merged. Applied atomically per document by every store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldUpdate {
    pub set: Map<String, Value>,
    pub unset: Vec<String>,
}

impl FieldUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.set.insert(key.to_string(), value.into());
        self
    }

    pub fn unset(mut self, key: &str) -> Self {
        self.unset.push(key.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.unset.is_empty()
    }

    /// Apply to a field map. Returns true if the map changed.
    pub fn apply(&self, fields: &mut Map<String, Value>) -> bool {
        let mut changed = false;
        for key in &self.unset {
            changed |= fields.remove(key).is_some();
        }
        for (key, value) in &self.set {
            if fields.get(key) != Some(value) {
                fields.insert(key.clone(), value.clone());
                changed = true;
            }
        }
        changed
    }

    /// Update that clears `stage` (flag false, derived fields removed).
    pub fn reset(stage: Stage) -> Self {
        let mut update = FieldUpdate::new().set(stage.flag_field(), false);
        for field in stage.derived_fields() {
            update = update.unset(field);
        }
        update
    }
}
