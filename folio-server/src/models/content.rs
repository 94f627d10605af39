//! The `Content` trait and the record envelope returned to clients

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use uuid::Uuid;

use super::{Collection, ValidationError};

/// A content type stored as documents in one collection.
pub trait Content: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Collection holding documents of this type
    const COLLECTION: Collection;

    /// Human-readable resource name for error messages
    const RESOURCE: &'static str;

    /// Check required fields and limits.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Canonicalize fields before validation (trim, lowercase, defaults).
    fn normalize(&mut self) {}

    /// Field that must be unique within the collection, with this value.
    fn unique_key(&self) -> Option<(&'static str, String)> {
        None
    }

    /// Whether non-admin readers may see this document.
    fn is_public(&self) -> bool {
        true
    }

    /// Explicit display position; lower sorts first.
    fn position(&self) -> Option<i32> {
        None
    }
}

/// A stored document decoded into its content type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record<T> {
    pub id: Uuid,
    #[serde(flatten)]
    pub content: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order records by position (unpositioned last), then newest first.
pub fn sort_records<T: Content>(records: &mut [Record<T>]) {
    records.sort_by(|a, b| {
        let pa = a.content.position().unwrap_or(i32::MAX);
        let pb = b.content.position().unwrap_or(i32::MAX);
        pa.cmp(&pb).then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// Apply a JSON merge patch (RFC 7396) to `target`.
///
/// Object members overwrite, `null` removes, nested objects merge and any
/// non-object patch replaces the target wholesale.
pub fn merge_patch(target: &mut JsonValue, patch: &JsonValue) {
    let JsonValue::Object(patch_map) = patch else {
        *target = patch.clone();
        return;
    };

    if !target.is_object() {
        *target = JsonValue::Object(Map::new());
    }

    if let JsonValue::Object(target_map) = target {
        for (key, value) in patch_map {
            if value.is_null() {
                target_map.remove(key);
            } else {
                merge_patch(target_map.entry(key.clone()).or_insert(JsonValue::Null), value);
            }
        }
    }
}

/// Remove record envelope keys a client may echo back in a body.
pub fn strip_envelope(data: &mut JsonValue) {
    if let JsonValue::Object(map) = data {
        for key in ["id", "created_at", "updated_at"] {
            map.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn merge_patch_overwrites_and_removes() {
        let mut doc = json!({"title": "Old", "tags": ["a"], "meta": {"x": 1, "y": 2}});
        merge_patch(
            &mut doc,
            &json!({"title": "New", "tags": null, "meta": {"y": null, "z": 3}}),
        );
        assert_eq!(doc, json!({"title": "New", "meta": {"x": 1, "z": 3}}));
    }

    #[test]
    fn merge_patch_replaces_arrays() {
        let mut doc = json!({"tags": ["a", "b"]});
        merge_patch(&mut doc, &json!({"tags": ["c"]}));
        assert_eq!(doc, json!({"tags": ["c"]}));
    }

    #[test]
    fn non_object_patch_replaces() {
        let mut doc = json!({"a": 1});
        merge_patch(&mut doc, &json!([1, 2]));
        assert_eq!(doc, json!([1, 2]));
    }

    #[test]
    fn strip_envelope_drops_server_fields() {
        let mut body = json!({"id": "x", "title": "t", "created_at": "c", "updated_at": "u"});
        strip_envelope(&mut body);
        assert_eq!(body, json!({"title": "t"}));
    }
}
