//! Generic resource model
//!
//! A Resource is a declared unit of configuration: identity, metadata, and an
//! opaque spec payload whose semantics belong to the kind's handler. The
//! reconciler never looks inside the spec beyond structural equality.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

/// Grouping key applied at parse time when a declaration does not name one.
pub const GENERAL_FOLDER: &str = "general";

/// A declared unit of configuration.
///
/// Metadata always contains `name`, the primary identity. It may contain a
/// grouping key (`folder`). The spec is a schema-less ordered document;
/// kind-specific typing lives in the concrete handlers, never here.
///
/// Resources are never mutated in place: every transformation (`with_*`)
/// produces a copy, so the same instance can safely feed both the
/// normalize-then-diff and normalize-then-push paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Schema family, e.g. `obsync.dev/v1alpha1`.
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Kind discriminator used for handler lookup.
    pub kind: String,

    /// Ordered key-value metadata; always contains `name`.
    #[serde(default)]
    pub metadata: Map<String, Value>,

    /// Opaque ordered payload owned by the kind's handler.
    #[serde(default)]
    pub spec: Map<String, Value>,
}

impl Resource {
    /// Create a resource with the given identity and spec payload.
    pub fn new(
        api_version: impl Into<String>,
        kind: impl Into<String>,
        name: impl Into<String>,
        spec: Map<String, Value>,
    ) -> Self {
        let mut metadata = Map::new();
        metadata.insert("name".to_string(), Value::String(name.into()));
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
            metadata,
            spec,
        }
    }

    /// Deserialize a resource from a raw JSON declaration.
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize the resource back to a JSON value.
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// The primary identity, from metadata. Never read from the spec.
    #[must_use]
    pub fn name(&self) -> &str {
        self.metadata
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// The grouping key, falling back to [`GENERAL_FOLDER`] when unset.
    #[must_use]
    pub fn folder(&self) -> &str {
        self.metadata("folder").unwrap_or(GENERAL_FOLDER)
    }

    /// Look up a string metadata field.
    #[must_use]
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    /// Whether a metadata field is present.
    #[must_use]
    pub fn has_metadata(&self, key: &str) -> bool {
        self.metadata.contains_key(key)
    }

    /// Copy of this resource with a metadata field set.
    #[must_use]
    pub fn with_metadata(&self, key: &str, value: impl Into<String>) -> Self {
        let mut copy = self.clone();
        copy.metadata
            .insert(key.to_string(), Value::String(value.into()));
        copy
    }

    /// Look up a string spec field.
    #[must_use]
    pub fn spec_str(&self, key: &str) -> Option<&str> {
        self.spec.get(key).and_then(Value::as_str)
    }

    /// Copy of this resource with a string spec field set.
    #[must_use]
    pub fn with_spec_str(&self, key: &str, value: impl Into<String>) -> Self {
        self.with_spec_value(key, Value::String(value.into()))
    }

    /// Copy of this resource with a spec field set to an arbitrary value.
    #[must_use]
    pub fn with_spec_value(&self, key: &str, value: Value) -> Self {
        let mut copy = self.clone();
        copy.spec.insert(key.to_string(), value);
        copy
    }

    /// Copy of this resource with the given spec fields removed.
    ///
    /// Handlers use this in `unprepare` to strip server-injected fields
    /// before structural comparison.
    #[must_use]
    pub fn without_spec_keys(&self, keys: &[&str]) -> Self {
        let mut copy = self.clone();
        for key in keys {
            copy.spec.remove(*key);
        }
        copy
    }

    /// Copy of this resource with the given metadata fields removed.
    #[must_use]
    pub fn without_metadata_keys(&self, keys: &[&str]) -> Self {
        let mut copy = self.clone();
        for key in keys {
            copy.metadata.remove(*key);
        }
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Resource {
        let spec = match json!({"title": "Home", "tags": ["infra"]}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        Resource::new("obsync.dev/v1alpha1", "Dashboard", "home", spec)
    }

    #[test]
    fn test_name_comes_from_metadata() {
        let resource = sample();
        assert_eq!(resource.name(), "home");

        // Spec content must never influence the identity
        let resource = resource.with_spec_str("uid", "something-else");
        assert_eq!(resource.name(), "home");
    }

    #[test]
    fn test_folder_defaults_to_general() {
        let resource = sample();
        assert_eq!(resource.folder(), GENERAL_FOLDER);

        let resource = resource.with_metadata("folder", "infra");
        assert_eq!(resource.folder(), "infra");
    }

    #[test]
    fn test_with_metadata_does_not_mutate_original() {
        let original = sample();
        let modified = original.with_metadata("folder", "infra");

        assert!(!original.has_metadata("folder"));
        assert_eq!(modified.metadata("folder"), Some("infra"));
    }

    #[test]
    fn test_with_spec_str_does_not_mutate_original() {
        let original = sample();
        let modified = original.with_spec_str("uid", "home");

        assert_eq!(original.spec_str("uid"), None);
        assert_eq!(modified.spec_str("uid"), Some("home"));
    }

    #[test]
    fn test_without_spec_keys() {
        let resource = sample()
            .with_spec_value("id", json!(42))
            .with_spec_value("version", json!(7));

        let stripped = resource.without_spec_keys(&["id", "version"]);
        assert!(!stripped.spec.contains_key("id"));
        assert!(!stripped.spec.contains_key("version"));
        assert_eq!(stripped.spec_str("title"), Some("Home"));

        // Original untouched
        assert!(resource.spec.contains_key("id"));
    }

    #[test]
    fn test_round_trip_preserves_declared_fields() {
        let declaration = json!({
            "apiVersion": "obsync.dev/v1alpha1",
            "kind": "Dashboard",
            "metadata": {"name": "home", "folder": "infra"},
            "spec": {"zebra": 1, "alpha": 2, "title": "Home"}
        });

        let resource = Resource::from_value(declaration.clone()).unwrap();
        let value = resource.to_value().unwrap();
        assert_eq!(value, declaration);

        // Insertion order of spec keys survives the round trip
        let keys: Vec<_> = resource.spec.keys().collect();
        assert_eq!(keys, ["zebra", "alpha", "title"]);
    }

    #[test]
    fn test_missing_metadata_sections_default_empty() {
        let resource =
            Resource::from_value(json!({"apiVersion": "v1", "kind": "Dashboard"})).unwrap();
        assert_eq!(resource.name(), "");
        assert!(resource.spec.is_empty());
    }
}
