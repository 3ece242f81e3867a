//! Local declaration store
//!
//! Declarations live on disk under the per-kind convention
//! `{pluralDir}/{group}/{prefix}-{name}.{ext}`. Discovery and pathing are
//! owned by each handler; this module just drives the round trip.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use reconcile::{Handler, HandlerRegistry, Resource};
use serde_json::Value;

/// Filesystem store rooted at the resources directory.
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Discover and parse every declared resource, across all kinds.
    ///
    /// Kinds iterate in sorted order and files in path order, so output is
    /// deterministic.
    pub fn load_all(&self, registry: &HandlerRegistry) -> Result<Vec<Resource>> {
        let mut resources = Vec::new();

        for handler in registry.handlers() {
            let files = handler
                .find_resource_files(&self.root)
                .with_context(|| format!("Could not scan for {} declarations", handler.kind()))?;

            for file in files {
                let content = fs::read_to_string(&file)
                    .with_context(|| format!("Could not read {}", file.display()))?;
                let declaration: Value = serde_json::from_str(&content)
                    .with_context(|| format!("Invalid JSON in {}", file.display()))?;
                let parsed = handler
                    .parse(declaration)
                    .with_context(|| format!("Could not parse {}", file.display()))?;

                log::debug!("{}: {} resource(s)", file.display(), parsed.len());
                resources.extend(parsed);
            }
        }

        Ok(resources)
    }

    /// Write a resource to its conventional location, pretty-printed.
    ///
    /// Returns the path written. Declared fields round-trip exactly (key
    /// order included).
    pub fn write(&self, handler: &dyn Handler, resource: &Resource) -> Result<PathBuf> {
        let path = self
            .root
            .join(handler.resource_file_path(resource, handler.extension()));

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Could not create {}", parent.display()))?;
        }

        let value = resource.to_value()?;
        let content = serde_json::to_string_pretty(&value)?;
        fs::write(&path, content).with_context(|| format!("Could not write {}", path.display()))?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reconcile::{Error, GENERAL_FOLDER};
    use serde_json::json;
    use std::sync::Arc;

    struct StubHandler;

    impl Handler for StubHandler {
        fn kind(&self) -> &'static str {
            "Stub"
        }

        fn api_version(&self) -> &'static str {
            "test/v1"
        }

        fn plural_dir(&self) -> &'static str {
            "stubs"
        }

        fn file_prefix(&self) -> &'static str {
            "stub"
        }

        fn parse(&self, declaration: Value) -> reconcile::Result<Vec<Resource>> {
            let resource = Resource::from_value(declaration)?;
            let resource = resource.with_spec_str("uid", resource.name());
            let resource = if resource.has_metadata("folder") {
                resource
            } else {
                resource.with_metadata("folder", GENERAL_FOLDER)
            };
            Ok(vec![resource])
        }

        fn get_by_uid(&self, _uid: &str) -> reconcile::Result<Resource> {
            Err(Error::NotFound)
        }

        fn list_remote(&self) -> reconcile::Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn add(&self, _resource: &Resource) -> reconcile::Result<()> {
            Ok(())
        }

        fn update(&self, _existing: &Resource, _resource: &Resource) -> reconcile::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        let registry = HandlerRegistry::new(vec![Arc::new(StubHandler)]);
        let handler = registry.get("Stub").unwrap();

        let resource = handler
            .parse(json!({
                "apiVersion": "test/v1",
                "kind": "Stub",
                "metadata": {"name": "alpha", "folder": "infra"},
                "spec": {"zcustom": true, "title": "Alpha"}
            }))
            .unwrap()
            .remove(0);

        let path = store.write(handler.as_ref(), &resource).unwrap();
        assert!(path.ends_with("stubs/infra/stub-alpha.json"));

        let loaded = store.load_all(&registry).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].metadata, resource.metadata);
        assert_eq!(loaded[0].spec, resource.spec);
    }

    #[test]
    fn test_load_all_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        let registry = HandlerRegistry::new(vec![Arc::new(StubHandler)]);

        assert!(store.load_all(&registry).unwrap().is_empty());
    }

    #[test]
    fn test_load_all_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let group = dir.path().join("stubs").join("general");
        fs::create_dir_all(&group).unwrap();
        fs::write(group.join("stub-bad.json"), "{not json").unwrap();

        let store = Store::new(dir.path());
        let registry = HandlerRegistry::new(vec![Arc::new(StubHandler)]);

        let err = store.load_all(&registry).unwrap_err();
        assert!(format!("{:#}", err).contains("stub-bad.json"));
    }
}
