//! Handler trait for resource kinds
//!
//! A Handler adapts one resource kind to the uniform reconciliation contract:
//! parse, validate, normalize, identity, and remote CRUD. The reconciler only
//! ever talks to this trait; nothing in the core switches on kind.

use std::path::{Path, PathBuf};

use serde_json::Value;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::resource::Resource;

/// Capability contract implemented once per resource kind.
///
/// Default methods cover the behavior that is uniform across kinds: the
/// on-disk path convention `{plural_dir}/{folder}/{file_prefix}-{name}.{ext}`,
/// the uid-must-match-name validation, and identity derivation from metadata.
/// Kinds override `prepare`/`unprepare` to describe their server-injected
/// noise and the remote-only fields their push operations require.
pub trait Handler: Send + Sync {
    /// Kind discriminator, e.g. `"Dashboard"`. No side effects.
    fn kind(&self) -> &'static str;

    /// Schema family this handler belongs to.
    fn api_version(&self) -> &'static str;

    /// Directory name holding this kind's declarations, e.g. `"dashboards"`.
    fn plural_dir(&self) -> &'static str;

    /// Filename prefix for this kind, e.g. `"dashboard"`.
    fn file_prefix(&self) -> &'static str;

    /// Serialization extension for declaration files.
    fn extension(&self) -> &'static str {
        "json"
    }

    /// Check local preconditions before any remote call.
    ///
    /// Fails when the resource declares an explicit identity field that
    /// disagrees with its name. The mismatch is never silently corrected.
    fn validate(&self, resource: &Resource) -> Result<()> {
        if let Some(uid) = resource.spec_str("uid")
            && uid != resource.name()
        {
            return Err(Error::validation(
                resource.name(),
                format!("uid '{}' and name '{}' don't match", uid, resource.name()),
            ));
        }
        Ok(())
    }

    /// Locate declaration files for this kind under a root directory.
    ///
    /// Matches `{root}/{plural_dir}/{group}/{file_prefix}-*.{ext}`. A missing
    /// kind directory yields an empty list, not an error.
    fn find_resource_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let base = root.join(self.plural_dir());
        if !base.is_dir() {
            return Ok(Vec::new());
        }

        let prefix = format!("{}-", self.file_prefix());
        let suffix = format!(".{}", self.extension());

        let mut files = Vec::new();
        for entry in WalkDir::new(&base).min_depth(2).max_depth(2) {
            let entry = entry.map_err(|e| Error::Io(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str()
                && name.starts_with(&prefix)
                && name.ends_with(&suffix)
            {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Where a resource should be written on disk.
    fn resource_file_path(&self, resource: &Resource, filetype: &str) -> PathBuf {
        PathBuf::from(self.plural_dir())
            .join(resource.folder())
            .join(format!(
                "{}-{}.{}",
                self.file_prefix(),
                resource.name(),
                filetype
            ))
    }

    /// Convert a raw declaration into one or more resources.
    ///
    /// Implementations inject the explicit identity field from the declared
    /// name where the kind carries one, and default the grouping key when
    /// absent.
    fn parse(&self, declaration: Value) -> Result<Vec<Resource>>;

    /// Copy with server-only/computed fields stripped.
    ///
    /// Applied to both sides before structural comparison so server-injected
    /// noise never causes spurious diffs.
    fn unprepare(&self, resource: &Resource) -> Resource {
        resource.clone()
    }

    /// Copy of the local resource merged with remote-only fields the push
    /// operation requires. Must not mutate either input.
    fn prepare(&self, _existing: &Resource, resource: &Resource) -> Resource {
        resource.clone()
    }

    /// Canonical identity: always the metadata name, never spec content.
    fn uid(&self, resource: &Resource) -> String {
        resource.name().to_string()
    }

    /// Fetch a remote resource by identity. Fails with `NotFound` when the
    /// identity does not exist.
    fn get_by_uid(&self, uid: &str) -> Result<Resource>;

    /// Fetch the remote counterpart of a local resource.
    fn get_remote(&self, resource: &Resource) -> Result<Resource> {
        self.get_by_uid(&self.uid(resource))
    }

    /// Point-in-time inventory of all remote identities, in remote order.
    fn list_remote(&self) -> Result<Vec<String>>;

    /// Create the resource remotely. Fails with `Conflict` when it collides
    /// with an existing, differently-identified object.
    fn add(&self, resource: &Resource) -> Result<()>;

    /// Update an existing remote resource. Logically idempotent: pushing the
    /// same normalized resource twice must not change observable state.
    fn update(&self, existing: &Resource, resource: &Resource) -> Result<()>;
}

/// A shared, type-erased handler as stored in the registry.
pub type SharedHandler = std::sync::Arc<dyn Handler>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

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

        fn parse(&self, declaration: Value) -> Result<Vec<Resource>> {
            let resource = Resource::from_value(declaration)?;
            let resource = resource.with_spec_str("uid", resource.name());
            let resource = if resource.has_metadata("folder") {
                resource
            } else {
                resource.with_metadata("folder", crate::resource::GENERAL_FOLDER)
            };
            Ok(vec![resource])
        }

        fn get_by_uid(&self, _uid: &str) -> Result<Resource> {
            Err(Error::NotFound)
        }

        fn list_remote(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn add(&self, _resource: &Resource) -> Result<()> {
            Ok(())
        }

        fn update(&self, _existing: &Resource, _resource: &Resource) -> Result<()> {
            Ok(())
        }
    }

    fn declaration(name: &str) -> Value {
        json!({
            "apiVersion": "test/v1",
            "kind": "Stub",
            "metadata": {"name": name},
            "spec": {"title": name}
        })
    }

    #[test]
    fn test_validate_accepts_matching_uid() {
        let handler = StubHandler;
        let resource = Resource::from_value(declaration("alpha"))
            .unwrap()
            .with_spec_str("uid", "alpha");
        assert!(handler.validate(&resource).is_ok());
    }

    #[test]
    fn test_validate_accepts_missing_uid() {
        let handler = StubHandler;
        let resource = Resource::from_value(declaration("alpha")).unwrap();
        assert!(handler.validate(&resource).is_ok());
    }

    #[test]
    fn test_validate_rejects_mismatched_uid() {
        let handler = StubHandler;
        let resource = Resource::from_value(declaration("alpha"))
            .unwrap()
            .with_spec_str("uid", "beta");

        let err = handler.validate(&resource).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_uid_ignores_spec_content() {
        let handler = StubHandler;
        let resource = Resource::from_value(declaration("alpha"))
            .unwrap()
            .with_spec_str("uid", "beta");

        // Validation would reject this resource, but identity resolution
        // stays anchored to the metadata name regardless.
        assert_eq!(handler.uid(&resource), "alpha");
    }

    #[test]
    fn test_parse_defaults_grouping_key() {
        let handler = StubHandler;
        let resources = handler.parse(declaration("alpha")).unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].folder(), "general");
        assert_eq!(resources[0].spec_str("uid"), Some("alpha"));
    }

    #[test]
    fn test_resource_file_path_follows_convention() {
        let handler = StubHandler;
        let resource = Resource::from_value(declaration("alpha"))
            .unwrap()
            .with_metadata("folder", "infra");

        let path = handler.resource_file_path(&resource, "json");
        assert_eq!(path, PathBuf::from("stubs/infra/stub-alpha.json"));
    }

    #[test]
    fn test_find_resource_files_matches_convention_only() {
        let handler = StubHandler;
        let root = tempfile::tempdir().unwrap();

        let group = root.path().join("stubs").join("general");
        fs::create_dir_all(&group).unwrap();
        fs::write(group.join("stub-alpha.json"), "{}").unwrap();
        fs::write(group.join("stub-beta.json"), "{}").unwrap();
        fs::write(group.join("notes.txt"), "").unwrap();
        // Wrong depth: directly under the kind dir, not in a group
        fs::write(root.path().join("stubs").join("stub-top.json"), "{}").unwrap();

        let files = handler.find_resource_files(root.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(names, ["stub-alpha.json", "stub-beta.json"]);
    }

    #[test]
    fn test_find_resource_files_missing_dir_is_empty() {
        let handler = StubHandler;
        let root = tempfile::tempdir().unwrap();
        assert!(handler.find_resource_files(root.path()).unwrap().is_empty());
    }
}
