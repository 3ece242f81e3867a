//! CLI commands
//!
//! Each command builds on the same session: context config, remote client,
//! handler registry, and local store.

pub mod apply;
pub mod configs;
pub mod diff;
pub mod pull;
pub mod status;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use reconcile::{HandlerRegistry, Resource};

use crate::config::Config;
use crate::handlers;
use crate::remote::RemoteClient;
use crate::store::Store;

/// Everything a command needs to talk to one remote instance.
pub struct Session {
    pub config: Config,
    pub registry: HandlerRegistry,
    pub store: Store,
}

impl Session {
    /// Build a session from config plus CLI overrides.
    pub fn new(config: Config, dir_override: Option<PathBuf>) -> Self {
        let client = Arc::new(RemoteClient::new(
            config.url.clone(),
            config.token.clone(),
        ));
        let registry = handlers::registry(&client, &config);
        let root = dir_override.unwrap_or_else(|| config.resources_path());
        let store = Store::new(root);

        Self {
            config,
            registry,
            store,
        }
    }

    /// Load declared resources, filtered by an optional "Kind" or
    /// "Kind.name" target.
    pub fn load_resources(&self, target: Option<&str>) -> Result<Vec<Resource>> {
        let resources = self.store.load_all(&self.registry)?;
        let (kind, name) = target.map(parse_target).unwrap_or((None, None));

        Ok(resources
            .into_iter()
            .filter(|r| matches_filter(r, kind.as_deref(), name.as_deref()))
            .collect())
    }
}

/// Parse a target string like "Kind.name" into (kind, name)
fn parse_target(target: &str) -> (Option<String>, Option<String>) {
    match target.split_once('.') {
        Some((kind, name)) => (Some(kind.to_string()), Some(name.to_string())),
        None => (Some(target.to_string()), None),
    }
}

/// Check if a resource matches the filter criteria
fn matches_filter(resource: &Resource, kind: Option<&str>, name: Option<&str>) -> bool {
    if let Some(k) = kind
        && !resource.kind.eq_ignore_ascii_case(k)
    {
        return false;
    }
    if let Some(n) = name
        && resource.name() != n
    {
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_target() {
        assert_eq!(
            parse_target("Dashboard"),
            (Some("Dashboard".to_string()), None)
        );
        assert_eq!(
            parse_target("Dashboard.home"),
            (Some("Dashboard".to_string()), Some("home".to_string()))
        );
    }

    fn resource(kind: &str, name: &str) -> Resource {
        Resource::from_value(json!({
            "apiVersion": "obsync.dev/v1alpha1",
            "kind": kind,
            "metadata": {"name": name},
            "spec": {}
        }))
        .unwrap()
    }

    #[test]
    fn test_matches_filter() {
        let home = resource("Dashboard", "home");

        assert!(matches_filter(&home, None, None));
        assert!(matches_filter(&home, Some("Dashboard"), None));
        assert!(matches_filter(&home, Some("dashboard"), None));
        assert!(matches_filter(&home, Some("Dashboard"), Some("home")));
        assert!(!matches_filter(&home, Some("Datasource"), None));
        assert!(!matches_filter(&home, Some("Dashboard"), Some("other")));
    }
}
