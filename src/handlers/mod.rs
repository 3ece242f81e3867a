//! Concrete kind handlers
//!
//! One module per resource kind, each implementing the `reconcile::Handler`
//! contract over the shared [`RemoteClient`]. All kind-specific knowledge
//! (endpoints, server-injected fields, push payload shapes) lives here and
//! nowhere else.

pub mod alert_rule;
pub mod dashboard;
pub mod datasource;
pub mod folder;

pub use alert_rule::AlertRuleHandler;
pub use dashboard::DashboardHandler;
pub use datasource::DatasourceHandler;
pub use folder::FolderHandler;

use std::sync::Arc;

use reconcile::{Error, HandlerRegistry, Result};
use serde_json::Value;

use crate::config::Config;
use crate::remote::RemoteClient;

/// Schema family served by this provider.
pub const API_VERSION: &str = "obsync.dev/v1alpha1";

/// Build the process-wide handler registry over a shared client.
///
/// Called once at startup; the registry is read-only afterward.
pub fn registry(client: &Arc<RemoteClient>, config: &Config) -> HandlerRegistry {
    HandlerRegistry::new(vec![
        Arc::new(DashboardHandler::new(
            Arc::clone(client),
            &config.default_folder,
        )),
        Arc::new(DatasourceHandler::new(Arc::clone(client))),
        Arc::new(AlertRuleHandler::new(
            Arc::clone(client),
            &config.default_folder,
            config.lock_provenance,
        )),
        Arc::new(FolderHandler::new(Arc::clone(client))),
    ])
}

/// Collect the `uid` field of every element in a JSON array response,
/// preserving remote order.
pub(crate) fn collect_uids(body: &Value) -> Result<Vec<String>> {
    let items = body
        .as_array()
        .ok_or_else(|| Error::transport("expected a JSON array in list response", None))?;
    Ok(items
        .iter()
        .filter_map(|item| item.get("uid").and_then(Value::as_str))
        .map(String::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_registry() -> HandlerRegistry {
        let client = Arc::new(RemoteClient::new("http://localhost:3000", None));
        let config = Config {
            url: "http://localhost:3000".to_string(),
            ..Config::default()
        };
        registry(&client, &config)
    }

    #[test]
    fn test_all_kinds_registered() {
        let registry = test_registry();
        assert_eq!(
            registry.kinds(),
            ["AlertRule", "Dashboard", "Datasource", "Folder"]
        );
    }

    #[test]
    fn test_collect_uids_preserves_order() {
        let body = json!([
            {"uid": "ReciqtgGk", "title": "a"},
            {"uid": "392Ik4GGk", "title": "b"},
            {"uid": "kE0IIVGGz", "title": "c"}
        ]);
        let uids = collect_uids(&body).unwrap();
        assert_eq!(uids, ["ReciqtgGk", "392Ik4GGk", "kE0IIVGGz"]);
    }

    #[test]
    fn test_collect_uids_rejects_non_array() {
        let err = collect_uids(&json!({"uid": "x"})).unwrap_err();
        assert!(matches!(err, Error::Transport { .. }));
    }
}
