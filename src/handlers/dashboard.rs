//! Dashboard resource kind
//!
//! Dashboards are filed under a folder remotely. The server injects `id` and
//! `version` into fetched dashboards; both are stripped before comparison,
//! and `id` is merged back in before an update because the write API demands
//! it.

use std::sync::Arc;

use reconcile::{Error, Handler, Resource, Result};
use serde_json::{Value, json};

use super::API_VERSION;
use crate::remote::RemoteClient;

/// Handler for Grafana-style dashboards.
pub struct DashboardHandler {
    client: Arc<RemoteClient>,
    default_folder: String,
}

impl DashboardHandler {
    pub fn new(client: Arc<RemoteClient>, default_folder: impl Into<String>) -> Self {
        Self {
            client,
            default_folder: default_folder.into(),
        }
    }

    fn payload(resource: &Resource, overwrite: bool) -> Value {
        json!({
            "dashboard": Value::Object(resource.spec.clone()),
            "folderUid": resource.folder(),
            "overwrite": overwrite,
        })
    }
}

impl Handler for DashboardHandler {
    fn kind(&self) -> &'static str {
        "Dashboard"
    }

    fn api_version(&self) -> &'static str {
        API_VERSION
    }

    fn plural_dir(&self) -> &'static str {
        "dashboards"
    }

    fn file_prefix(&self) -> &'static str {
        "dashboard"
    }

    fn parse(&self, declaration: Value) -> Result<Vec<Resource>> {
        let resource = Resource::from_value(declaration)?;
        let resource = resource.with_spec_str("uid", resource.name());
        let resource = if resource.has_metadata("folder") {
            resource
        } else {
            resource.with_metadata("folder", self.default_folder.as_str())
        };
        Ok(vec![resource])
    }

    fn unprepare(&self, resource: &Resource) -> Resource {
        resource.without_spec_keys(&["id", "version"])
    }

    fn prepare(&self, existing: &Resource, resource: &Resource) -> Resource {
        match existing.spec.get("id") {
            Some(id) => resource.with_spec_value("id", id.clone()),
            None => resource.clone(),
        }
    }

    fn get_by_uid(&self, uid: &str) -> Result<Resource> {
        let body = self.client.get_json(&format!("api/dashboards/uid/{}", uid))?;
        let spec = match body.get("dashboard") {
            Some(Value::Object(map)) => map.clone(),
            _ => return Err(Error::transport("response missing dashboard object", None)),
        };
        let folder = body
            .pointer("/meta/folderUid")
            .and_then(Value::as_str)
            .unwrap_or(&self.default_folder)
            .to_string();
        Ok(Resource::new(self.api_version(), self.kind(), uid, spec)
            .with_metadata("folder", folder))
    }

    fn list_remote(&self) -> Result<Vec<String>> {
        let body = self.client.get_json("api/search?type=dash-db")?;
        super::collect_uids(&body)
    }

    fn add(&self, resource: &Resource) -> Result<()> {
        self.client
            .post_json("api/dashboards/db", &Self::payload(resource, false), &[])?;
        Ok(())
    }

    fn update(&self, _existing: &Resource, resource: &Resource) -> Result<()> {
        self.client
            .post_json("api/dashboards/db", &Self::payload(resource, true), &[])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn handler() -> DashboardHandler {
        DashboardHandler::new(
            Arc::new(RemoteClient::new("http://localhost:3000", None)),
            "general",
        )
    }

    fn declaration() -> Value {
        json!({
            "apiVersion": API_VERSION,
            "kind": "Dashboard",
            "metadata": {"name": "home"},
            "spec": {"title": "Home", "panels": []}
        })
    }

    #[test]
    fn test_parse_injects_uid_and_defaults_folder() {
        let resources = handler().parse(declaration()).unwrap();
        assert_eq!(resources.len(), 1);

        let resource = &resources[0];
        assert_eq!(resource.spec_str("uid"), Some("home"));
        assert_eq!(resource.folder(), "general");
    }

    #[test]
    fn test_parse_keeps_declared_folder() {
        let mut declaration = declaration();
        declaration["metadata"]["folder"] = json!("infra");

        let resources = handler().parse(declaration).unwrap();
        assert_eq!(resources[0].folder(), "infra");
    }

    #[test]
    fn test_unprepare_strips_server_fields() {
        let resources = handler().parse(declaration()).unwrap();
        let remote = resources[0]
            .with_spec_value("id", json!(42))
            .with_spec_value("version", json!(7));

        let unprepared = handler().unprepare(&remote);
        assert!(!unprepared.spec.contains_key("id"));
        assert!(!unprepared.spec.contains_key("version"));
        assert_eq!(handler().unprepare(&resources[0]), unprepared);
    }

    #[test]
    fn test_prepare_merges_remote_id() {
        let resources = handler().parse(declaration()).unwrap();
        let local = &resources[0];
        let existing = local.with_spec_value("id", json!(42));

        let prepared = handler().prepare(&existing, local);
        assert_eq!(prepared.spec.get("id"), Some(&json!(42)));
        // Inputs untouched
        assert!(!local.spec.contains_key("id"));
    }

    #[test]
    fn test_push_payload_shape() {
        let resources = handler().parse(declaration()).unwrap();
        let payload = DashboardHandler::payload(&resources[0], true);

        assert_eq!(payload["folderUid"], json!("general"));
        assert_eq!(payload["overwrite"], json!(true));
        assert_eq!(payload["dashboard"]["uid"], json!("home"));
    }

    #[test]
    fn test_file_path_convention() {
        let resources = handler().parse(declaration()).unwrap();
        let path = handler().resource_file_path(&resources[0], "json");
        assert_eq!(
            path,
            std::path::PathBuf::from("dashboards/general/dashboard-home.json")
        );
    }
}
