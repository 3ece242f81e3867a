//! Folder resource kind
//!
//! Folders are the grouping namespace the other kinds file under, and are
//! themselves reconciled: declaring one makes sure it exists with the right
//! title before anything is filed into it.

use std::sync::Arc;

use reconcile::{Error, Handler, Resource, Result};
use serde_json::{Value, json};

use super::API_VERSION;
use crate::remote::RemoteClient;

/// Handler for dashboard folders.
pub struct FolderHandler {
    client: Arc<RemoteClient>,
}

impl FolderHandler {
    pub fn new(client: Arc<RemoteClient>) -> Self {
        Self { client }
    }
}

impl Handler for FolderHandler {
    fn kind(&self) -> &'static str {
        "Folder"
    }

    fn api_version(&self) -> &'static str {
        API_VERSION
    }

    fn plural_dir(&self) -> &'static str {
        "folders"
    }

    fn file_prefix(&self) -> &'static str {
        "folder"
    }

    fn parse(&self, declaration: Value) -> Result<Vec<Resource>> {
        let resource = Resource::from_value(declaration)?;
        let resource = resource.with_spec_str("uid", resource.name());
        Ok(vec![resource])
    }

    fn unprepare(&self, resource: &Resource) -> Resource {
        resource
            .without_spec_keys(&["id", "url", "version"])
            .without_metadata_keys(&["folder"])
    }

    fn get_by_uid(&self, uid: &str) -> Result<Resource> {
        let body = self.client.get_json(&format!("api/folders/{}", uid))?;
        match body {
            Value::Object(spec) => Ok(Resource::new(self.api_version(), self.kind(), uid, spec)),
            _ => Err(Error::transport("expected a folder object", None)),
        }
    }

    fn list_remote(&self) -> Result<Vec<String>> {
        let body = self.client.get_json("api/folders")?;
        super::collect_uids(&body)
    }

    fn add(&self, resource: &Resource) -> Result<()> {
        self.client
            .post_json("api/folders", &Value::Object(resource.spec.clone()), &[])?;
        Ok(())
    }

    fn update(&self, _existing: &Resource, resource: &Resource) -> Result<()> {
        let mut payload = resource.spec.clone();
        payload.insert("overwrite".to_string(), json!(true));
        self.client.put_json(
            &format!("api/folders/{}", resource.name()),
            &Value::Object(payload),
            &[],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn handler() -> FolderHandler {
        FolderHandler::new(Arc::new(RemoteClient::new("http://localhost:3000", None)))
    }

    fn declared() -> Resource {
        handler()
            .parse(json!({
                "apiVersion": API_VERSION,
                "kind": "Folder",
                "metadata": {"name": "slo"},
                "spec": {"title": "Service level objectives"}
            }))
            .unwrap()
            .remove(0)
    }

    #[test]
    fn test_parse_injects_uid() {
        let resource = declared();
        assert_eq!(resource.spec_str("uid"), Some("slo"));
    }

    #[test]
    fn test_unprepare_strips_server_fields() {
        let local = declared();
        let remote = local
            .with_spec_value("id", json!(9))
            .with_spec_str("url", "/dashboards/f/slo/slo")
            .with_spec_value("version", json!(1));

        assert_eq!(handler().unprepare(&remote), handler().unprepare(&local));
    }

    #[test]
    fn test_file_path_convention() {
        let path = handler().resource_file_path(&declared(), "json");
        assert_eq!(
            path,
            std::path::PathBuf::from("folders/general/folder-slo.json")
        );
    }
}
