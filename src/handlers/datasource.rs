//! Data source resource kind
//!
//! Data sources are not grouped remotely; declarations file under the default
//! group on disk and the grouping key is ignored in comparisons. The server
//! injects a numeric `id`, `version`, and `readOnly` into fetched data
//! sources; `id` is required again on update.

use std::sync::Arc;

use reconcile::{Error, Handler, Resource, Result};
use serde_json::Value;

use super::API_VERSION;
use crate::remote::RemoteClient;

/// Handler for data source definitions.
pub struct DatasourceHandler {
    client: Arc<RemoteClient>,
}

impl DatasourceHandler {
    pub fn new(client: Arc<RemoteClient>) -> Self {
        Self { client }
    }
}

impl Handler for DatasourceHandler {
    fn kind(&self) -> &'static str {
        "Datasource"
    }

    fn api_version(&self) -> &'static str {
        API_VERSION
    }

    fn plural_dir(&self) -> &'static str {
        "datasources"
    }

    fn file_prefix(&self) -> &'static str {
        "datasource"
    }

    fn parse(&self, declaration: Value) -> Result<Vec<Resource>> {
        let resource = Resource::from_value(declaration)?;
        let resource = resource.with_spec_str("uid", resource.name());
        Ok(vec![resource])
    }

    fn unprepare(&self, resource: &Resource) -> Resource {
        resource
            .without_spec_keys(&["id", "version", "readOnly"])
            .without_metadata_keys(&["folder"])
    }

    fn prepare(&self, existing: &Resource, resource: &Resource) -> Resource {
        match existing.spec.get("id") {
            Some(id) => resource.with_spec_value("id", id.clone()),
            None => resource.clone(),
        }
    }

    fn get_by_uid(&self, uid: &str) -> Result<Resource> {
        let body = self.client.get_json(&format!("api/datasources/uid/{}", uid))?;
        match body {
            Value::Object(spec) => Ok(Resource::new(self.api_version(), self.kind(), uid, spec)),
            _ => Err(Error::transport("expected a data source object", None)),
        }
    }

    fn list_remote(&self) -> Result<Vec<String>> {
        let body = self.client.get_json("api/datasources")?;
        super::collect_uids(&body)
    }

    fn add(&self, resource: &Resource) -> Result<()> {
        self.client
            .post_json("api/datasources", &Value::Object(resource.spec.clone()), &[])?;
        Ok(())
    }

    fn update(&self, _existing: &Resource, resource: &Resource) -> Result<()> {
        self.client.put_json(
            &format!("api/datasources/uid/{}", resource.name()),
            &Value::Object(resource.spec.clone()),
            &[],
        )?;
        Ok(())
    }
}
