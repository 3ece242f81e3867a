//! Alert rule resource kind
//!
//! Alert rules live under a folder and are subject to provenance locking:
//! unless the context opts in, every write carries the explicit
//! disable-provenance marker so rules stay editable through other channels.

use std::sync::Arc;

use reconcile::{Error, Handler, Resource, Result};
use serde_json::Value;

use super::API_VERSION;
use crate::remote::RemoteClient;

/// Handler for provisioned alert rules.
pub struct AlertRuleHandler {
    client: Arc<RemoteClient>,
    default_folder: String,
    lock_provenance: bool,
}

impl AlertRuleHandler {
    pub fn new(
        client: Arc<RemoteClient>,
        default_folder: impl Into<String>,
        lock_provenance: bool,
    ) -> Self {
        Self {
            client,
            default_folder: default_folder.into(),
            lock_provenance,
        }
    }

    fn write_headers(&self) -> &'static [(&'static str, &'static str)] {
        if self.lock_provenance {
            &[]
        } else {
            &[("X-Disable-Provenance", "true")]
        }
    }

    /// Push payload: the rule spec with the folder identity the API requires.
    fn payload(resource: &Resource) -> Value {
        let prepared = resource.with_spec_str("folderUID", resource.folder());
        Value::Object(prepared.spec)
    }
}

impl Handler for AlertRuleHandler {
    fn kind(&self) -> &'static str {
        "AlertRule"
    }

    fn api_version(&self) -> &'static str {
        API_VERSION
    }

    fn plural_dir(&self) -> &'static str {
        "alertrules"
    }

    fn file_prefix(&self) -> &'static str {
        "alertrule"
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
        resource.without_spec_keys(&["id", "provenance", "updated", "folderUID"])
    }

    fn prepare(&self, existing: &Resource, resource: &Resource) -> Resource {
        let prepared = resource.with_spec_str("folderUID", resource.folder());
        match existing.spec.get("id") {
            Some(id) => prepared.with_spec_value("id", id.clone()),
            None => prepared,
        }
    }

    fn get_by_uid(&self, uid: &str) -> Result<Resource> {
        let body = self
            .client
            .get_json(&format!("api/v1/provisioning/alert-rules/{}", uid))?;
        let spec = match body {
            Value::Object(map) => map,
            _ => return Err(Error::transport("expected an alert rule object", None)),
        };
        let folder = spec
            .get("folderUID")
            .and_then(Value::as_str)
            .unwrap_or(&self.default_folder)
            .to_string();
        Ok(Resource::new(self.api_version(), self.kind(), uid, spec)
            .with_metadata("folder", folder))
    }

    fn list_remote(&self) -> Result<Vec<String>> {
        let body = self.client.get_json("api/v1/provisioning/alert-rules")?;
        super::collect_uids(&body)
    }

    fn add(&self, resource: &Resource) -> Result<()> {
        self.client.post_json(
            "api/v1/provisioning/alert-rules",
            &Self::payload(resource),
            self.write_headers(),
        )?;
        Ok(())
    }

    fn update(&self, _existing: &Resource, resource: &Resource) -> Result<()> {
        self.client.put_json(
            &format!("api/v1/provisioning/alert-rules/{}", resource.name()),
            &Self::payload(resource),
            self.write_headers(),
        )?;
        Ok(())
    }
}
