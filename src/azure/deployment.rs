use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Write;
use tracing::debug;

use super::{run, run_json, AzureCli};
use crate::deployment::DeploymentSnapshot;
use crate::error::{DeployError, Result};
use crate::subscription::SubscriptionId;
use crate::template::DeploymentRequest;

const ARM_ENDPOINT: &str = "https://management.azure.com";
const DEPLOYMENTS_API_VERSION: &str = "2022-09-01";

/// Deployment operations
pub struct DeploymentCli<'a> {
    pub(super) az: &'a AzureCli,
}

/// ARM create-or-update body
#[derive(Serialize)]
struct DeploymentBody<'a> {
    properties: &'a DeploymentRequest,
}

#[derive(Debug, Deserialize)]
struct DeploymentShowResponse {
    properties: DeploymentShowProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentShowProperties {
    provisioning_state: String,
    outputs: Option<Value>,
    error: Option<Value>,
    timestamp: Option<String>,
    correlation_id: Option<String>,
}

/// Resource URL of a resource group deployment
pub fn deployment_url(subscription: &SubscriptionId, resource_group: &str, name: &str) -> String {
    format!(
        "{}/subscriptions/{}/resourcegroups/{}/providers/Microsoft.Resources/deployments/{}?api-version={}",
        ARM_ENDPOINT, subscription, resource_group, name, DEPLOYMENTS_API_VERSION
    )
}

impl DeploymentCli<'_> {
    /// PUT the deployment body. ARM accepts it and runs the deployment
    /// asynchronously, so this returns as soon as the request is accepted.
    pub fn begin_create_or_update(
        &self,
        subscription: &SubscriptionId,
        resource_group: &str,
        name: &str,
        request: &DeploymentRequest,
    ) -> Result<()> {
        let operation = format!("submit deployment '{}' to '{}'", name, resource_group);
        let io_error = |e: std::io::Error| DeployError::provider(&operation, e.to_string());

        let mut body_file = tempfile::Builder::new()
            .prefix("azdeploy-")
            .suffix(".json")
            .tempfile()
            .map_err(io_error)?;
        serde_json::to_writer(&mut body_file, &DeploymentBody { properties: request })
            .map_err(|e| DeployError::provider(&operation, e.to_string()))?;
        body_file.flush().map_err(io_error)?;

        let url = deployment_url(subscription, resource_group, name);
        debug!(url = %url, body = %body_file.path().display(), "PUT deployment");

        let body_arg = format!("@{}", body_file.path().display());
        let mut cmd = self.az.command();
        cmd.args([
            "rest",
            "--method",
            "put",
            "--url",
            &url,
            "--body",
            &body_arg,
            "--headers",
            "Content-Type=application/json",
            "--output",
            "none",
        ]);
        run(&mut cmd, &operation)?;
        Ok(())
    }

    pub fn show(
        &self,
        subscription: &SubscriptionId,
        resource_group: &str,
        name: &str,
    ) -> Result<DeploymentSnapshot> {
        let mut cmd = self.az.command();
        cmd.args([
            "deployment",
            "group",
            "show",
            "--resource-group",
            resource_group,
            "--name",
            name,
            "--subscription",
            subscription.as_str(),
            "--output",
            "json",
        ]);
        let response: DeploymentShowResponse =
            run_json(&mut cmd, &format!("query deployment '{}'", name))?;
        Ok(snapshot_from(response))
    }
}

fn snapshot_from(response: DeploymentShowResponse) -> DeploymentSnapshot {
    let props = response.properties;
    DeploymentSnapshot {
        error: props.error.filter(|e| !e.is_null()),
        outputs: props.outputs.filter(|o| !o.is_null()),
        timestamp: props.timestamp,
        correlation_id: props.correlation_id,
        ..DeploymentSnapshot::new(&props.provisioning_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deployment::ProvisioningState;
    use crate::template::{Parameters, TemplateDocument};
    use serde_json::json;

    fn parse(json: &str) -> DeploymentSnapshot {
        snapshot_from(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn test_deployment_url() {
        let sub = SubscriptionId::parse("11111111-1111-1111-1111-111111111111").unwrap();
        assert_eq!(
            deployment_url(&sub, "rg-demo", "pydeploy-2024-01-02"),
            "https://management.azure.com/subscriptions/11111111-1111-1111-1111-111111111111\
             /resourcegroups/rg-demo/providers/Microsoft.Resources/deployments/pydeploy-2024-01-02\
             ?api-version=2022-09-01"
        );
    }

    #[test]
    fn test_body_wraps_request_in_properties() {
        let template = TemplateDocument::from_value(json!({"resources": []})).unwrap();
        let mut params = serde_json::Map::new();
        params.insert("env".to_string(), json!({"value": "dev"}));
        let request = DeploymentRequest::builder(template)
            .parameters(Parameters::Provided(params))
            .build();

        let body = serde_json::to_value(DeploymentBody { properties: &request }).unwrap();
        assert_eq!(
            body,
            json!({"properties": {
                "mode": "Incremental",
                "template": {"resources": []},
                "parameters": {"env": {"value": "dev"}}
            }})
        );
    }

    #[test]
    fn test_snapshot_succeeded_with_outputs() {
        let snap = parse(
            r#"{"name": "d", "properties": {
                "provisioningState": "Succeeded",
                "outputs": {"url": {"type": "String", "value": "https://x"}},
                "error": null,
                "timestamp": "2024-01-02T03:04:05Z",
                "correlationId": "abc"
            }}"#,
        );
        assert_eq!(snap.state, ProvisioningState::Succeeded);
        assert_eq!(snap.outputs.unwrap()["url"]["value"], "https://x");
        assert!(snap.error.is_none());
        assert_eq!(snap.correlation_id.as_deref(), Some("abc"));
    }

    #[test]
    fn test_snapshot_failed_keeps_error_payload() {
        let snap = parse(
            r#"{"properties": {
                "provisioningState": "Failed",
                "error": {"code": "DeploymentFailed", "message": "boom"}
            }}"#,
        );
        assert_eq!(snap.state, ProvisioningState::Failed);
        assert_eq!(snap.raw_state, "Failed");
        assert_eq!(snap.error.unwrap()["code"], "DeploymentFailed");
    }

    #[test]
    fn test_snapshot_running() {
        let snap = parse(r#"{"properties": {"provisioningState": "Running"}}"#);
        assert_eq!(snap.state, ProvisioningState::InProgress);
        assert!(snap.outputs.is_none());
    }
}
