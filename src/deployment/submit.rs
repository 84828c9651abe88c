use tracing::info;

use super::{DeploymentResult, DeploymentSnapshot, ProvisioningState};
use crate::error::{DeployError, Result};
use crate::provider::ResourceManager;
use crate::session::Session;
use crate::template::DeploymentRequest;

pub struct DeploymentSubmitter<'a> {
    manager: &'a dyn ResourceManager,
}

impl<'a> DeploymentSubmitter<'a> {
    pub fn new(manager: &'a dyn ResourceManager) -> Self {
        Self { manager }
    }

    /// Submit `request` and return without waiting. Submission errors are
    /// not retried.
    pub fn submit(
        &self,
        session: &'a Session,
        resource_group: &str,
        name: &str,
        request: DeploymentRequest,
    ) -> Result<DeploymentHandle<'a>> {
        info!(
            resource_group = %resource_group,
            deployment = %name,
            mode = ?request.mode(),
            parameters = !request.parameters().is_none(),
            "Submitting deployment"
        );
        self.manager
            .begin_create_or_update_deployment(session, resource_group, name, &request)?;

        Ok(DeploymentHandle {
            manager: self.manager,
            session,
            resource_group: resource_group.to_string(),
            name: name.to_string(),
        })
    }
}

/// Reference to a submitted deployment
pub struct DeploymentHandle<'a> {
    manager: &'a dyn ResourceManager,
    session: &'a Session,
    resource_group: String,
    name: String,
}

impl DeploymentHandle<'_> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resource_group(&self) -> &str {
        &self.resource_group
    }

    pub fn snapshot(&self) -> Result<DeploymentSnapshot> {
        self.manager
            .get_deployment(self.session, &self.resource_group, &self.name)
    }

    pub fn status(&self) -> Result<ProvisioningState> {
        Ok(self.snapshot()?.state)
    }

    /// Final outcome. Failed and Canceled become [`DeployError::Deployment`]
    /// with the provider's error payload.
    pub fn result(&self) -> Result<DeploymentResult> {
        let snapshot = self.snapshot()?;
        match snapshot.state {
            ProvisioningState::Succeeded => Ok(DeploymentResult {
                name: self.name.clone(),
                resource_group: self.resource_group.clone(),
                state: snapshot.state,
                outputs: snapshot.outputs.unwrap_or(serde_json::Value::Null),
                timestamp: snapshot.timestamp,
                correlation_id: snapshot.correlation_id,
            }),
            ProvisioningState::Failed | ProvisioningState::Canceled => {
                Err(DeployError::Deployment {
                    name: self.name.clone(),
                    state: snapshot.state,
                    diagnostics: snapshot.error.unwrap_or(serde_json::Value::Null),
                })
            }
            state => Err(DeployError::provider(
                format!("fetch result of deployment '{}'", self.name),
                format!("deployment has not finished (state {})", state),
            )),
        }
    }
}
