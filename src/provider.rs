//! Traits for the remote control plane. The pipeline only talks to Azure
//! through these, so tests can swap in a recording fake.

use std::path::Path;

use crate::deployment::DeploymentSnapshot;
use crate::error::Result;
use crate::session::{AccountInfo, LoginMethod, Session};
use crate::subscription::SubscriptionId;
use crate::template::DeploymentRequest;

/// Opaque source of authenticated sessions
pub trait CredentialProvider {
    /// Account bound to `subscription` in the cached login, if there is one
    fn cached_account(&self, subscription: &SubscriptionId) -> Result<Option<AccountInfo>>;

    /// Establish a new login. May block on user interaction.
    fn login(&self, method: &LoginMethod) -> Result<()>;

    fn select_subscription(&self, subscription: &SubscriptionId) -> Result<()>;
}

/// Resource group and deployment operations, scoped by the session's subscription
pub trait ResourceManager {
    fn group_exists(&self, session: &Session, name: &str) -> Result<bool>;

    fn create_or_update_group(&self, session: &Session, name: &str, region: &str) -> Result<()>;

    /// Start deleting a group without waiting for it to finish
    fn begin_delete_group(&self, session: &Session, name: &str) -> Result<()>;

    /// Submit a deployment and return as soon as the control plane accepts it
    fn begin_create_or_update_deployment(
        &self,
        session: &Session,
        resource_group: &str,
        name: &str,
        request: &DeploymentRequest,
    ) -> Result<()>;

    fn get_deployment(
        &self,
        session: &Session,
        resource_group: &str,
        name: &str,
    ) -> Result<DeploymentSnapshot>;
}

/// Turns a Bicep source file into an ARM JSON template
pub trait TemplateCompiler {
    fn compile(&self, path: &Path) -> Result<serde_json::Value>;
}
