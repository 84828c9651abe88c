//! The deploy pipeline:
//! validate → build payload → authenticate → reconcile group → submit → wait.
//!
//! The payload is built before any remote call so a missing or malformed
//! template never touches the control plane. Any stage failure ends the run;
//! nothing created earlier in the run is rolled back.

use std::path::PathBuf;
use tracing::info;

use crate::deployment::{
    todays_deployment_name, validate_prefix, DeploymentResult, DeploymentSnapshot,
    DeploymentSubmitter, DeploymentWaiter, ProgressSink, WaitConfig,
};
use crate::error::Result;
use crate::provider::{CredentialProvider, ResourceManager, TemplateCompiler};
use crate::resource_group::{self, Reconciled, ResourceGroup, ResourceGroupReconciler, Teardown};
use crate::session::{LoginMethod, Session, SessionManager};
use crate::subscription::SubscriptionId;
use crate::template::TemplatePayloadBuilder;

/// Inputs for one deploy run
#[derive(Debug, Clone)]
pub struct DeployOptions {
    pub subscription_id: String,
    pub resource_group: String,
    pub region: String,
    pub template: PathBuf,
    pub parameters: Option<PathBuf>,
    pub deploy_prefix: String,
    pub wait: WaitConfig,
}

#[derive(Debug, Clone)]
pub struct DeployOutcome {
    pub session: Session,
    pub resource_group: Reconciled,
    pub deployment: DeploymentResult,
}

pub struct Orchestrator<'a> {
    credentials: &'a dyn CredentialProvider,
    manager: &'a dyn ResourceManager,
    compiler: Option<&'a dyn TemplateCompiler>,
    login: LoginMethod,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        credentials: &'a dyn CredentialProvider,
        manager: &'a dyn ResourceManager,
        login: LoginMethod,
    ) -> Self {
        Self {
            credentials,
            manager,
            compiler: None,
            login,
        }
    }

    pub fn with_compiler(mut self, compiler: &'a dyn TemplateCompiler) -> Self {
        self.compiler = Some(compiler);
        self
    }

    pub fn deploy(
        &self,
        options: &DeployOptions,
        progress: &mut dyn ProgressSink,
    ) -> Result<DeployOutcome> {
        let subscription = SubscriptionId::parse(&options.subscription_id)?;
        let group = ResourceGroup::new(&options.resource_group, &options.region)?;
        validate_prefix(&options.deploy_prefix)?;

        let mut payload = TemplatePayloadBuilder::new();
        if let Some(compiler) = self.compiler {
            payload = payload.with_compiler(compiler);
        }
        let request = payload.build(&options.template, options.parameters.as_deref())?;

        let session = self.session(&subscription)?;
        let reconciled = ResourceGroupReconciler::new(self.manager).reconcile(&session, &group)?;

        let name = todays_deployment_name(&options.deploy_prefix);
        let submitter = DeploymentSubmitter::new(self.manager);
        let handle = submitter.submit(&session, &group.name, &name, request)?;
        info!(deployment = %name, resource_group = %group.name, "Deployment started");

        let deployment = DeploymentWaiter::new(options.wait.clone()).await_completion(&handle, progress)?;
        info!(deployment = %name, "Deployment completed");

        Ok(DeployOutcome {
            session,
            resource_group: reconciled,
            deployment,
        })
    }

    /// Authenticate and make sure the resource group exists, without deploying
    pub fn ensure_resource_group(
        &self,
        subscription_id: &str,
        name: &str,
        region: &str,
    ) -> Result<Reconciled> {
        let subscription = SubscriptionId::parse(subscription_id)?;
        let group = ResourceGroup::new(name, region)?;
        let session = self.session(&subscription)?;
        ResourceGroupReconciler::new(self.manager).reconcile(&session, &group)
    }

    /// Delete a resource group. Never invoked by a failed deploy.
    pub fn destroy_resource_group(&self, subscription_id: &str, name: &str) -> Result<Teardown> {
        let subscription = SubscriptionId::parse(subscription_id)?;
        resource_group::validate_name(name)?;
        let session = self.session(&subscription)?;
        ResourceGroupReconciler::new(self.manager).destroy(&session, name)
    }

    /// Current state of a named deployment
    pub fn deployment_status(
        &self,
        subscription_id: &str,
        resource_group: &str,
        name: &str,
    ) -> Result<DeploymentSnapshot> {
        let subscription = SubscriptionId::parse(subscription_id)?;
        resource_group::validate_name(resource_group)?;
        let session = self.session(&subscription)?;
        self.manager.get_deployment(&session, resource_group, name)
    }

    fn session(&self, subscription: &SubscriptionId) -> Result<Session> {
        SessionManager::new(self.credentials, self.login.clone()).ensure_session(subscription)
    }
}
