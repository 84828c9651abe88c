#![allow(dead_code)] // Test helpers appear unused when compiled independently

use azdeploy::deployment::DeploymentSnapshot;
use azdeploy::provider::{CredentialProvider, ResourceManager, TemplateCompiler};
use azdeploy::session::{AccountInfo, LoginMethod, Session};
use azdeploy::subscription::SubscriptionId;
use azdeploy::template::DeploymentRequest;
use azdeploy::DeployError;
use serde_json::{json, Value};
use std::cell::{Cell, RefCell};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

use azdeploy::deployment::WaitConfig;
use azdeploy::DeployOptions;

pub const SUBSCRIPTION: &str = "11111111-1111-1111-1111-111111111111";
pub const RESOURCE_GROUP: &str = "rg-demo";
pub const REGION: &str = "eastus";

/// One remote call observed by [`FakeAzure`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Account,
    Login,
    SelectSubscription,
    GroupExists(String),
    CreateGroup { name: String, region: String },
    DeleteGroup(String),
    Submit { resource_group: String, name: String },
    GetDeployment(String),
    Compile,
}

/// In-memory control plane that records every call.
///
/// Deployment states are served from a script; the last entry repeats
/// once the script runs out.
pub struct FakeAzure {
    logged_in: Cell<bool>,
    groups: RefCell<HashSet<String>>,
    states: RefCell<VecDeque<&'static str>>,
    outputs: Option<Value>,
    deployment_error: Option<Value>,
    fail_on_submit: Option<String>,
    calls: RefCell<Vec<Call>>,
    submitted: RefCell<Vec<Value>>,
}

impl FakeAzure {
    /// Logged in, no resource groups, deployments succeed immediately
    pub fn new() -> Self {
        Self {
            logged_in: Cell::new(true),
            groups: RefCell::new(HashSet::new()),
            states: RefCell::new(VecDeque::from(["Succeeded"])),
            outputs: None,
            deployment_error: None,
            fail_on_submit: None,
            calls: RefCell::new(Vec::new()),
            submitted: RefCell::new(Vec::new()),
        }
    }

    pub fn logged_out(self) -> Self {
        self.logged_in.set(false);
        self
    }

    pub fn with_group(self, name: &str) -> Self {
        self.groups.borrow_mut().insert(name.to_string());
        self
    }

    pub fn with_states(self, states: &[&'static str]) -> Self {
        *self.states.borrow_mut() = states.iter().copied().collect();
        self
    }

    pub fn with_outputs(mut self, outputs: Value) -> Self {
        self.outputs = Some(outputs);
        self
    }

    pub fn with_deployment_error(mut self, error: Value) -> Self {
        self.deployment_error = Some(error);
        self
    }

    pub fn failing_submit(mut self, message: &str) -> Self {
        self.fail_on_submit = Some(message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.borrow().iter().filter(|c| matches(c)).count()
    }

    /// Serialized request bodies in submission order
    pub fn submitted(&self) -> Vec<Value> {
        self.submitted.borrow().clone()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn next_state(&self) -> &'static str {
        let mut states = self.states.borrow_mut();
        if states.len() > 1 {
            states.pop_front().unwrap_or("Succeeded")
        } else {
            states.front().copied().unwrap_or("Succeeded")
        }
    }
}

impl CredentialProvider for FakeAzure {
    fn cached_account(
        &self,
        _subscription: &SubscriptionId,
    ) -> azdeploy::Result<Option<AccountInfo>> {
        self.record(Call::Account);
        Ok(self.logged_in.get().then(|| AccountInfo {
            subscription_name: "Dev Subscription".to_string(),
            user: Some("dev@example.com".to_string()),
            tenant_id: Some("tenant".to_string()),
        }))
    }

    fn login(&self, _method: &LoginMethod) -> azdeploy::Result<()> {
        self.record(Call::Login);
        self.logged_in.set(true);
        Ok(())
    }

    fn select_subscription(&self, _subscription: &SubscriptionId) -> azdeploy::Result<()> {
        self.record(Call::SelectSubscription);
        Ok(())
    }
}

impl ResourceManager for FakeAzure {
    fn group_exists(&self, _session: &Session, name: &str) -> azdeploy::Result<bool> {
        self.record(Call::GroupExists(name.to_string()));
        Ok(self.groups.borrow().contains(name))
    }

    fn create_or_update_group(
        &self,
        _session: &Session,
        name: &str,
        region: &str,
    ) -> azdeploy::Result<()> {
        self.record(Call::CreateGroup {
            name: name.to_string(),
            region: region.to_string(),
        });
        self.groups.borrow_mut().insert(name.to_string());
        Ok(())
    }

    fn begin_delete_group(&self, _session: &Session, name: &str) -> azdeploy::Result<()> {
        self.record(Call::DeleteGroup(name.to_string()));
        self.groups.borrow_mut().remove(name);
        Ok(())
    }

    fn begin_create_or_update_deployment(
        &self,
        _session: &Session,
        resource_group: &str,
        name: &str,
        request: &DeploymentRequest,
    ) -> azdeploy::Result<()> {
        self.record(Call::Submit {
            resource_group: resource_group.to_string(),
            name: name.to_string(),
        });
        if let Some(ref message) = self.fail_on_submit {
            return Err(DeployError::provider("submit deployment", message.clone()));
        }
        let body = serde_json::to_value(request)
            .map_err(|e| DeployError::provider("serialize deployment", e.to_string()))?;
        self.submitted.borrow_mut().push(body);
        Ok(())
    }

    fn get_deployment(
        &self,
        _session: &Session,
        _resource_group: &str,
        name: &str,
    ) -> azdeploy::Result<DeploymentSnapshot> {
        self.record(Call::GetDeployment(name.to_string()));
        let mut snapshot = DeploymentSnapshot::new(self.next_state());
        match snapshot.raw_state.as_str() {
            "Succeeded" => snapshot.outputs = self.outputs.clone(),
            "Failed" | "Canceled" => snapshot.error = self.deployment_error.clone(),
            _ => {}
        }
        snapshot.correlation_id = Some("corr-1234".to_string());
        Ok(snapshot)
    }
}

impl TemplateCompiler for FakeAzure {
    fn compile(&self, _path: &Path) -> azdeploy::Result<Value> {
        self.record(Call::Compile);
        Ok(json!({
            "$schema": "https://schema.management.azure.com/schemas/2019-04-01/deploymentTemplate.json#",
            "resources": []
        }))
    }
}

/// Write `content` to `name` inside `dir`
pub fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Options for the demo deployment with no waiting between polls
pub fn demo_options(template: PathBuf) -> DeployOptions {
    DeployOptions {
        subscription_id: SUBSCRIPTION.to_string(),
        resource_group: RESOURCE_GROUP.to_string(),
        region: REGION.to_string(),
        template,
        parameters: None,
        deploy_prefix: "pydeploy".to_string(),
        wait: WaitConfig {
            poll_interval: Duration::ZERO,
            timeout: None,
        },
    }
}
