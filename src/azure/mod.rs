// src/azure/mod.rs
//! Control plane backed by the Azure CLI (`az`).

mod account;
mod bicep;
mod deployment;
mod group;

pub use account::AccountCli;
pub use bicep::BicepCli;
pub use deployment::{deployment_url, DeploymentCli};
pub use group::GroupCli;

use serde::de::DeserializeOwned;
use std::path::Path;
use std::process::{Command, Output};

use crate::deployment::DeploymentSnapshot;
use crate::error::{DeployError, Result};
use crate::provider::{CredentialProvider, ResourceManager, TemplateCompiler};
use crate::session::{AccountInfo, LoginMethod, Session};
use crate::subscription::SubscriptionId;
use crate::template::DeploymentRequest;

const DEFAULT_PROGRAM: &str = "az";

/// Azure CLI wrapper struct
pub struct AzureCli {
    program: String,
}

impl Default for AzureCli {
    fn default() -> Self {
        Self::new()
    }
}

impl AzureCli {
    pub fn new() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }

    /// Use a different `az` executable (e.g. a wrapper script)
    pub fn with_program(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }

    fn command(&self) -> Command {
        Command::new(&self.program)
    }

    // Service accessors
    pub fn account(&self) -> AccountCli<'_> {
        AccountCli { az: self }
    }
    pub fn group(&self) -> GroupCli<'_> {
        GroupCli { az: self }
    }
    pub fn deployment(&self) -> DeploymentCli<'_> {
        DeploymentCli { az: self }
    }
    pub fn bicep(&self) -> BicepCli<'_> {
        BicepCli { az: self }
    }
}

impl CredentialProvider for AzureCli {
    fn cached_account(&self, subscription: &SubscriptionId) -> Result<Option<AccountInfo>> {
        self.account().show(subscription)
    }

    fn login(&self, method: &LoginMethod) -> Result<()> {
        self.account().login(method)
    }

    fn select_subscription(&self, subscription: &SubscriptionId) -> Result<()> {
        self.account().set(subscription)
    }
}

impl ResourceManager for AzureCli {
    fn group_exists(&self, session: &Session, name: &str) -> Result<bool> {
        self.group().exists(&session.subscription, name)
    }

    fn create_or_update_group(&self, session: &Session, name: &str, region: &str) -> Result<()> {
        self.group().create(&session.subscription, name, region)
    }

    fn begin_delete_group(&self, session: &Session, name: &str) -> Result<()> {
        self.group().delete_no_wait(&session.subscription, name)
    }

    fn begin_create_or_update_deployment(
        &self,
        session: &Session,
        resource_group: &str,
        name: &str,
        request: &DeploymentRequest,
    ) -> Result<()> {
        self.deployment()
            .begin_create_or_update(&session.subscription, resource_group, name, request)
    }

    fn get_deployment(
        &self,
        session: &Session,
        resource_group: &str,
        name: &str,
    ) -> Result<DeploymentSnapshot> {
        self.deployment()
            .show(&session.subscription, resource_group, name)
    }
}

impl TemplateCompiler for AzureCli {
    fn compile(&self, path: &Path) -> Result<serde_json::Value> {
        self.bicep().build(path)
    }
}

/// Execute a command, mapping spawn failures to a provider error
fn output(cmd: &mut Command, operation: &str) -> Result<Output> {
    cmd.output().map_err(|e| {
        DeployError::provider(
            operation,
            format!("failed to execute az command ({}). Is Azure CLI installed?", e),
        )
    })
}

/// Run command and return trimmed stdout, or the provider's stderr on failure
fn run(cmd: &mut Command, operation: &str) -> Result<String> {
    let out = output(cmd, operation)?;
    if !out.status.success() {
        return Err(failure(operation, &out));
    }
    Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
}

/// Run command and parse JSON output
fn run_json<T: DeserializeOwned>(cmd: &mut Command, operation: &str) -> Result<T> {
    let stdout = run(cmd, operation)?;
    serde_json::from_str(&stdout).map_err(|e| {
        DeployError::provider(operation, format!("unexpected az output: {}", e))
    })
}

fn failure(operation: &str, out: &Output) -> DeployError {
    let stderr = String::from_utf8_lossy(&out.stderr);
    let message = match stderr.trim() {
        "" => format!("az exited with {}", out.status),
        msg => msg.to_string(),
    };
    DeployError::provider(operation, message)
}
