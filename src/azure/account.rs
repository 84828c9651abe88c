use serde::Deserialize;
use tracing::debug;

use super::{failure, output, run, AzureCli};
use crate::error::{DeployError, Result};
use crate::session::{AccountInfo, LoginMethod};
use crate::subscription::SubscriptionId;

/// Account operations (login and subscription selection)
pub struct AccountCli<'a> {
    pub(super) az: &'a AzureCli,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountShowResponse {
    name: String,
    tenant_id: Option<String>,
    user: Option<AccountUser>,
}

#[derive(Debug, Deserialize)]
struct AccountUser {
    name: String,
}

impl AccountCli<'_> {
    /// `None` when the CLI has no login that can see `subscription`
    pub fn show(&self, subscription: &SubscriptionId) -> Result<Option<AccountInfo>> {
        let operation = "az account show";
        let mut cmd = self.az.command();
        cmd.args([
            "account",
            "show",
            "--subscription",
            subscription.as_str(),
            "--output",
            "json",
        ]);
        let out = output(&mut cmd, operation)?;
        if !out.status.success() {
            debug!(
                subscription = %subscription,
                stderr = %String::from_utf8_lossy(&out.stderr).trim(),
                "No cached login for subscription"
            );
            return Ok(None);
        }

        parse_account(&String::from_utf8_lossy(&out.stdout))
            .map(Some)
            .map_err(|e| DeployError::provider(operation, format!("unexpected az output: {}", e)))
    }

    pub fn login(&self, method: &LoginMethod) -> Result<()> {
        match method {
            LoginMethod::CachedSession => Err(DeployError::provider(
                "az login",
                "cached-session mode never starts a new login",
            )),
            LoginMethod::Interactive => {
                // Inherit the terminal: az may print a device code or open a browser
                let status = self
                    .az
                    .command()
                    .args(["login", "--output", "none"])
                    .status()
                    .map_err(|e| {
                        DeployError::provider(
                            "az login",
                            format!("failed to execute az command ({}). Is Azure CLI installed?", e),
                        )
                    })?;
                if !status.success() {
                    return Err(DeployError::provider(
                        "az login",
                        format!("az exited with {}", status),
                    ));
                }
                Ok(())
            }
            LoginMethod::ServicePrincipal(sp) => {
                let operation = "az login --service-principal";
                let mut cmd = self.az.command();
                cmd.args([
                    "login",
                    "--service-principal",
                    "--username",
                    &sp.client_id,
                    "--password",
                    &sp.secret,
                    "--tenant",
                    &sp.tenant_id,
                    "--output",
                    "none",
                ]);
                let out = output(&mut cmd, operation)?;
                if !out.status.success() {
                    return Err(failure(operation, &out));
                }
                Ok(())
            }
        }
    }

    pub fn set(&self, subscription: &SubscriptionId) -> Result<()> {
        let mut cmd = self.az.command();
        cmd.args(["account", "set", "--subscription", subscription.as_str()]);
        run(&mut cmd, "az account set")?;
        Ok(())
    }
}

fn parse_account(json: &str) -> serde_json::Result<AccountInfo> {
    let response: AccountShowResponse = serde_json::from_str(json)?;
    Ok(AccountInfo {
        subscription_name: response.name,
        user: response.user.map(|u| u.name),
        tenant_id: response.tenant_id,
    })
}
