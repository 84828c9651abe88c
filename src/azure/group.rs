use super::{run, AzureCli};
use crate::error::{DeployError, Result};
use crate::subscription::SubscriptionId;

/// Resource group operations
pub struct GroupCli<'a> {
    pub(super) az: &'a AzureCli,
}

impl GroupCli<'_> {
    /// Check if resource group exists
    pub fn exists(&self, subscription: &SubscriptionId, name: &str) -> Result<bool> {
        let operation = format!("check resource group '{}'", name);
        let mut cmd = self.az.command();
        cmd.args([
            "group",
            "exists",
            "--name",
            name,
            "--subscription",
            subscription.as_str(),
        ]);
        let stdout = run(&mut cmd, &operation)?;
        parse_exists(&stdout).ok_or_else(|| {
            DeployError::provider(operation, format!("unexpected az output: {}", stdout))
        })
    }

    /// Create resource group (create-or-update; region is the only property set)
    pub fn create(&self, subscription: &SubscriptionId, name: &str, region: &str) -> Result<()> {
        let mut cmd = self.az.command();
        cmd.args([
            "group",
            "create",
            "--name",
            name,
            "--location",
            region,
            "--subscription",
            subscription.as_str(),
            "--output",
            "none",
        ]);
        run(
            &mut cmd,
            &format!("create resource group '{}' in region '{}'", name, region),
        )?;
        Ok(())
    }

    /// Start deleting resource group; returns before deletion finishes
    pub fn delete_no_wait(&self, subscription: &SubscriptionId, name: &str) -> Result<()> {
        let mut cmd = self.az.command();
        cmd.args([
            "group",
            "delete",
            "--name",
            name,
            "--subscription",
            subscription.as_str(),
            "--yes",
            "--no-wait",
        ]);
        run(&mut cmd, &format!("delete resource group '{}'", name))?;
        Ok(())
    }
}

fn parse_exists(stdout: &str) -> Option<bool> {
    match stdout.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exists() {
        assert_eq!(parse_exists("true\n"), Some(true));
        assert_eq!(parse_exists("false"), Some(false));
        assert_eq!(parse_exists("ERROR"), None);
    }
}
