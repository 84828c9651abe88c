use tracing::info;

use crate::error::{DeployError, Result};
use crate::provider::ResourceManager;
use crate::session::Session;

/// Azure limit on resource group name length
const MAX_NAME_LEN: usize = 90;

/// Desired resource group. Existence is re-checked on every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroup {
    pub name: String,
    pub region: String,
}

impl ResourceGroup {
    pub fn new(name: &str, region: &str) -> Result<Self> {
        validate_name(name)?;
        let region = region.trim();
        if region.is_empty() {
            return Err(DeployError::validation("region", region, "must not be empty"));
        }
        Ok(Self {
            name: name.to_string(),
            region: region.to_string(),
        })
    }
}

/// Check a resource group name against Azure's naming rules
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(DeployError::validation(
            "resource group",
            name,
            format!("length must be 1-{} characters", MAX_NAME_LEN),
        ));
    }
    if name.ends_with('.') {
        return Err(DeployError::validation(
            "resource group",
            name,
            "must not end with a period",
        ));
    }
    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '(' | ')');
    if !name.chars().all(allowed) {
        return Err(DeployError::validation(
            "resource group",
            name,
            "only letters, digits, '-', '_', '.', '(' and ')' are allowed",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    Created,
    AlreadyExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Teardown {
    DeletionStarted,
    NotFound,
}

pub struct ResourceGroupReconciler<'a> {
    manager: &'a dyn ResourceManager,
}

impl<'a> ResourceGroupReconciler<'a> {
    pub fn new(manager: &'a dyn ResourceManager) -> Self {
        Self { manager }
    }

    /// Create the group if it is missing. An existing group is left alone,
    /// including its region.
    pub fn reconcile(&self, session: &Session, group: &ResourceGroup) -> Result<Reconciled> {
        if self.manager.group_exists(session, &group.name)? {
            info!(resource_group = %group.name, "Resource group exists");
            return Ok(Reconciled::AlreadyExists);
        }

        info!(
            resource_group = %group.name,
            region = %group.region,
            "Creating resource group - '{}'",
            group.name
        );
        self.manager
            .create_or_update_group(session, &group.name, &group.region)?;
        Ok(Reconciled::Created)
    }

    /// Start deleting the group if it exists. Does not wait for completion.
    pub fn destroy(&self, session: &Session, name: &str) -> Result<Teardown> {
        if !self.manager.group_exists(session, name)? {
            info!(resource_group = %name, "Resource group does not exist");
            return Ok(Teardown::NotFound);
        }

        info!(resource_group = %name, "Deleting resource group - '{}'", name);
        self.manager.begin_delete_group(session, name)?;
        Ok(Teardown::DeletionStarted)
    }
}
