//! Submitting template deployments and waiting for them to finish.

mod naming;
mod submit;
mod wait;

pub use naming::{deployment_name, todays_deployment_name, validate_prefix, DEFAULT_DEPLOY_PREFIX};
pub use submit::{DeploymentHandle, DeploymentSubmitter};
pub use wait::{DeploymentWaiter, PollUpdate, ProgressSink, WaitConfig, DEFAULT_POLL_INTERVAL};

use serde_json::Value;

/// Lifecycle of a long-running deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningState {
    NotStarted,
    InProgress,
    Succeeded,
    Failed,
    Canceled,
}

impl ProvisioningState {
    /// Map an ARM `provisioningState` string. Unknown values are treated as
    /// still running.
    pub fn from_arm(state: &str) -> Self {
        match state.to_ascii_lowercase().as_str() {
            "notstarted" | "accepted" => ProvisioningState::NotStarted,
            "succeeded" => ProvisioningState::Succeeded,
            "failed" => ProvisioningState::Failed,
            "canceled" | "cancelled" => ProvisioningState::Canceled,
            _ => ProvisioningState::InProgress,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ProvisioningState::Succeeded | ProvisioningState::Failed | ProvisioningState::Canceled
        )
    }
}

impl std::fmt::Display for ProvisioningState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProvisioningState::NotStarted => "NotStarted",
            ProvisioningState::InProgress => "InProgress",
            ProvisioningState::Succeeded => "Succeeded",
            ProvisioningState::Failed => "Failed",
            ProvisioningState::Canceled => "Canceled",
        };
        f.write_str(s)
    }
}

/// One observation of a deployment as reported by the control plane
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentSnapshot {
    pub state: ProvisioningState,
    /// State string exactly as the provider reported it
    pub raw_state: String,
    pub outputs: Option<Value>,
    pub error: Option<Value>,
    pub timestamp: Option<String>,
    pub correlation_id: Option<String>,
}

impl DeploymentSnapshot {
    pub fn new(raw_state: &str) -> Self {
        Self {
            state: ProvisioningState::from_arm(raw_state),
            raw_state: raw_state.to_string(),
            outputs: None,
            error: None,
            timestamp: None,
            correlation_id: None,
        }
    }
}

/// Outcome of a deployment that reached Succeeded
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentResult {
    pub name: String,
    pub resource_group: String,
    pub state: ProvisioningState,
    /// Template outputs; `Value::Null` when the template declares none
    pub outputs: Value,
    pub timestamp: Option<String>,
    pub correlation_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_arm_maps_terminal_states() {
        assert_eq!(ProvisioningState::from_arm("Succeeded"), ProvisioningState::Succeeded);
        assert_eq!(ProvisioningState::from_arm("Failed"), ProvisioningState::Failed);
        assert_eq!(ProvisioningState::from_arm("Canceled"), ProvisioningState::Canceled);
    }

    #[test]
    fn test_from_arm_maps_running_states() {
        assert_eq!(ProvisioningState::from_arm("Accepted"), ProvisioningState::NotStarted);
        for s in ["Running", "Creating", "Updating", "Validating", "Waiting", "Whatever"] {
            assert_eq!(ProvisioningState::from_arm(s), ProvisioningState::InProgress, "{}", s);
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(ProvisioningState::Succeeded.is_terminal());
        assert!(ProvisioningState::Canceled.is_terminal());
        assert!(!ProvisioningState::NotStarted.is_terminal());
        assert!(!ProvisioningState::InProgress.is_terminal());
    }
}
