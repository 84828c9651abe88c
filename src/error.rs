//! Error taxonomy for the deploy pipeline.
//!
//! Every stage returns [`DeployError`]; the first failure short-circuits the
//! remaining stages and nothing already created is rolled back.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::deployment::ProvisioningState;

pub type Result<T> = std::result::Result<T, DeployError>;

/// Which input file a file-level error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Template,
    Parameters,
}

impl std::fmt::Display for FileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileRole::Template => write!(f, "template"),
            FileRole::Parameters => write!(f, "parameters"),
        }
    }
}

#[derive(Error, Debug)]
pub enum DeployError {
    /// Malformed input detected locally, before any remote call
    #[error("invalid {field} '{value}': {reason}")]
    Validation {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// No usable credential for the subscription after login was attempted
    #[error("authentication failed for subscription {subscription}: {message}")]
    Auth {
        subscription: String,
        message: String,
    },

    #[error("{role} file not found: {path}")]
    NotFound { role: FileRole, path: PathBuf },

    #[error("{role} file {path} is not a valid template document: {message}")]
    Parse {
        role: FileRole,
        path: PathBuf,
        message: String,
    },

    #[error("failed to read {role} file {path}: {source}")]
    Io {
        role: FileRole,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Remote call failed; the message is the provider's own output
    #[error("{operation} failed: {message}")]
    Provider { operation: String, message: String },

    /// Deployment reached Failed or Canceled
    #[error("deployment '{name}' finished as {state}: {diagnostics}")]
    Deployment {
        name: String,
        state: ProvisioningState,
        diagnostics: serde_json::Value,
    },

    #[error("deployment '{name}' still running after {elapsed:?}; it was not cancelled remotely")]
    Timeout { name: String, elapsed: Duration },
}

/// Fieldless classification of [`DeployError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Auth,
    NotFound,
    Parse,
    Io,
    Provider,
    Deployment,
    Timeout,
}

impl DeployError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeployError::Validation { .. } => ErrorKind::Validation,
            DeployError::Auth { .. } => ErrorKind::Auth,
            DeployError::NotFound { .. } => ErrorKind::NotFound,
            DeployError::Parse { .. } => ErrorKind::Parse,
            DeployError::Io { .. } => ErrorKind::Io,
            DeployError::Provider { .. } => ErrorKind::Provider,
            DeployError::Deployment { .. } => ErrorKind::Deployment,
            DeployError::Timeout { .. } => ErrorKind::Timeout,
        }
    }

    pub fn validation(field: &'static str, value: &str, reason: impl Into<String>) -> Self {
        DeployError::Validation {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn provider(operation: impl Into<String>, message: impl Into<String>) -> Self {
        DeployError::Provider {
            operation: operation.into(),
            message: message.into(),
        }
    }
}
