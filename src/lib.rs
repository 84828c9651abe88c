// src/lib.rs
pub mod azure;
pub mod cli;
pub mod deployment;
pub mod error;
pub mod logging;
pub mod orchestrator;
pub mod provider;
pub mod resource_group;
pub mod session;
pub mod subscription;
pub mod template;

pub use error::{DeployError, ErrorKind, FileRole, Result};
pub use orchestrator::{DeployOptions, DeployOutcome, Orchestrator};

// Re-export tracing for use in other modules
pub use tracing;
