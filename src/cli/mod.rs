pub mod commands;
pub mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use config::AuthMode;

#[derive(Parser)]
#[command(name = "azdeploy")]
#[command(about = "Deploy ARM or Bicep templates to an Azure resource group")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a .azdeploy.toml with defaults for this directory
    Init(InitArgs),
    /// Deploy a template and wait for it to finish
    Deploy(DeployArgs),
    /// Create the resource group if it does not exist
    Group(GroupArgs),
    /// Delete the resource group
    Destroy(DestroyArgs),
    /// Show the state of a deployment
    Status(StatusArgs),
}

/// Subscription / resource group selection shared by all remote commands
#[derive(clap::Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Subscription id (falls back to .azdeploy.toml)
    #[arg(long = "subscription-id", visible_alias = "sub", env = "AZURE_SUBSCRIPTION_ID")]
    pub subscription_id: Option<String>,

    /// Resource group name (falls back to .azdeploy.toml)
    #[arg(long, visible_alias = "rsg", env = "AZURE_RESOURCE_GROUP")]
    pub resource_group: Option<String>,
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct AuthArgs {
    /// How to log in when no cached az login covers the subscription
    #[arg(long, value_enum)]
    pub auth: Option<AuthMode>,

    /// Service principal application id
    #[arg(long, env = "AZURE_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Service principal tenant id
    #[arg(long, env = "AZURE_TENANT_ID")]
    pub tenant_id: Option<String>,
}

#[derive(clap::Args)]
pub struct InitArgs {
    #[arg(long = "subscription-id")]
    pub subscription_id: Option<String>,

    #[arg(long)]
    pub resource_group: Option<String>,

    #[arg(long, visible_alias = "location")]
    pub region: Option<String>,

    /// Deployment name prefix
    #[arg(long)]
    pub prefix: Option<String>,

    #[arg(long, value_enum)]
    pub auth: Option<AuthMode>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct DeployArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub auth: AuthArgs,

    /// Region for the resource group if it has to be created
    #[arg(long, visible_alias = "location", env = "AZURE_LOCATION")]
    pub region: Option<String>,

    /// ARM template (.json) or Bicep file (.bicep)
    #[arg(long, short = 't')]
    pub template: PathBuf,

    /// Parameters file wrapping values under a "parameters" member
    #[arg(long, short = 'p')]
    pub parameters: Option<PathBuf>,

    /// Deployment name prefix; the name is <prefix>-<YYYY-MM-DD>
    #[arg(long)]
    pub prefix: Option<String>,

    /// Seconds between status polls
    #[arg(long)]
    pub poll_interval_secs: Option<u64>,

    /// Stop waiting after this many seconds (the deployment keeps running)
    #[arg(long, conflicts_with = "no_timeout")]
    pub timeout_secs: Option<u64>,

    /// Wait for the deployment indefinitely
    #[arg(long)]
    pub no_timeout: bool,
}

#[derive(clap::Args)]
pub struct GroupArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub auth: AuthArgs,

    #[arg(long, visible_alias = "location", env = "AZURE_LOCATION")]
    pub region: Option<String>,
}

#[derive(clap::Args)]
pub struct DestroyArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub auth: AuthArgs,

    /// Skip confirmation prompt
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args)]
pub struct StatusArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub auth: AuthArgs,

    /// Deployment name (defaults to today's name for the configured prefix)
    #[arg(long)]
    pub name: Option<String>,
}
