use anyhow::Result;

use super::helpers::{
    load_config, login_from_env, resolve_prefix, resolve_resource_group, resolve_subscription,
};
use crate::azure::AzureCli;
use crate::cli::StatusArgs;
use crate::deployment::todays_deployment_name;
use crate::orchestrator::Orchestrator;

pub fn execute_status(args: StatusArgs) -> Result<()> {
    let config = load_config()?;
    let subscription_id = resolve_subscription(args.target.subscription_id, &config)?;
    let resource_group = resolve_resource_group(args.target.resource_group, &config)?;
    let login = login_from_env(&args.auth, &config)?;
    let name = args
        .name
        .unwrap_or_else(|| todays_deployment_name(&resolve_prefix(None, &config)));

    let cli = AzureCli::new();
    let orchestrator = Orchestrator::new(&cli, &cli, login);
    let snapshot = orchestrator.deployment_status(&subscription_id, &resource_group, &name)?;

    eprintln!("Deployment:     {}", name);
    eprintln!("Resource Group: {}", resource_group);
    eprintln!("State:          {} ({})", snapshot.state, snapshot.raw_state);
    if let Some(ref timestamp) = snapshot.timestamp {
        eprintln!("Timestamp:      {}", timestamp);
    }
    if let Some(ref correlation_id) = snapshot.correlation_id {
        eprintln!("Correlation id: {}", correlation_id);
    }
    if let Some(ref error) = snapshot.error {
        eprintln!("Error:\n{}", serde_json::to_string_pretty(error)?);
    }
    if let Some(ref outputs) = snapshot.outputs {
        println!("{}", serde_json::to_string_pretty(outputs)?);
    }

    Ok(())
}
