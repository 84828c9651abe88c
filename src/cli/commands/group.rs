use anyhow::Result;

use super::helpers::{
    load_config, login_from_env, resolve_region, resolve_resource_group, resolve_subscription,
};
use crate::azure::AzureCli;
use crate::cli::GroupArgs;
use crate::orchestrator::Orchestrator;
use crate::resource_group::Reconciled;

pub fn execute_group(args: GroupArgs) -> Result<()> {
    let config = load_config()?;
    let subscription_id = resolve_subscription(args.target.subscription_id, &config)?;
    let resource_group = resolve_resource_group(args.target.resource_group, &config)?;
    let region = resolve_region(args.region, &config)?;
    let login = login_from_env(&args.auth, &config)?;

    let cli = AzureCli::new();
    let orchestrator = Orchestrator::new(&cli, &cli, login);

    eprintln!("==> Ensuring resource group {} ({})", resource_group, region);
    match orchestrator.ensure_resource_group(&subscription_id, &resource_group, &region)? {
        Reconciled::Created => eprintln!("    ✓ Created"),
        Reconciled::AlreadyExists => eprintln!("    Already exists (skipping)"),
    }

    Ok(())
}
