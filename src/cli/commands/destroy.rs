use anyhow::Result;
use std::io::{self, Write};

use super::helpers::{load_config, login_from_env, resolve_resource_group, resolve_subscription};
use crate::azure::AzureCli;
use crate::cli::DestroyArgs;
use crate::orchestrator::Orchestrator;
use crate::resource_group::Teardown;

pub fn execute_destroy(args: DestroyArgs) -> Result<()> {
    let config = load_config()?;
    let subscription_id = resolve_subscription(args.target.subscription_id, &config)?;
    let resource_group = resolve_resource_group(args.target.resource_group, &config)?;
    let login = login_from_env(&args.auth, &config)?;

    eprintln!("Destroying resource group\n");
    eprintln!("Subscription:   {}", subscription_id);
    eprintln!("Resource Group: {}", resource_group);
    eprintln!();

    if !args.force {
        eprintln!("This will delete the resource group and every resource in it.");
        eprint!("Are you sure? (yes/no): ");
        io::stderr().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if input.trim() != "yes" {
            eprintln!("Aborted.");
            return Ok(());
        }
    }

    let cli = AzureCli::new();
    let orchestrator = Orchestrator::new(&cli, &cli, login);

    eprintln!("\n==> Deleting resource group");
    match orchestrator.destroy_resource_group(&subscription_id, &resource_group)? {
        Teardown::DeletionStarted => {
            eprintln!("    ✓ Resource group deletion initiated");
            eprintln!("    Note: Deletion may take several minutes to complete");
        }
        Teardown::NotFound => eprintln!("    Resource group does not exist (skipping)"),
    }

    Ok(())
}
