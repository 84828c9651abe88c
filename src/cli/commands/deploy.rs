use anyhow::Result;

use super::helpers::{
    load_config, login_from_env, resolve_prefix, resolve_region, resolve_resource_group,
    resolve_subscription, resolve_wait,
};
use crate::azure::AzureCli;
use crate::cli::DeployArgs;
use crate::deployment::PollUpdate;
use crate::orchestrator::{DeployOptions, Orchestrator};
use crate::resource_group::Reconciled;
use crate::session::SessionSource;

pub fn execute_deploy(args: DeployArgs) -> Result<()> {
    let config = load_config()?;
    let subscription_id = resolve_subscription(args.target.subscription_id, &config)?;
    let resource_group = resolve_resource_group(args.target.resource_group, &config)?;
    let region = resolve_region(args.region, &config)?;
    let login = login_from_env(&args.auth, &config)?;

    let options = DeployOptions {
        subscription_id,
        resource_group,
        region,
        template: args.template,
        parameters: args.parameters,
        deploy_prefix: resolve_prefix(args.prefix, &config),
        wait: resolve_wait(
            args.poll_interval_secs,
            args.timeout_secs,
            args.no_timeout,
            &config,
        ),
    };

    eprintln!("==> Deploying template");
    eprintln!("    Subscription:   {}", options.subscription_id);
    eprintln!("    Resource Group: {}", options.resource_group);
    eprintln!("    Region:         {}", options.region);
    eprintln!("    Template:       {}", options.template.display());
    if let Some(ref params) = options.parameters {
        eprintln!("    Parameters:     {}", params.display());
    }
    eprintln!();

    let cli = AzureCli::new();
    let orchestrator = Orchestrator::new(&cli, &cli, login).with_compiler(&cli);

    let mut progress = |update: &PollUpdate<'_>| {
        eprintln!(
            "    Deployment in progress.. ({}s)",
            update.elapsed.as_secs()
        );
    };
    let outcome = orchestrator.deploy(&options, &mut progress)?;

    match outcome.session.source {
        SessionSource::Cached => eprintln!("    Used cached login"),
        SessionSource::LoggedIn => eprintln!("    ✓ Logged in"),
    }
    match outcome.resource_group {
        Reconciled::Created => eprintln!("    ✓ Created resource group {}", options.resource_group),
        Reconciled::AlreadyExists => {
            eprintln!("    Resource group {} already exists", options.resource_group)
        }
    }

    let result = &outcome.deployment;
    eprintln!("\n==========================================");
    eprintln!("[ok] Deployment {} {}", result.name, result.state);
    if let Some(ref correlation_id) = result.correlation_id {
        eprintln!("     Correlation id: {}", correlation_id);
    }
    eprintln!("==========================================\n");

    // Outputs go to stdout so they can be piped
    eprintln!("Deployment result - ");
    println!("{}", serde_json::to_string_pretty(&result.outputs)?);

    Ok(())
}
