use anyhow::{bail, Result};
use std::path::Path;

use crate::cli::config::{Config, WaitSettings, CONFIG_FILENAME};
use crate::cli::InitArgs;
use crate::deployment::validate_prefix;
use crate::resource_group;
use crate::subscription::SubscriptionId;

pub fn execute_init(args: InitArgs) -> Result<()> {
    // Check if config already exists
    if Path::new(CONFIG_FILENAME).exists() && !args.force {
        bail!(
            "{} already exists. Use --force to overwrite.",
            CONFIG_FILENAME
        );
    }

    // Catch typos now rather than on the first deploy
    let subscription_id = args
        .subscription_id
        .as_deref()
        .map(SubscriptionId::parse)
        .transpose()?
        .map(|id| id.to_string());
    if let Some(ref rg) = args.resource_group {
        resource_group::validate_name(rg)?;
    }
    if let Some(ref prefix) = args.prefix {
        validate_prefix(prefix)?;
    }

    let config = Config {
        subscription_id,
        resource_group: args.resource_group,
        region: args.region,
        deploy_prefix: args.prefix,
        auth: args.auth,
        wait: WaitSettings::default(),
    };

    config.save()?;

    eprintln!("Created {}", CONFIG_FILENAME);
    if let Some(ref id) = config.subscription_id {
        eprintln!("  subscription_id: {}", id);
    }
    if let Some(ref rg) = config.resource_group {
        eprintln!("  resource_group: {}", rg);
    }
    if let Some(ref region) = config.region {
        eprintln!("  region: {}", region);
    }
    if let Some(ref prefix) = config.deploy_prefix {
        eprintln!("  deploy_prefix: {}", prefix);
    }
    eprintln!();
    eprintln!("Next: azdeploy deploy --template <file>");

    Ok(())
}
