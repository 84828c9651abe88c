use anyhow::{bail, Result};
use std::path::Path;
use std::time::Duration;

use crate::cli::config::{AuthMode, Config, CONFIG_FILENAME};
use crate::cli::AuthArgs;
use crate::deployment::{WaitConfig, DEFAULT_DEPLOY_PREFIX, DEFAULT_POLL_INTERVAL};
use crate::session::{LoginMethod, ServicePrincipal};

/// Load config, distinguishing between "file not found" and "file invalid"
pub fn load_config() -> Result<Option<Config>> {
    if !Path::new(CONFIG_FILENAME).exists() {
        return Ok(None);
    }
    // File exists, so errors are real problems (malformed TOML, permission denied, etc.)
    Config::load().map(Some)
}

fn required(
    arg: Option<String>,
    from_config: impl FnOnce(&Config) -> Option<String>,
    config: &Option<Config>,
    what: &str,
    flag: &str,
    env: Option<&str>,
) -> Result<String> {
    if let Some(value) = arg.or_else(|| config.as_ref().and_then(from_config)) {
        return Ok(value);
    }
    let env_hint = env
        .map(|e| format!("\n  2. Set {}", e))
        .unwrap_or_default();
    let init_step = if env.is_some() { 3 } else { 2 };
    bail!(
        "No {} specified. Either:\n  1. Pass {} <value>{}\n  {}. Run `azdeploy init {} <value>` first",
        what,
        flag,
        env_hint,
        init_step,
        flag
    )
}

pub fn resolve_subscription(arg: Option<String>, config: &Option<Config>) -> Result<String> {
    // Pasted ids often carry a trailing newline; the library rejects padding
    required(
        arg,
        |c| c.subscription_id.clone(),
        config,
        "subscription id",
        "--subscription-id",
        Some("AZURE_SUBSCRIPTION_ID"),
    )
    .map(|id| id.trim().to_string())
}

pub fn resolve_resource_group(arg: Option<String>, config: &Option<Config>) -> Result<String> {
    required(
        arg,
        |c| c.resource_group.clone(),
        config,
        "resource group",
        "--resource-group",
        Some("AZURE_RESOURCE_GROUP"),
    )
}

pub fn resolve_region(arg: Option<String>, config: &Option<Config>) -> Result<String> {
    required(
        arg,
        |c| c.region.clone(),
        config,
        "region",
        "--region",
        Some("AZURE_LOCATION"),
    )
}

pub fn resolve_prefix(arg: Option<String>, config: &Option<Config>) -> String {
    arg.or_else(|| config.as_ref().and_then(|c| c.deploy_prefix.clone()))
        .unwrap_or_else(|| DEFAULT_DEPLOY_PREFIX.to_string())
}

/// Flag → config → default. A timeout of 0 (or `--no-timeout`) disables the deadline.
/// The poll interval is at least one second.
pub fn resolve_wait(
    poll_interval_secs: Option<u64>,
    timeout_secs: Option<u64>,
    no_timeout: bool,
    config: &Option<Config>,
) -> WaitConfig {
    let defaults = WaitConfig::default();
    let settings = config.as_ref().map(|c| &c.wait);

    let poll_interval = poll_interval_secs
        .or_else(|| settings.and_then(|w| w.poll_interval_secs))
        .map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or(DEFAULT_POLL_INTERVAL);

    let timeout = if no_timeout {
        None
    } else {
        match timeout_secs.or_else(|| settings.and_then(|w| w.timeout_secs)) {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => defaults.timeout,
        }
    };

    WaitConfig {
        poll_interval,
        timeout,
    }
}

/// Build the login method; the service principal secret only comes from the environment
pub fn resolve_login(
    auth: &AuthArgs,
    config: &Option<Config>,
    client_secret: Option<String>,
) -> Result<LoginMethod> {
    let mode = auth
        .auth
        .or_else(|| config.as_ref().and_then(|c| c.auth))
        .unwrap_or_default();

    match mode {
        AuthMode::Interactive => Ok(LoginMethod::Interactive),
        AuthMode::Cached => Ok(LoginMethod::CachedSession),
        AuthMode::ServicePrincipal => {
            let (Some(client_id), Some(tenant_id), Some(secret)) =
                (auth.client_id.clone(), auth.tenant_id.clone(), client_secret)
            else {
                bail!(
                    "Service principal login needs --client-id (AZURE_CLIENT_ID), \
                     --tenant-id (AZURE_TENANT_ID) and AZURE_CLIENT_SECRET"
                );
            };
            Ok(LoginMethod::ServicePrincipal(ServicePrincipal {
                client_id,
                tenant_id,
                secret,
            }))
        }
    }
}

/// [`resolve_login`] with the secret taken from `AZURE_CLIENT_SECRET`
pub fn login_from_env(auth: &AuthArgs, config: &Option<Config>) -> Result<LoginMethod> {
    resolve_login(auth, config, std::env::var("AZURE_CLIENT_SECRET").ok())
}
