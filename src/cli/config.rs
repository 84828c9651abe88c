use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const CONFIG_FILENAME: &str = ".azdeploy.toml";

/// Credential source used when no cached `az` login covers the subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMode {
    /// Open the interactive `az login` flow
    #[default]
    Interactive,
    /// Only reuse an existing login; fail instead of prompting
    Cached,
    /// Log in with AZURE_CLIENT_ID / AZURE_TENANT_ID / AZURE_CLIENT_SECRET
    ServicePrincipal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub subscription_id: Option<String>,
    #[serde(default)]
    pub resource_group: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub deploy_prefix: Option<String>,
    #[serde(default)]
    pub auth: Option<AuthMode>,
    #[serde(default)]
    pub wait: WaitSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaitSettings {
    #[serde(default)]
    pub poll_interval_secs: Option<u64>,
    /// 0 disables the deadline
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_config_from_path(CONFIG_FILENAME)
    }

    pub fn save(&self) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(CONFIG_FILENAME, content)
            .with_context(|| format!("Failed to write {}", CONFIG_FILENAME))?;
        Ok(())
    }
}

pub fn load_config_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let content = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.as_ref().display()))?;
    Ok(config)
}
