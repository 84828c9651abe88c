use std::path::Path;

use super::{run_json, AzureCli};
use crate::error::Result;

/// Bicep compiler bundled with the Azure CLI
pub struct BicepCli<'a> {
    pub(super) az: &'a AzureCli,
}

impl BicepCli<'_> {
    /// Compile a `.bicep` file to an ARM JSON template
    pub fn build(&self, path: &Path) -> Result<serde_json::Value> {
        let mut cmd = self.az.command();
        cmd.args(["bicep", "build", "--stdout", "--file"]).arg(path);
        run_json(&mut cmd, &format!("compile Bicep template {}", path.display()))
    }
}
