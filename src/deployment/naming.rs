use chrono::{Local, NaiveDate};

use crate::error::{DeployError, Result};

pub const DEFAULT_DEPLOY_PREFIX: &str = "pydeploy";

/// ARM limit on deployment name length
const MAX_NAME_LEN: usize = 64;
/// Length of `-YYYY-MM-DD`
const DATE_SUFFIX_LEN: usize = 11;

/// `<prefix>-<YYYY-MM-DD>`. Same-day runs reuse the name on purpose: ARM
/// treats a redeploy under an existing name as an update.
pub fn deployment_name(prefix: &str, date: NaiveDate) -> String {
    format!("{}-{}", prefix, date.format("%Y-%m-%d"))
}

/// Deployment name for the current local date
pub fn todays_deployment_name(prefix: &str) -> String {
    deployment_name(prefix, Local::now().date_naive())
}

/// Check that a prefix yields a valid ARM deployment name
pub fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() || prefix.len() + DATE_SUFFIX_LEN > MAX_NAME_LEN {
        return Err(DeployError::validation(
            "deployment prefix",
            prefix,
            format!("length must be 1-{} characters", MAX_NAME_LEN - DATE_SUFFIX_LEN),
        ));
    }
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '(' | ')');
    if !prefix.chars().all(allowed) {
        return Err(DeployError::validation(
            "deployment prefix",
            prefix,
            "only letters, digits, '-', '_', '.', '(' and ')' are allowed",
        ));
    }
    Ok(())
}
