use crate::error::{DeployError, Result};

/// Group lengths of the canonical `8-4-4-4-12` subscription id
const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

/// Check that `id` is a hyphenated hex subscription id. Never fails.
pub fn validate(id: &str) -> bool {
    let mut parts = id.split('-');
    for len in GROUPS {
        match parts.next() {
            Some(part) if part.len() == len && part.bytes().all(|b| b.is_ascii_hexdigit()) => {}
            _ => return false,
        }
    }
    parts.next().is_none()
}

/// A subscription id that passed [`validate`]; downstream stages trust it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    pub fn parse(id: &str) -> Result<Self> {
        if validate(id) {
            Ok(Self(id.to_string()))
        } else {
            Err(DeployError::validation(
                "subscription id",
                id,
                "expected xxxxxxxx-xxxx-xxxx-xxxx-xxxxxxxxxxxx",
            ))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
