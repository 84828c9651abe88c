//! Subscription-scoped sessions.
//!
//! A [`Session`] is built once per run by [`SessionManager`] and passed by
//! reference to every later stage. Nothing about the login is kept in
//! process-wide state.

use tracing::{info, warn};

use crate::error::{DeployError, Result};
use crate::provider::CredentialProvider;
use crate::subscription::SubscriptionId;

/// How to obtain credentials when no cached login covers the subscription
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoginMethod {
    /// Only use an existing login; never prompt
    CachedSession,
    /// Launch the provider's interactive (browser) login
    #[default]
    Interactive,
    ServicePrincipal(ServicePrincipal),
}

#[derive(Clone, PartialEq, Eq)]
pub struct ServicePrincipal {
    pub client_id: String,
    pub tenant_id: String,
    pub secret: String,
}

impl std::fmt::Debug for ServicePrincipal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServicePrincipal")
            .field("client_id", &self.client_id)
            .field("tenant_id", &self.tenant_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Account details reported by the credential backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountInfo {
    pub subscription_name: String,
    pub user: Option<String>,
    pub tenant_id: Option<String>,
}

/// Whether the session reused an existing login or created one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSource {
    Cached,
    LoggedIn,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub subscription: SubscriptionId,
    pub account: AccountInfo,
    pub source: SessionSource,
}

pub struct SessionManager<'a> {
    credentials: &'a dyn CredentialProvider,
    method: LoginMethod,
}

impl<'a> SessionManager<'a> {
    pub fn new(credentials: &'a dyn CredentialProvider, method: LoginMethod) -> Self {
        Self {
            credentials,
            method,
        }
    }

    /// Reuse the cached login for `subscription`, logging in only when none
    /// exists. Interactive login blocks until the user finishes it and is
    /// never retried.
    pub fn ensure_session(&self, subscription: &SubscriptionId) -> Result<Session> {
        if let Some(account) = self.credentials.cached_account(subscription)? {
            info!(
                subscription = %subscription,
                account = %account.subscription_name,
                "Deploying: '{}' with Id: '{}'",
                account.subscription_name,
                subscription
            );
            return Ok(Session {
                subscription: subscription.clone(),
                account,
                source: SessionSource::Cached,
            });
        }

        if self.method == LoginMethod::CachedSession {
            return Err(auth_error(
                subscription,
                "no cached login covers this subscription; run 'az login' or choose another auth method",
            ));
        }

        warn!(subscription = %subscription, "Logging in to Azure CLI");
        self.credentials
            .login(&self.method)
            .map_err(|e| auth_error(subscription, e.to_string()))?;
        self.credentials
            .select_subscription(subscription)
            .map_err(|e| auth_error(subscription, e.to_string()))?;

        let account = self
            .credentials
            .cached_account(subscription)
            .map_err(|e| auth_error(subscription, e.to_string()))?
            .ok_or_else(|| {
                auth_error(
                    subscription,
                    "login completed but the subscription is not visible to this account",
                )
            })?;

        info!(
            subscription = %subscription,
            account = %account.subscription_name,
            "Logged in; deploying to '{}'",
            account.subscription_name
        );
        Ok(Session {
            subscription: subscription.clone(),
            account,
            source: SessionSource::LoggedIn,
        })
    }
}

fn auth_error(subscription: &SubscriptionId, message: impl Into<String>) -> DeployError {
    DeployError::Auth {
        subscription: subscription.to_string(),
        message: message.into(),
    }
}
