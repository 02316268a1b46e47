//! Server configuration from environment variables.
//!
//!   ENTITLEMENT_DATABASE_URL : Postgres connection string (required; falls back to DATABASE_URL)
//!   ENTITLEMENT_JWT_SECRET   : JWT HMAC secret (required)
//!   ENTITLEMENT_BIND_ADDR    : listen address (default: 0.0.0.0:4200)
//!   ENTITLEMENT_TRIAL_DAYS   : trial length when not set in app_settings (default: 14)
//!   ENTITLEMENT_LOGIN_URL    : login redirect (default: /login)
//!   ENTITLEMENT_EXPIRED_URL  : expired landing redirect (default: /subscription/expired)
//!   ENTITLEMENT_DASHBOARD_URL : forbidden fallback redirect (default: /dashboard)

use anyhow::{anyhow, Context, Result};
use entitlement_core::gate::RedirectTarget;
use entitlement_core::policy::TrialPolicy;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:4200";

/// URLs for the gate's redirect identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectUrls {
    pub login: String,
    pub expired: String,
    pub dashboard: String,
}

impl RedirectUrls {
    pub fn url_for(&self, target: RedirectTarget) -> &str {
        match target {
            RedirectTarget::LoginPage => &self.login,
            RedirectTarget::ExpiredLandingPage => &self.expired,
            RedirectTarget::ForbiddenOrDashboard => &self.dashboard,
        }
    }
}

impl Default for RedirectUrls {
    fn default() -> Self {
        Self {
            login: "/login".into(),
            expired: "/subscription/expired".into(),
            dashboard: "/dashboard".into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    /// `None` when unset; the effective policy is decided at startup.
    pub trial_days: Option<TrialPolicy>,
    pub redirects: RedirectUrls,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("ENTITLEMENT_DATABASE_URL")
            .or_else(|| lookup("DATABASE_URL"))
            .ok_or_else(|| anyhow!("ENTITLEMENT_DATABASE_URL must be set"))?;
        let jwt_secret = lookup("ENTITLEMENT_JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow!("ENTITLEMENT_JWT_SECRET must be set"))?;
        let bind_addr = lookup("ENTITLEMENT_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());

        let trial_days = match lookup("ENTITLEMENT_TRIAL_DAYS") {
            Some(raw) => {
                let days: u32 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("ENTITLEMENT_TRIAL_DAYS is not a number: {raw}"))?;
                Some(TrialPolicy::new(days).context("ENTITLEMENT_TRIAL_DAYS")?)
            }
            None => None,
        };

        let defaults = RedirectUrls::default();
        let redirects = RedirectUrls {
            login: lookup("ENTITLEMENT_LOGIN_URL").unwrap_or(defaults.login),
            expired: lookup("ENTITLEMENT_EXPIRED_URL").unwrap_or(defaults.expired),
            dashboard: lookup("ENTITLEMENT_DASHBOARD_URL").unwrap_or(defaults.dashboard),
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            trial_days,
            redirects,
        })
    }

    /// `app_settings` wins over the environment, which wins over the default.
    pub fn effective_policy(&self, stored_days: Option<u32>) -> TrialPolicy {
        stored_days
            .and_then(|d| TrialPolicy::new(d).ok())
            .or(self.trial_days)
            .unwrap_or_default()
    }
}
