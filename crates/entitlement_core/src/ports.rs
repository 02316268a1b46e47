//! Storage port traits.
//! Implemented by entitlement_postgres: core logic depends only on these traits.
//! Both are read-only from the core's point of view.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::EntitlementError;
use crate::types::UserSubscriptionSnapshot;

pub type Result<T> = std::result::Result<T, EntitlementError>;

#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Load the user's subscription fields with the plan joined, by primary key.
    /// `Ok(None)` when no such user exists.
    async fn load_snapshot(&self, user_id: Uuid) -> Result<Option<UserSubscriptionSnapshot>>;
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Admin-configured trial length, if one has been set.
    async fn load_trial_days(&self) -> Result<Option<u32>>;
}
