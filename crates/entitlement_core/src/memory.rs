//! In-memory store adapter. Backs tests and local runs without Postgres.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::ports::{Result, SettingsStore, SubscriptionStore};
use crate::types::UserSubscriptionSnapshot;

#[derive(Debug, Default)]
pub struct InMemorySubscriptionStore {
    snapshots: RwLock<HashMap<Uuid, UserSubscriptionSnapshot>>,
    trial_days: RwLock<Option<u32>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, snapshot: UserSubscriptionSnapshot) {
        self.snapshots
            .write()
            .await
            .insert(snapshot.user_id, snapshot);
    }

    pub async fn remove(&self, user_id: Uuid) -> Option<UserSubscriptionSnapshot> {
        self.snapshots.write().await.remove(&user_id)
    }

    pub async fn set_trial_days(&self, days: Option<u32>) {
        *self.trial_days.write().await = days;
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn load_snapshot(&self, user_id: Uuid) -> Result<Option<UserSubscriptionSnapshot>> {
        Ok(self.snapshots.read().await.get(&user_id).cloned())
    }
}

#[async_trait]
impl SettingsStore for InMemorySubscriptionStore {
    async fn load_trial_days(&self) -> Result<Option<u32>> {
        Ok(*self.trial_days.read().await)
    }
}
