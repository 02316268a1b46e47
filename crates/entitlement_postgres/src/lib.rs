//! Postgres adapters for the entitlement port traits.

pub mod store;

pub use store::{PgSettingsStore, PgSubscriptionStore};

use sqlx::PgPool;

/// All Postgres-backed stores, sharing one pool.
pub struct PgStores {
    pub subscriptions: PgSubscriptionStore,
    pub settings: PgSettingsStore,
}

impl PgStores {
    pub fn new(pool: PgPool) -> Self {
        Self {
            subscriptions: PgSubscriptionStore::new(pool.clone()),
            settings: PgSettingsStore::new(pool),
        }
    }
}

/// Schema the stores read from.
pub const SCHEMA_SQL: &str = include_str!("../migrations/0001_subscriptions.sql");
