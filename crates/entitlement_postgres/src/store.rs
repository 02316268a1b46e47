//! Postgres implementations of the entitlement port traits.
//!
//! Each adapter is a newtype wrapping PgPool. All SQL is runtime-checked
//! (sqlx::query_as, not sqlx::query!) to avoid compile-time DB requirement.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use entitlement_core::error::EntitlementError;
use entitlement_core::ports::{Result, SettingsStore, SubscriptionStore};
use entitlement_core::types::{Plan, Role, SubscriptionStatus, UserSubscriptionSnapshot};

fn unavailable(e: sqlx::Error) -> EntitlementError {
    EntitlementError::Unavailable(e.to_string())
}

// ── PgSubscriptionStore ───────────────────────────────────────

/// Row shape of `users LEFT JOIN plans`.
#[derive(Debug, sqlx::FromRow)]
pub struct PgSubscriptionRow {
    pub user_id: Uuid,
    pub role: String,
    pub plan_id: Option<Uuid>,
    pub subscription_status: String,
    pub trial_starts_at: Option<DateTime<Utc>>,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub plan_expires_at: Option<DateTime<Utc>>,
    pub plan_name: Option<String>,
    pub plan_price_cents: Option<i64>,
}

impl From<PgSubscriptionRow> for UserSubscriptionSnapshot {
    fn from(row: PgSubscriptionRow) -> Self {
        let status = SubscriptionStatus::parse(&row.subscription_status);
        if status == SubscriptionStatus::Unknown {
            tracing::warn!(
                user_id = %row.user_id,
                raw = %row.subscription_status,
                "unrecognised subscription_status, treating as expired"
            );
        }
        let plan = match (row.plan_id, row.plan_name, row.plan_price_cents) {
            (Some(id), Some(name), Some(price_cents)) => Some(Plan {
                id,
                name,
                price_cents,
            }),
            _ => None,
        };
        Self {
            user_id: row.user_id,
            role: Role::parse(&row.role),
            plan_id: row.plan_id,
            plan,
            subscription_status: status,
            trial_starts_at: row.trial_starts_at,
            trial_ends_at: row.trial_ends_at,
            plan_expires_at: row.plan_expires_at,
        }
    }
}

/// Postgres-backed subscription snapshot reader.
pub struct PgSubscriptionStore {
    pool: PgPool,
}

impl PgSubscriptionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionStore for PgSubscriptionStore {
    async fn load_snapshot(&self, user_id: Uuid) -> Result<Option<UserSubscriptionSnapshot>> {
        let row = sqlx::query_as::<_, PgSubscriptionRow>(
            r#"
            SELECT u.user_id, u.role, u.plan_id, u.subscription_status,
                   u.trial_starts_at, u.trial_ends_at, u.plan_expires_at,
                   p.name AS plan_name, p.price_cents AS plan_price_cents
            FROM users u
            LEFT JOIN plans p ON p.plan_id = u.plan_id
            WHERE u.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(row.map(UserSubscriptionSnapshot::from))
    }
}

// ── PgSettingsStore ───────────────────────────────────────────

pub const TRIAL_DAYS_KEY: &str = "trial_days";

/// Postgres-backed reader for admin-configured settings.
pub struct PgSettingsStore {
    pool: PgPool,
}

impl PgSettingsStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Non-numeric and non-positive values are ignored.
pub fn parse_trial_days(raw: &str) -> Option<u32> {
    match raw.trim().parse::<u32>() {
        Ok(days) if days > 0 => Some(days),
        _ => {
            tracing::warn!(raw, "ignoring invalid trial_days setting");
            None
        }
    }
}

#[async_trait]
impl SettingsStore for PgSettingsStore {
    async fn load_trial_days(&self) -> Result<Option<u32>> {
        let value = sqlx::query_scalar::<_, String>(
            "SELECT value FROM app_settings WHERE key = $1",
        )
        .bind(TRIAL_DAYS_KEY)
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(value.as_deref().and_then(parse_trial_days))
    }
}
