//! Core domain types for subscription entitlement.
//! These are pure value types: no sqlx, no DB dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};
use uuid::Uuid;

/// Seconds in one entitlement day. Day counts are plain 24h spans, not
/// local calendar days.
pub const SECONDS_PER_DAY: i64 = 86_400;

// ── Enums ─────────────────────────────────────────────────────

/// Account role as recorded by the identity provider.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Role {
    #[default]
    Member,
    Admin,
}

impl Role {
    /// Unknown role strings degrade to `Member`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            _ => Self::Member,
        }
    }
}

/// Persisted subscription status. May be stale relative to the timestamps;
/// the resolver reconciles it at read time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubscriptionStatus {
    Trial,
    Active,
    Expired,
    Cancelled,
    /// Any value the billing flow wrote that this service does not recognise.
    #[serde(other)]
    Unknown,
}

impl SubscriptionStatus {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "trial" => Self::Trial,
            "active" => Self::Active,
            "expired" => Self::Expired,
            "cancelled" | "canceled" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }
}

/// Derived entitlement state. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EntitlementState {
    InTrial,
    Active,
    Expired,
    Cancelled,
    NoPlan,
}

impl EntitlementState {
    pub fn is_entitled(&self) -> bool {
        matches!(self, Self::InTrial | Self::Active)
    }
}

// ── Inputs ────────────────────────────────────────────────────

/// Plan record. Used for display only, never for gating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    pub price_cents: i64,
}

/// Read-only view of a user's plan and subscription fields, fetched fresh
/// for each gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSubscriptionSnapshot {
    pub user_id: Uuid,
    pub role: Role,
    pub plan_id: Option<Uuid>,
    /// Joined plan row, when `plan_id` resolves.
    pub plan: Option<Plan>,
    pub subscription_status: SubscriptionStatus,
    pub trial_starts_at: Option<DateTime<Utc>>,
    pub trial_ends_at: Option<DateTime<Utc>>,
    pub plan_expires_at: Option<DateTime<Utc>>,
}

impl UserSubscriptionSnapshot {
    /// Bare snapshot: no plan, no trial, status `expired`.
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::Member,
            plan_id: None,
            plan: None,
            subscription_status: SubscriptionStatus::Expired,
            trial_starts_at: None,
            trial_ends_at: None,
            plan_expires_at: None,
        }
    }

    /// The trial window, only when both bounds are recorded. A half-set
    /// window counts as no trial at all.
    pub fn trial_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.trial_starts_at, self.trial_ends_at) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_plan(mut self, plan: Plan) -> Self {
        self.plan_id = Some(plan.id);
        self.plan = Some(plan);
        self
    }

    pub fn with_status(mut self, status: SubscriptionStatus) -> Self {
        self.subscription_status = status;
        self
    }

    pub fn with_trial(mut self, starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Self {
        self.trial_starts_at = Some(starts_at);
        self.trial_ends_at = Some(ends_at);
        self
    }

    pub fn with_plan_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.plan_expires_at = Some(expires_at);
        self
    }
}

// ── Outputs ───────────────────────────────────────────────────

/// Result of resolving a snapshot at one instant.
///
/// `is_entitled` always follows `state`, and `days_remaining` always follows
/// `expires_at`; both are fixed by [`EntitlementDecision::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementDecision {
    pub is_entitled: bool,
    pub state: EntitlementState,
    /// Meaningful only for `in_trial` and `active`.
    pub days_remaining: u32,
    /// The timestamp driving the current state, if any.
    pub expires_at: Option<DateTime<Utc>>,
}

impl EntitlementDecision {
    pub fn new(
        now: DateTime<Utc>,
        state: EntitlementState,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            is_entitled: state.is_entitled(),
            state,
            days_remaining: expires_at.map_or(0, |at| days_until(now, at)),
            expires_at,
        }
    }
}

/// `max(0, ceil((expires_at - now) / 1 day))`.
pub fn days_until(now: DateTime<Utc>, expires_at: DateTime<Utc>) -> u32 {
    let remaining_ms = (expires_at - now).num_milliseconds();
    if remaining_ms <= 0 {
        return 0;
    }
    let day_ms = SECONDS_PER_DAY * 1_000;
    let days = (remaining_ms + day_ms - 1) / day_ms;
    u32::try_from(days).unwrap_or(u32::MAX)
}

/// Snapshot plus its decision, handed to downstream handlers by the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionView {
    pub snapshot: UserSubscriptionSnapshot,
    pub decision: EntitlementDecision,
}
