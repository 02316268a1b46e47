//! Entitlement resolver: snapshot + instant → decision.
//!
//! Rules are ordered, first match wins:
//!
//! 1. no plan and no trial window        → `no_plan`
//! 2. trial window open (`now < end`)    → `in_trial` (ignores the status field)
//! 3. status `active`, plan not lapsed   → `active`
//! 4. status `cancelled`                 → `cancelled`
//! 5. anything else                      → `expired`
//!
//! Trial timestamps are authoritative for the trial boundary, so no job has
//! to flip the status column at the exact instant a trial ends. Once the
//! trial is over the status column is authoritative, so a cancelled plan
//! with time left on `plan_expires_at` still resolves to `cancelled`.
//!
//! All boundaries are exclusive: `now == expires_at` is already lapsed.

use chrono::{DateTime, Utc};

use crate::policy::TrialPolicy;
use crate::types::{
    EntitlementDecision, EntitlementState, SubscriptionStatus, UserSubscriptionSnapshot,
};

pub fn resolve(
    now: DateTime<Utc>,
    snapshot: &UserSubscriptionSnapshot,
    policy: &TrialPolicy,
) -> EntitlementDecision {
    let trial = snapshot.trial_window();

    if snapshot.plan_id.is_none() && trial.is_none() {
        return EntitlementDecision::new(now, EntitlementState::NoPlan, None);
    }

    if let Some((starts_at, ends_at)) = trial {
        let canonical_end = policy.trial_window_from(starts_at).map(|(_, end)| end);
        if canonical_end != Some(ends_at) {
            let window_secs = (ends_at - starts_at).num_seconds();
            tracing::trace!(
                user_id = %snapshot.user_id,
                window_secs,
                policy_days = policy.trial_days,
                "stored trial window differs from configured trial length"
            );
        }
        if now < ends_at {
            return EntitlementDecision::new(now, EntitlementState::InTrial, Some(ends_at));
        }
    }

    let plan_expires_at = snapshot.plan_expires_at;
    match snapshot.subscription_status {
        SubscriptionStatus::Active if plan_expires_at.map_or(true, |at| now < at) => {
            EntitlementDecision::new(now, EntitlementState::Active, plan_expires_at)
        }
        SubscriptionStatus::Cancelled => {
            EntitlementDecision::new(now, EntitlementState::Cancelled, plan_expires_at)
        }
        _ => EntitlementDecision::new(
            now,
            EntitlementState::Expired,
            plan_expires_at.or(trial.map(|(_, ends_at)| ends_at)),
        ),
    }
}
