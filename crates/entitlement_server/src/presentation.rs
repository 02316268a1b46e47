//! Response bodies built from a resolved subscription.

use chrono::{DateTime, Utc};
use entitlement_core::policy::TrialPolicy;
use entitlement_core::types::{
    EntitlementDecision, EntitlementState, Plan, SubscriptionStatus, SubscriptionView,
};
use serde::Serialize;
use uuid::Uuid;

/// "$9.99" from 999. Negative amounts keep their sign.
pub fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}${}.{:02}", abs / 100, abs % 100)
}

/// Countdown shown to users still inside their trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialBanner {
    pub days_remaining: u32,
    pub message: String,
}

impl TrialBanner {
    pub fn from_decision(decision: &EntitlementDecision) -> Option<Self> {
        if decision.state != EntitlementState::InTrial {
            return None;
        }
        let unit = if decision.days_remaining == 1 { "day" } else { "days" };
        Some(Self {
            days_remaining: decision.days_remaining,
            message: format!("{} {unit} left in your trial", decision.days_remaining),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub id: Uuid,
    pub name: String,
    pub price: String,
}

impl From<&Plan> for PlanSummary {
    fn from(plan: &Plan) -> Self {
        Self {
            id: plan.id,
            name: plan.name.clone(),
            price: format_price(plan.price_cents),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub user_id: Uuid,
    pub state: EntitlementState,
    pub plan: Option<PlanSummary>,
    pub days_remaining: u32,
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trial_banner: Option<TrialBanner>,
}

impl From<&SubscriptionView> for DashboardView {
    fn from(view: &SubscriptionView) -> Self {
        Self {
            user_id: view.snapshot.user_id,
            state: view.decision.state,
            plan: view.snapshot.plan.as_ref().map(PlanSummary::from),
            days_remaining: view.decision.days_remaining,
            expires_at: view.decision.expires_at,
            trial_banner: TrialBanner::from_decision(&view.decision),
        }
    }
}

/// Body of the expired landing page. Rendered for anyone, so every field
/// tolerates a missing subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiredLanding {
    pub state: Option<EntitlementState>,
    pub subscription_status: Option<SubscriptionStatus>,
    pub expired_at: Option<DateTime<Utc>>,
    pub last_plan: Option<PlanSummary>,
    pub trial_days: u32,
    pub message: String,
}

impl ExpiredLanding {
    pub fn from_view(view: Option<&SubscriptionView>, policy: &TrialPolicy) -> Self {
        let Some(view) = view else {
            return Self {
                state: None,
                subscription_status: None,
                expired_at: None,
                last_plan: None,
                trial_days: policy.trial_days,
                message: "Choose a plan to get started.".into(),
            };
        };
        let message = match view.decision.state {
            EntitlementState::InTrial | EntitlementState::Active => {
                "Your subscription is active.".to_string()
            }
            EntitlementState::Cancelled => "Your subscription was cancelled.".to_string(),
            EntitlementState::NoPlan => "Choose a plan to get started.".to_string(),
            EntitlementState::Expired => match view.snapshot.plan {
                Some(_) => "Your subscription has expired.".to_string(),
                None => "Your free trial has ended.".to_string(),
            },
        };
        Self {
            state: Some(view.decision.state),
            subscription_status: Some(view.snapshot.subscription_status),
            expired_at: view.decision.expires_at,
            last_plan: view.snapshot.plan.as_ref().map(PlanSummary::from),
            trial_days: policy.trial_days,
            message,
        }
    }
}
