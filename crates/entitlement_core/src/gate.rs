//! Access gate: decision + identity + route class → outcome.
//!
//! Applied to every non-public route. Rules, in order:
//!
//! 1. no identity                           → redirect to login
//! 2. administrative route, not admin       → redirect to forbidden/dashboard
//! 3. administrative route, admin           → allow (role-based, ignores subscription)
//! 4. subscription-status page              → allow (no redirect loop)
//! 5. not entitled, or decision unavailable → redirect to expired landing
//! 6. entitled and in trial                 → allow with notice
//! 7. otherwise                             → allow

use serde::Serialize;
use strum::{AsRefStr, Display};

use crate::principal::Principal;
use crate::types::{EntitlementDecision, EntitlementState};

/// How a route participates in gating. Public routes never reach the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, AsRefStr, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RouteClass {
    /// Ordinary feature route; requires entitlement.
    Protected,
    /// System management; requires the admin role only.
    Administrative,
    /// The expired/landing page itself.
    SubscriptionStatus,
}

impl RouteClass {
    /// Whether the gate needs the caller's subscription to decide.
    pub fn consults_entitlement(&self) -> bool {
        matches!(self, Self::Protected | Self::SubscriptionStatus)
    }
}

/// Redirect destinations as identifiers. URL construction belongs to the
/// presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, AsRefStr, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RedirectTarget {
    LoginPage,
    ExpiredLandingPage,
    ForbiddenOrDashboard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum GateOutcome {
    Allow,
    AllowWithNotice(EntitlementDecision),
    Redirect(RedirectTarget),
}

impl GateOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::AllowWithNotice(_) => "allow_with_notice",
            Self::Redirect(_) => "redirect",
        }
    }
}

/// `decision` is `None` when the snapshot could not be obtained; that is
/// handled as not entitled.
pub fn authorize(
    route: RouteClass,
    identity: Option<&Principal>,
    decision: Option<&EntitlementDecision>,
) -> GateOutcome {
    let Some(identity) = identity else {
        return GateOutcome::Redirect(RedirectTarget::LoginPage);
    };

    match route {
        RouteClass::Administrative if identity.is_admin() => GateOutcome::Allow,
        RouteClass::Administrative => GateOutcome::Redirect(RedirectTarget::ForbiddenOrDashboard),
        RouteClass::SubscriptionStatus => GateOutcome::Allow,
        RouteClass::Protected => match decision {
            Some(d) if d.is_entitled && d.state == EntitlementState::InTrial => {
                GateOutcome::AllowWithNotice(d.clone())
            }
            Some(d) if d.is_entitled => GateOutcome::Allow,
            _ => GateOutcome::Redirect(RedirectTarget::ExpiredLandingPage),
        },
    }
}
