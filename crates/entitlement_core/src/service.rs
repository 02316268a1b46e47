//! EntitlementService: binds the resolver and gate to a store and a clock.
//!
//! Takes port traits via `Arc<dyn PortTrait>` so the same logic runs against
//! Postgres or the in-memory store. Holds no per-request state; every
//! evaluation reads a fresh snapshot.

use std::sync::Arc;

use uuid::Uuid;

use crate::clock::Clock;
use crate::gate::{authorize, GateOutcome, RouteClass};
use crate::policy::TrialPolicy;
use crate::ports::{Result, SubscriptionStore};
use crate::principal::Principal;
use crate::resolver::resolve;
use crate::types::SubscriptionView;

/// Outcome of one gate evaluation, plus whatever was resolved on the way.
#[derive(Debug, Clone)]
pub struct GateEvaluation {
    pub outcome: GateOutcome,
    pub view: Option<SubscriptionView>,
}

pub struct EntitlementService {
    store: Arc<dyn SubscriptionStore>,
    clock: Arc<dyn Clock>,
    policy: TrialPolicy,
}

impl EntitlementService {
    pub fn new(
        store: Arc<dyn SubscriptionStore>,
        clock: Arc<dyn Clock>,
        policy: TrialPolicy,
    ) -> Self {
        Self {
            store,
            clock,
            policy,
        }
    }

    pub fn policy(&self) -> &TrialPolicy {
        &self.policy
    }

    /// Fetch and resolve a single user's subscription.
    pub async fn view_for(&self, user_id: Uuid) -> Result<Option<SubscriptionView>> {
        let Some(snapshot) = self.store.load_snapshot(user_id).await? else {
            return Ok(None);
        };
        let decision = resolve(self.clock.now(), &snapshot, &self.policy);
        Ok(Some(SubscriptionView { snapshot, decision }))
    }

    /// Run the gate for one request. Fetches at most one snapshot, and only
    /// for route classes that consult entitlement. Store failures and unknown
    /// users fail closed.
    pub async fn evaluate(&self, route: RouteClass, identity: Option<&Principal>) -> GateEvaluation {
        let view = match identity {
            Some(principal) if route.consults_entitlement() => {
                match self.view_for(principal.user_id).await {
                    Ok(Some(view)) => Some(view),
                    Ok(None) => {
                        tracing::warn!(
                            user_id = %principal.user_id,
                            "no subscription record for authenticated user"
                        );
                        None
                    }
                    Err(e) => {
                        tracing::warn!(
                            user_id = %principal.user_id,
                            error = %e,
                            "subscription snapshot unavailable, failing closed"
                        );
                        None
                    }
                }
            }
            _ => None,
        };

        let outcome = authorize(route, identity, view.as_ref().map(|v| &v.decision));

        tracing::debug!(
            user_id = ?identity.map(|p| p.user_id),
            route = %route,
            outcome = outcome.label(),
            state = ?view.as_ref().map(|v| v.decision.state),
            "entitlement gate evaluated"
        );

        GateEvaluation { outcome, view }
    }
}
