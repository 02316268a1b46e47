//! Entitlement gate middleware. One instance per route class, installed by
//! the router; handlers behind it can rely on the outcome having been applied.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use entitlement_core::{
    gate::{GateOutcome, RouteClass},
    principal::Principal,
    service::EntitlementService,
};

use crate::config::RedirectUrls;

pub const TRIAL_DAYS_HEADER: HeaderName = HeaderName::from_static("x-trial-days-remaining");

#[derive(Clone)]
pub struct GateLayer {
    pub service: Arc<EntitlementService>,
    pub route: RouteClass,
    pub redirects: Arc<RedirectUrls>,
}

pub async fn entitlement_gate(
    State(gate): State<GateLayer>,
    mut req: Request,
    next: Next,
) -> Response {
    let principal = req.extensions().get::<Principal>().cloned();
    let evaluation = gate.service.evaluate(gate.route, principal.as_ref()).await;

    if let Some(view) = evaluation.view {
        req.extensions_mut().insert(view);
    }

    match evaluation.outcome {
        GateOutcome::Redirect(target) => {
            Redirect::to(gate.redirects.url_for(target)).into_response()
        }
        GateOutcome::AllowWithNotice(decision) => {
            let mut resp = next.run(req).await;
            resp.headers_mut()
                .insert(TRIAL_DAYS_HEADER, HeaderValue::from(decision.days_remaining));
            resp
        }
        GateOutcome::Allow => next.run(req).await,
    }
}
