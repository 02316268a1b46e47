//! Router construction. Gated routes are only ever registered through
//! [`gated`], so no protected surface can skip the entitlement check.

use std::sync::Arc;

use axum::{middleware as axum_mw, routing::get, Extension, Router};
use entitlement_core::{gate::RouteClass, service::EntitlementService};
use tower_http::trace::TraceLayer;

use crate::config::RedirectUrls;
use crate::handlers;
use crate::middleware::gate::{entitlement_gate, GateLayer};
use crate::middleware::jwt::{identify, JwtConfig};

/// Build the full axum router with all routes and middleware.
pub fn build_router(
    service: Arc<EntitlementService>,
    jwt_config: JwtConfig,
    redirects: RedirectUrls,
) -> Router {
    let redirects = Arc::new(redirects);
    let gated = |route: RouteClass, routes: Router| -> Router {
        let gate = GateLayer {
            service: Arc::clone(&service),
            route,
            redirects: Arc::clone(&redirects),
        };
        routes
            .layer(axum_mw::from_fn_with_state(gate, entitlement_gate))
            .layer(axum_mw::from_fn(identify))
            .layer(Extension(jwt_config.clone()))
    };

    let protected = gated(
        RouteClass::Protected,
        Router::new()
            .route("/dashboard", get(handlers::dashboard::dashboard))
            .route("/me/entitlement", get(handlers::dashboard::me_entitlement)),
    );

    let status = gated(
        RouteClass::SubscriptionStatus,
        Router::new().route(
            "/subscription/expired",
            get(handlers::subscription::expired_landing),
        ),
    );

    let admin = gated(
        RouteClass::Administrative,
        Router::new()
            .route("/admin/settings", get(handlers::admin::settings))
            .route(
                "/admin/users/:user_id/entitlement",
                get(handlers::admin::user_entitlement),
            ),
    );

    // Public routes (no identity, no gate)
    let public = Router::new().route("/health", get(handlers::health::health));

    public
        .merge(protected)
        .merge(status)
        .merge(admin)
        .layer(Extension(service))
        .layer(TraceLayer::new_for_http())
}
