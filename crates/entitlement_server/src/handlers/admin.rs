//! Administrative handlers. The gate lets admins through without consulting
//! entitlement; each handler still checks the role before touching data.

use std::sync::Arc;

use axum::{extract::Path, Extension, Json};
use entitlement_core::{
    error::EntitlementError, policy::TrialPolicy, principal::Principal,
    service::EntitlementService, types::SubscriptionView,
};
use uuid::Uuid;

use crate::error::AppError;

fn require_principal(principal: Option<Extension<Principal>>) -> Result<Principal, AppError> {
    principal
        .map(|Extension(p)| p)
        .ok_or_else(|| AppError(EntitlementError::Unauthenticated("no principal".into())))
}

/// GET /admin/settings
pub async fn settings(
    principal: Option<Extension<Principal>>,
    Extension(service): Extension<Arc<EntitlementService>>,
) -> Result<Json<TrialPolicy>, AppError> {
    require_principal(principal)?.require_admin()?;
    Ok(Json(*service.policy()))
}

/// GET /admin/users/:user_id/entitlement
pub async fn user_entitlement(
    principal: Option<Extension<Principal>>,
    Extension(service): Extension<Arc<EntitlementService>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<SubscriptionView>, AppError> {
    let principal = require_principal(principal)?;
    principal.require_admin()?;

    let view = service
        .view_for(user_id)
        .await?
        .ok_or_else(|| EntitlementError::NotFound(format!("user {user_id}")))?;
    tracing::info!(
        admin = %principal.user_id,
        %user_id,
        state = %view.decision.state,
        "admin resolved user entitlement"
    );
    Ok(Json(view))
}
