//! Protected handlers. The gate has already allowed the request and attached
//! the resolved subscription; a missing view here is a wiring fault.

use axum::{Extension, Json};
use entitlement_core::{
    error::EntitlementError,
    types::{EntitlementDecision, SubscriptionView},
};

use crate::{error::AppError, presentation::DashboardView};

fn require_view(view: Option<Extension<SubscriptionView>>) -> Result<SubscriptionView, AppError> {
    view.map(|Extension(v)| v).ok_or_else(|| {
        AppError(EntitlementError::Internal(anyhow::anyhow!(
            "protected route reached without a resolved subscription"
        )))
    })
}

pub async fn dashboard(
    view: Option<Extension<SubscriptionView>>,
) -> Result<Json<DashboardView>, AppError> {
    let view = require_view(view)?;
    Ok(Json(DashboardView::from(&view)))
}

/// GET /me/entitlement
pub async fn me_entitlement(
    view: Option<Extension<SubscriptionView>>,
) -> Result<Json<EntitlementDecision>, AppError> {
    Ok(Json(require_view(view)?.decision))
}
