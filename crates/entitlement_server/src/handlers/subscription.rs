use std::sync::Arc;

use axum::{Extension, Json};
use entitlement_core::{service::EntitlementService, types::SubscriptionView};

use crate::presentation::ExpiredLanding;

/// Expired landing page. Open to every authenticated caller, including users
/// whose subscription could not be loaded.
pub async fn expired_landing(
    view: Option<Extension<SubscriptionView>>,
    Extension(service): Extension<Arc<EntitlementService>>,
) -> Json<ExpiredLanding> {
    let view = view.map(|Extension(v)| v);
    Json(ExpiredLanding::from_view(view.as_ref(), service.policy()))
}
