//! End-to-end gate behavior over HTTP, against the in-memory store and a
//! fixed clock. No database required.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use entitlement_core::{
    clock::FixedClock,
    error::EntitlementError,
    memory::InMemorySubscriptionStore,
    policy::TrialPolicy,
    ports::{self, SubscriptionStore},
    service::EntitlementService,
    types::{Plan, Role, SubscriptionStatus, UserSubscriptionSnapshot},
};
use entitlement_server::{
    config::RedirectUrls, middleware::gate::TRIAL_DAYS_HEADER,
    middleware::jwt::JwtConfig, router::build_router,
};
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

const SECRET: &[u8] = b"integration-test-secret";

const GATED_ROUTES: [&str; 5] = [
    "/dashboard",
    "/me/entitlement",
    "/subscription/expired",
    "/admin/settings",
    "/admin/users/00000000-0000-0000-0000-000000000001/entitlement",
];

fn d0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
}

#[derive(Serialize)]
struct Claims {
    sub: String,
    roles: Vec<String>,
    exp: i64,
}

fn bearer(user_id: Uuid, role: Role) -> String {
    let roles = match role {
        Role::Admin => vec!["admin".to_string()],
        Role::Member => vec![],
    };
    let claims = Claims {
        sub: user_id.to_string(),
        roles,
        // Token expiry is checked against the wall clock, not the fixed one.
        exp: Utc::now().timestamp() + 3600,
    };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap();
    format!("Bearer {token}")
}

struct Harness {
    store: Arc<InMemorySubscriptionStore>,
    clock: Arc<FixedClock>,
    app: Router,
}

fn harness_with(store: Arc<dyn SubscriptionStore>, policy: TrialPolicy) -> (Arc<FixedClock>, Router) {
    let clock = Arc::new(FixedClock::new(d0()));
    let service = Arc::new(EntitlementService::new(store, clock.clone(), policy));
    let app = build_router(
        service,
        JwtConfig::from_secret(SECRET),
        RedirectUrls::default(),
    );
    (clock, app)
}

fn harness() -> Harness {
    let store = Arc::new(InMemorySubscriptionStore::new());
    let (clock, app) = harness_with(store.clone(), TrialPolicy::new(3).unwrap());
    Harness { store, clock, app }
}

async fn get(app: &Router, uri: &str, auth: Option<&str>) -> axum::response::Response {
    let mut req = Request::builder().uri(uri);
    if let Some(auth) = auth {
        req = req.header(header::AUTHORIZATION, auth);
    }
    app.clone()
        .oneshot(req.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn location(resp: &axum::response::Response) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

fn pro_plan() -> Plan {
    Plan {
        id: Uuid::new_v4(),
        name: "Pro".into(),
        price_cents: 999,
    }
}

// ── Public ────────────────────────────────────────────────────

#[tokio::test]
async fn health_is_public() {
    let h = harness();
    let resp = get(&h.app, "/health", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["status"], "ok");
}

// ── Uniform gating ────────────────────────────────────────────

#[tokio::test]
async fn anonymous_redirected_to_login_on_every_gated_route() {
    let h = harness();
    for uri in GATED_ROUTES {
        let resp = get(&h.app, uri, None).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&resp), "/login", "{uri}");
    }
}

#[tokio::test]
async fn invalid_token_treated_as_anonymous() {
    let h = harness();
    let resp = get(&h.app, "/dashboard", Some("Bearer not-a-jwt")).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
}

// ── Protected routes ──────────────────────────────────────────

#[tokio::test]
async fn trial_user_sees_dashboard_with_notice() {
    let h = harness();
    let user = Uuid::new_v4();
    h.store
        .put(UserSubscriptionSnapshot::new(user).with_trial(d0(), d0() + Duration::days(3)))
        .await;
    h.clock.advance(Duration::days(1));

    let resp = get(&h.app, "/dashboard", Some(&bearer(user, Role::Member))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[TRIAL_DAYS_HEADER], "2");

    let body = json_body(resp).await;
    assert_eq!(body["state"], "in_trial");
    assert_eq!(body["days_remaining"], 2);
    assert_eq!(body["trial_banner"]["message"], "2 days left in your trial");
}

#[tokio::test]
async fn trial_boundary_is_exclusive() {
    let h = harness();
    let user = Uuid::new_v4();
    h.store
        .put(UserSubscriptionSnapshot::new(user).with_trial(d0(), d0() + Duration::days(3)))
        .await;
    h.clock.advance(Duration::days(3));

    let resp = get(&h.app, "/dashboard", Some(&bearer(user, Role::Member))).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/subscription/expired");
}

#[tokio::test]
async fn active_subscriber_allowed_without_notice() {
    let h = harness();
    let user = Uuid::new_v4();
    h.store
        .put(
            UserSubscriptionSnapshot::new(user)
                .with_plan(pro_plan())
                .with_status(SubscriptionStatus::Active)
                .with_plan_expiry(d0() + Duration::days(30)),
        )
        .await;
    h.clock.advance(Duration::days(10));

    let resp = get(&h.app, "/me/entitlement", Some(&bearer(user, Role::Member))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(TRIAL_DAYS_HEADER).is_none());

    let body = json_body(resp).await;
    assert_eq!(body["state"], "active");
    assert_eq!(body["is_entitled"], true);
    assert_eq!(body["days_remaining"], 20);
}

#[tokio::test]
async fn cancelled_subscriber_redirected_despite_future_expiry() {
    let h = harness();
    let user = Uuid::new_v4();
    h.store
        .put(
            UserSubscriptionSnapshot::new(user)
                .with_plan(pro_plan())
                .with_status(SubscriptionStatus::Cancelled)
                .with_plan_expiry(d0() + Duration::days(30)),
        )
        .await;

    let resp = get(&h.app, "/dashboard", Some(&bearer(user, Role::Member))).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/subscription/expired");

    let landing = get(&h.app, "/subscription/expired", Some(&bearer(user, Role::Member))).await;
    assert_eq!(landing.status(), StatusCode::OK);
    let body = json_body(landing).await;
    assert_eq!(body["state"], "cancelled");
    assert_eq!(body["subscription_status"], "cancelled");
    assert_eq!(body["trial_days"], 3);
    assert_eq!(body["last_plan"]["price"], "$9.99");
}

#[tokio::test]
async fn unknown_user_fails_closed() {
    let h = harness();
    let resp = get(&h.app, "/dashboard", Some(&bearer(Uuid::new_v4(), Role::Member))).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/subscription/expired");
}

#[tokio::test]
async fn state_reresolved_on_every_request() {
    let h = harness();
    let user = Uuid::new_v4();
    h.store
        .put(UserSubscriptionSnapshot::new(user).with_trial(d0(), d0() + Duration::days(3)))
        .await;
    let auth = bearer(user, Role::Member);

    assert_eq!(get(&h.app, "/dashboard", Some(&auth)).await.status(), StatusCode::OK);
    h.clock.advance(Duration::days(4));
    assert_eq!(
        get(&h.app, "/dashboard", Some(&auth)).await.status(),
        StatusCode::SEE_OTHER
    );
}

// ── Store failure ─────────────────────────────────────────────

struct UnavailableStore;

#[async_trait]
impl SubscriptionStore for UnavailableStore {
    async fn load_snapshot(&self, _user_id: Uuid) -> ports::Result<Option<UserSubscriptionSnapshot>> {
        Err(EntitlementError::Unavailable("connection refused".into()))
    }
}

#[tokio::test]
async fn store_failure_redirects_to_expired_landing() {
    let (_clock, app) = harness_with(Arc::new(UnavailableStore), TrialPolicy::default());
    let user = Uuid::new_v4();

    let resp = get(&app, "/dashboard", Some(&bearer(user, Role::Member))).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/subscription/expired");

    // The landing page itself still renders.
    let resp = get(&app, "/subscription/expired", Some(&bearer(user, Role::Member))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(json_body(resp).await["state"].is_null());
}

// ── Administrative routes ─────────────────────────────────────

#[tokio::test]
async fn expired_admin_allowed_on_admin_routes_only() {
    let h = harness();
    let admin = Uuid::new_v4();
    h.store
        .put(
            UserSubscriptionSnapshot::new(admin)
                .with_role(Role::Admin)
                .with_trial(d0() - Duration::days(10), d0() - Duration::days(7)),
        )
        .await;
    let auth = bearer(admin, Role::Admin);

    let resp = get(&h.app, "/admin/settings", Some(&auth)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["trial_days"], 3);

    let resp = get(&h.app, "/dashboard", Some(&auth)).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/subscription/expired");
}

#[tokio::test]
async fn member_redirected_away_from_admin_routes() {
    let h = harness();
    let member = Uuid::new_v4();
    h.store
        .put(
            UserSubscriptionSnapshot::new(member)
                .with_plan(pro_plan())
                .with_status(SubscriptionStatus::Active),
        )
        .await;

    let resp = get(&h.app, "/admin/settings", Some(&bearer(member, Role::Member))).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");
}

#[tokio::test]
async fn admin_resolves_any_user() {
    let h = harness();
    let admin = Uuid::new_v4();
    let member = Uuid::new_v4();
    h.store
        .put(UserSubscriptionSnapshot::new(member).with_trial(d0(), d0() + Duration::days(3)))
        .await;
    let auth = bearer(admin, Role::Admin);

    let resp = get(&h.app, &format!("/admin/users/{member}/entitlement"), Some(&auth)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["decision"]["state"], "in_trial");
    assert_eq!(body["snapshot"]["user_id"], member.to_string());

    let missing = Uuid::new_v4();
    let resp = get(&h.app, &format!("/admin/users/{missing}/entitlement"), Some(&auth)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(json_body(resp).await["error"].is_string());
}
