//! Identity middleware: bearer JWT → `Principal` request extension.
//!
//! Never rejects. A request without a valid token continues unauthenticated
//! and the entitlement gate sends it to the login page.

use axum::{
    extract::Request,
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
    Extension,
};
use entitlement_core::{
    error::EntitlementError,
    principal::{JwtClaims, Principal},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

#[derive(Clone)]
pub struct JwtConfig {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtConfig {
    /// HS256 with a shared secret.
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn principal_from_token(&self, token: &str) -> Result<Principal, EntitlementError> {
        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| EntitlementError::Unauthenticated(format!("invalid token: {e}")))?;
        Principal::from_jwt_claims(&data.claims)
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn identify(
    Extension(config): Extension<JwtConfig>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(req.headers()) {
        match config.principal_from_token(token) {
            Ok(principal) => {
                req.extensions_mut().insert(principal);
            }
            Err(e) => tracing::debug!(error = %e, "bearer token rejected"),
        }
    }
    next.run(req).await
}
