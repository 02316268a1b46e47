//! HTTP enforcement of subscription entitlement.
//!
//! Every non-public route is registered through [`router::build_router`],
//! which places it behind [`middleware::jwt::identify`] and one
//! [`middleware::gate::entitlement_gate`] instance for its route class.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod presentation;
pub mod router;
