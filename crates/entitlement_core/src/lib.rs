//! entitlement_core: subscription lifecycle and access-control gate.
//!
//! Two pieces carry all the rules:
//! - [`resolver::resolve`] derives an [`types::EntitlementDecision`] from a
//!   snapshot, an explicit `now` and the [`policy::TrialPolicy`].
//! - [`gate::authorize`] turns a decision plus identity and route class into
//!   a [`gate::GateOutcome`].
//!
//! [`service::EntitlementService`] wires them to a [`ports::SubscriptionStore`]
//! and a [`clock::Clock`]. Storage adapters live in `entitlement_postgres`;
//! HTTP enforcement lives in `entitlement_server`.

pub mod clock;
pub mod error;
pub mod gate;
pub mod memory;
pub mod policy;
pub mod ports;
pub mod principal;
pub mod resolver;
pub mod service;
pub mod types;
