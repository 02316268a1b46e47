use serde::Deserialize;
use uuid::Uuid;

use crate::error::EntitlementError;
use crate::types::Role;

/// Authenticated caller. Authentication happens upstream; this type only
/// carries the established identity into authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: Role,
}

impl Principal {
    /// Construct from validated JWT claims at the server boundary.
    /// The server middleware calls this; core logic never reads raw JWT tokens.
    pub fn from_jwt_claims(claims: &JwtClaims) -> Result<Self, EntitlementError> {
        let sub = claims
            .sub
            .as_deref()
            .ok_or_else(|| EntitlementError::Unauthenticated("missing sub claim".into()))?;
        let user_id = Uuid::parse_str(sub).map_err(|_| {
            EntitlementError::Unauthenticated(format!("sub claim is not a user id: {sub}"))
        })?;
        let is_admin = claims
            .roles
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|r| Role::parse(r) == Role::Admin);
        Ok(Self {
            user_id,
            role: if is_admin { Role::Admin } else { Role::Member },
        })
    }

    /// Construct explicitly for in-process mode and tests.
    /// There is no implicit or thread-local identity anywhere in the codebase.
    pub fn in_process(user_id: Uuid, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), EntitlementError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(EntitlementError::Unauthorized(format!(
                "{} is not an admin",
                self.user_id
            )))
        }
    }
}

/// JWT claims shape expected from the identity provider.
/// Deserialised by the server JWT middleware.
#[derive(Debug, Deserialize)]
pub struct JwtClaims {
    pub sub: Option<String>,
    pub roles: Option<Vec<String>>,
}
