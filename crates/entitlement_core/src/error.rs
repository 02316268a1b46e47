use thiserror::Error;

#[derive(Debug, Error)]
pub enum EntitlementError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("subscription store unavailable: {0}")]
    Unavailable(String),

    #[error("internal: {0}")]
    Internal(#[from] anyhow::Error),
}

impl EntitlementError {
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Unauthenticated(_) => 401,
            Self::Unauthorized(_) => 403,
            Self::InvalidInput(_) => 400,
            Self::Unavailable(_) => 503,
            Self::Internal(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── http_status: exhaustive variant coverage ──────────────────

    #[test]
    fn http_status_not_found() {
        assert_eq!(EntitlementError::NotFound("x".into()).http_status(), 404);
    }

    #[test]
    fn http_status_unauthenticated() {
        assert_eq!(
            EntitlementError::Unauthenticated("x".into()).http_status(),
            401
        );
    }

    #[test]
    fn http_status_unauthorized() {
        assert_eq!(EntitlementError::Unauthorized("x".into()).http_status(), 403);
    }

    #[test]
    fn http_status_invalid_input() {
        assert_eq!(EntitlementError::InvalidInput("x".into()).http_status(), 400);
    }

    #[test]
    fn http_status_unavailable() {
        assert_eq!(EntitlementError::Unavailable("x".into()).http_status(), 503);
    }

    #[test]
    fn http_status_internal() {
        let err = EntitlementError::Internal(anyhow::anyhow!("boom"));
        assert_eq!(err.http_status(), 500);
    }

    // ── Display ──────────────────────────────────────────────────

    #[test]
    fn display_unauthorized() {
        let e = EntitlementError::Unauthorized("no admin role".into());
        assert_eq!(e.to_string(), "unauthorized: no admin role");
    }

    #[test]
    fn display_unavailable() {
        let e = EntitlementError::Unavailable("pool timed out".into());
        assert_eq!(
            e.to_string(),
            "subscription store unavailable: pool timed out"
        );
    }

    #[test]
    fn display_internal() {
        let e = EntitlementError::Internal(anyhow::anyhow!("segfault"));
        assert_eq!(e.to_string(), "internal: segfault");
    }
}
