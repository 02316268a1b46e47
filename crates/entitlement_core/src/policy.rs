//! Process-wide trial configuration.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::error::EntitlementError;

pub const DEFAULT_TRIAL_DAYS: u32 = 14;

/// Ten years.
pub const MAX_TRIAL_DAYS: u32 = 3650;

/// Canonical trial length. Loaded once at startup; entitlement itself is
/// driven by the stored `trial_ends_at`, this value is for display and for
/// opening new trial windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrialPolicy {
    pub trial_days: u32,
}

impl TrialPolicy {
    pub fn new(trial_days: u32) -> Result<Self, EntitlementError> {
        if trial_days == 0 {
            return Err(EntitlementError::InvalidInput(
                "trial_days must be a positive integer".into(),
            ));
        }
        if trial_days > MAX_TRIAL_DAYS {
            return Err(EntitlementError::InvalidInput(format!(
                "trial_days must be at most {MAX_TRIAL_DAYS}"
            )));
        }
        Ok(Self { trial_days })
    }

    /// Window a trial started at `start` would span under this policy.
    /// `None` when the end falls outside the representable range.
    pub fn trial_window_from(
        &self,
        start: DateTime<Utc>,
    ) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let end = start.checked_add_signed(Duration::days(i64::from(self.trial_days)))?;
        Some((start, end))
    }
}

impl Default for TrialPolicy {
    fn default() -> Self {
        Self {
            trial_days: DEFAULT_TRIAL_DAYS,
        }
    }
}
