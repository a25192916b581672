use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIRMATIONS: u64 = 1;
pub const DEFAULT_CONFIRMATION_TIMEOUT_SECS: u64 = 300;

/// Tuning for [`crate::submit::Submitter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitterConfig {
    /// Confirmations to wait for on both the approval and the transfer.
    pub confirmations: u64,
    /// Upper bound on each confirmation wait.
    pub confirmation_timeout_secs: u64,
}

impl SubmitterConfig {
    pub const fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            confirmations: DEFAULT_CONFIRMATIONS,
            confirmation_timeout_secs: DEFAULT_CONFIRMATION_TIMEOUT_SECS,
        }
    }
}
