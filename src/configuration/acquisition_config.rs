use serde::Deserialize;

use std::time::Duration;

const DEFAULT_PERIOD_SECS: u64 = 20;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 5;

/// Cadence of the acquisition loop.
///
/// The read timeout must stay comfortably below the period so one
/// attempt is always finished before the next tick fires.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct AcquisitionConfig {
    pub period_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
}

impl AcquisitionConfig {
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs.unwrap_or(DEFAULT_PERIOD_SECS))
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs.unwrap_or(DEFAULT_READ_TIMEOUT_SECS))
    }
}
