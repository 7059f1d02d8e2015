// ABOUTME: Wait block of the config file.
// ABOUTME: Durations use humantime syntax such as "10m" or "20s".

use serde::Deserialize;
use std::time::Duration;

use crate::deploy::{DEFAULT_POLL_INTERVAL, WaitSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WaitConfig {
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

impl WaitConfig {
    pub fn settings(&self) -> WaitSettings {
        WaitSettings::new(self.timeout).poll_interval(self.poll_interval)
    }

    /// Validation messages for zero durations.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.timeout.is_zero() {
            problems.push("wait.timeout must be greater than zero".to_string());
        }
        if self.poll_interval.is_zero() {
            problems.push("wait.poll_interval must be greater than zero".to_string());
        }
        problems
    }
}
