//! Session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long sessions live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seconds a session may stay unused before it expires. Every
    /// successful lookup restarts the clock.
    ///
    /// Default: 600 (ten minutes).
    pub timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { timeout_secs: 600 }
    }
}

impl SessionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
