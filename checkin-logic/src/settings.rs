use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Timing knobs for a check-in session
pub struct SessionSettings {
    /// Seconds between the service acknowledging a message and showing the thank-you
    pub finish_delay_seconds: u64,
    /// Seconds to wait for the service to answer a write before giving up on it
    pub response_timeout_seconds: u64,
}

impl SessionSettings {
    pub fn finish_delay(&self) -> Duration {
        Duration::from_secs(self.finish_delay_seconds)
    }

    pub fn response_timeout(&self) -> Duration {
        Duration::from_secs(self.response_timeout_seconds)
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            finish_delay_seconds: 4,
            response_timeout_seconds: 30,
        }
    }
}
