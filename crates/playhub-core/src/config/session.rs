//! Session lifetime configuration.

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Session lifetime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Time-to-live applied when a caller does not pass an explicit ttl,
    /// in seconds.
    #[serde(default = "default_ttl_seconds")]
    pub default_ttl_seconds: u64,
    /// Capacity of the session event broadcast channel. Slow subscribers
    /// that fall more than this many events behind start losing events.
    #[serde(default = "default_event_buffer")]
    pub event_buffer_size: usize,
}

impl SessionConfig {
    /// The default ttl as a [`chrono::Duration`].
    pub fn default_ttl(&self) -> Duration {
        Duration::seconds(self.default_ttl_seconds as i64)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_ttl_seconds: default_ttl_seconds(),
            event_buffer_size: default_event_buffer(),
        }
    }
}

fn default_ttl_seconds() -> u64 {
    // 30 minutes
    1800
}

fn default_event_buffer() -> usize {
    256
}
