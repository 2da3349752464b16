//! Session-related domain events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Events related to player sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionEvent {
    /// A player logged in and a session was created.
    Created {
        /// The session ID.
        session_id: Uuid,
        /// The username the session belongs to.
        username: String,
        /// When the session expires.
        expires_at: DateTime<Utc>,
    },
    /// A session's expiry was extended.
    Refreshed {
        /// The session ID.
        session_id: Uuid,
        /// The new expiry timestamp.
        expires_at: DateTime<Utc>,
    },
    /// A session was explicitly deleted (logout).
    Deleted {
        /// The session ID.
        session_id: Uuid,
    },
    /// An expiry sweep removed stale records.
    Swept {
        /// Number of expired records removed.
        count: u64,
    },
}
