//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::session::kind::PlayerKind;

/// A player session record.
///
/// One row per username: sessions are created on login, extended on
/// refresh, and removed on logout or by the expiry sweep. A record past
/// `expires_at` is dead even while it still physically exists.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier, assigned at creation.
    pub id: Uuid,
    /// The username this session belongs to.
    pub username: String,
    /// Identity of the player resolved at login.
    pub player_id: i64,
    /// Classification of the player.
    pub player_kind: PlayerKind,
    /// Routing key of the live game connection, if one is attached.
    pub connection_key: Option<i64>,
    /// When the session was created (login time). Immutable.
    pub created_at: DateTime<Utc>,
    /// When the session expires.
    pub expires_at: DateTime<Utc>,
    /// Last sliding-expiry extension, if the session was ever refreshed.
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Check whether the session is still active.
    pub fn is_active(&self) -> bool {
        self.expires_at > Utc::now()
    }

    /// Check whether the session has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Seconds until expiry (zero if already expired).
    pub fn remaining_seconds(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds().max(0)
    }
}

/// Data required to create a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSession {
    /// The username the session belongs to.
    pub username: String,
    /// Identity of the player resolved at login.
    pub player_id: i64,
    /// Classification of the player.
    pub player_kind: PlayerKind,
    /// Routing key of the live game connection.
    pub connection_key: Option<i64>,
    /// Time-to-live in seconds; `expires_at` becomes `now + ttl`.
    pub ttl_seconds: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn session(expires_in: Duration) -> Session {
        let now = Utc::now();
        Session {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            player_id: 7,
            player_kind: PlayerKind::Authenticated,
            connection_key: None,
            created_at: now - Duration::minutes(5),
            expires_at: now + expires_in,
            refreshed_at: None,
        }
    }

    #[test]
    fn test_active_session() {
        let s = session(Duration::minutes(30));
        assert!(s.is_active());
        assert!(!s.is_expired());
        assert!(s.remaining_seconds() > 0);
    }

    #[test]
    fn test_expired_session() {
        let s = session(Duration::minutes(-1));
        assert!(!s.is_active());
        assert!(s.is_expired());
        assert_eq!(s.remaining_seconds(), 0);
    }
}
