//! Session store semantics wrapping a persistence backend.

use std::sync::Arc;

use chrono::Duration;
use sqlx::PgPool;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use playhub_core::config::SessionConfig;
use playhub_core::error::AppError;
use playhub_core::events::SessionEvent;
use playhub_core::result::AppResult;
use playhub_database::repositories::SessionRepository;
use playhub_entity::session::{CreateSession, PlayerKind, Session};

use crate::backend::{MemorySessionBackend, PostgresSessionBackend, SessionBackend};

/// Maximum accepted username length in bytes (wire-protocol field limit).
pub const USERNAME_MAX_LEN: usize = 64;

/// Manages the lifecycle of player session records.
///
/// Guarantees at most one active session per username, never returns an
/// expired record, and leaves retry policy entirely to the caller:
/// storage errors surface immediately as `Database` errors.
#[derive(Clone)]
pub struct SessionStore {
    /// Persistence backend.
    backend: Arc<dyn SessionBackend>,
    /// Session configuration.
    config: SessionConfig,
    /// Lifecycle event fan-out.
    events: broadcast::Sender<SessionEvent>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("config", &self.config)
            .finish()
    }
}

impl SessionStore {
    /// Create a store over an already-provisioned backend.
    pub fn new(backend: Arc<dyn SessionBackend>, config: SessionConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer_size.max(1));
        Self {
            backend,
            config,
            events,
        }
    }

    /// Create a store over PostgreSQL, provisioning the schema first.
    ///
    /// Provisioning failures are returned to the caller; the store never
    /// starts against a half-provisioned schema.
    pub async fn connect(pool: PgPool, config: SessionConfig) -> AppResult<Self> {
        playhub_database::migration::run_migrations(&pool).await?;

        let backend = PostgresSessionBackend::new(SessionRepository::new(pool));
        Ok(Self::new(Arc::new(backend), config))
    }

    /// Create a store over the in-memory backend.
    pub fn in_memory(config: SessionConfig) -> Self {
        Self::new(Arc::new(MemorySessionBackend::new()), config)
    }

    /// Subscribe to session lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Create a session for a username.
    ///
    /// Fails with `DuplicateSession` if an active session already exists
    /// for the username. The check-then-insert is atomic in the backend;
    /// of N concurrent creates for one username, exactly one succeeds.
    /// `ttl` defaults to [`SessionConfig::default_ttl`].
    pub async fn create_session(
        &self,
        username: &str,
        player_id: i64,
        player_kind: PlayerKind,
        connection_key: Option<i64>,
        ttl: Option<Duration>,
    ) -> AppResult<Session> {
        validate_username(username)?;
        let ttl_seconds = self.resolve_ttl(ttl)?;

        let data = CreateSession {
            username: username.to_string(),
            player_id,
            player_kind,
            connection_key,
            ttl_seconds,
        };

        match self.backend.insert(&data).await? {
            Some(session) => {
                info!(
                    session_id = %session.id,
                    username = %session.username,
                    expires_at = %session.expires_at,
                    "Session created"
                );
                let _ = self.events.send(SessionEvent::Created {
                    session_id: session.id,
                    username: session.username.clone(),
                    expires_at: session.expires_at,
                });
                Ok(session)
            }
            None => {
                warn!(username = %username, "Login rejected: active session exists");
                Err(AppError::duplicate_session(format!(
                    "An active session already exists for '{username}'"
                )))
            }
        }
    }

    /// Look up the active session for a username.
    ///
    /// An expired-but-unswept record is treated as absent.
    pub async fn lookup_by_username(&self, username: &str) -> AppResult<Session> {
        self.backend
            .find_active_by_username(username)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No active session for '{username}'")))
    }

    /// Extend a session's expiry (sliding expiry).
    ///
    /// Fails with `NotFound` if the session is absent or already expired.
    /// `ttl` defaults to [`SessionConfig::default_ttl`].
    pub async fn refresh_session(&self, id: Uuid, ttl: Option<Duration>) -> AppResult<Session> {
        let ttl_seconds = self.resolve_ttl(ttl)?;

        let session = self
            .backend
            .extend(id, ttl_seconds)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No active session with id {id}")))?;

        debug!(
            session_id = %session.id,
            expires_at = %session.expires_at,
            "Session refreshed"
        );
        let _ = self.events.send(SessionEvent::Refreshed {
            session_id: session.id,
            expires_at: session.expires_at,
        });
        Ok(session)
    }

    /// Delete a session (logout).
    ///
    /// A second delete of the same id reports `NotFound`; the record is
    /// gone either way.
    pub async fn delete_session(&self, id: Uuid) -> AppResult<()> {
        if !self.backend.delete(id).await? {
            return Err(AppError::not_found(format!("No session with id {id}")));
        }

        info!(session_id = %id, "Session deleted");
        let _ = self.events.send(SessionEvent::Deleted { session_id: id });
        Ok(())
    }

    /// Remove all expired sessions, returning the number removed.
    ///
    /// Safe to run concurrently with every other operation.
    pub async fn sweep_expired(&self) -> AppResult<u64> {
        let count = self.backend.sweep_expired().await?;

        if count > 0 {
            info!(count = count, "Swept expired sessions");
            let _ = self.events.send(SessionEvent::Swept { count });
        }
        Ok(count)
    }

    /// Count active sessions.
    pub async fn count_active(&self) -> AppResult<i64> {
        self.backend.count_active().await
    }

    /// Resolve the effective ttl, rejecting non-positive values.
    fn resolve_ttl(&self, ttl: Option<Duration>) -> AppResult<i64> {
        let ttl = ttl.unwrap_or_else(|| self.config.default_ttl());
        let seconds = ttl.num_seconds();
        if seconds < 1 {
            return Err(AppError::validation(
                "Session ttl must be at least one second",
            ));
        }
        Ok(seconds)
    }
}

/// Validate a username against the wire-protocol field constraints.
fn validate_username(username: &str) -> AppResult<()> {
    if username.is_empty() {
        return Err(AppError::validation("Username must not be empty"));
    }
    if username.len() > USERNAME_MAX_LEN {
        return Err(AppError::validation(format!(
            "Username exceeds {USERNAME_MAX_LEN} bytes"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use playhub_core::error::ErrorKind;

    fn store() -> SessionStore {
        SessionStore::in_memory(SessionConfig::default())
    }

    #[tokio::test]
    async fn test_empty_username_rejected() {
        let err = store()
            .create_session("", 1, PlayerKind::Guest, None, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_oversized_username_rejected() {
        let username = "x".repeat(USERNAME_MAX_LEN + 1);
        let err = store()
            .create_session(&username, 1, PlayerKind::Authenticated, None, None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_non_positive_ttl_rejected() {
        let err = store()
            .create_session(
                "alice",
                1,
                PlayerKind::Authenticated,
                None,
                Some(Duration::zero()),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_default_ttl_applied() {
        let store = store();
        let session = store
            .create_session("alice", 1, PlayerKind::Authenticated, None, None)
            .await
            .unwrap();

        let expected = store.config.default_ttl().num_seconds();
        let actual = (session.expires_at - session.created_at).num_seconds();
        assert_eq!(actual, expected);
    }
}
