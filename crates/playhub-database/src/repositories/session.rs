//! Session repository implementation.
//!
//! All session SQL lives here. Expiry comparisons and new timestamps are
//! computed with the database clock (`NOW()`), so a single clock decides
//! which records are alive.

use sqlx::PgPool;
use uuid::Uuid;

use playhub_core::error::{AppError, ErrorKind};
use playhub_core::result::AppResult;
use playhub_entity::session::{CreateSession, Session};

/// Repository for session CRUD and expiry operations.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Atomically create a session for a username.
    ///
    /// The UNIQUE index on `username` makes the check-then-insert a single
    /// atomic statement: the insert claims the username, and the conflict
    /// branch only fires when the existing row is already expired, replacing
    /// it with a fresh record. Returns `Ok(None)` when an active session
    /// holds the username — of N concurrent creates, exactly one gets a row.
    pub async fn insert(&self, data: &CreateSession) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>(
            "INSERT INTO player_sessions AS s \
                 (id, username, player_id, player_kind, connection_key, expires_at) \
             VALUES ($1, $2, $3, $4, $5, NOW() + make_interval(secs => $6)) \
             ON CONFLICT (username) DO UPDATE SET \
                 id = EXCLUDED.id, \
                 player_id = EXCLUDED.player_id, \
                 player_kind = EXCLUDED.player_kind, \
                 connection_key = EXCLUDED.connection_key, \
                 created_at = NOW(), \
                 expires_at = EXCLUDED.expires_at, \
                 refreshed_at = NULL \
             WHERE s.expires_at <= NOW() \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&data.username)
        .bind(data.player_id)
        .bind(data.player_kind)
        .bind(data.connection_key)
        .bind(data.ttl_seconds as f64)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create session", e))
    }

    /// Find a session by ID, regardless of expiry.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>("SELECT * FROM player_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find session", e))
    }

    /// Find the active session for a username.
    ///
    /// An expired-but-unswept row is not returned.
    pub async fn find_active_by_username(&self, username: &str) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>(
            "SELECT * FROM player_sessions WHERE username = $1 AND expires_at > NOW()",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find session by username", e)
        })
    }

    /// Extend an active session's expiry (sliding expiry).
    ///
    /// Returns `Ok(None)` if the session is absent or already expired.
    pub async fn extend(&self, id: Uuid, ttl_seconds: i64) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>(
            "UPDATE player_sessions \
             SET expires_at = NOW() + make_interval(secs => $2), refreshed_at = NOW() \
             WHERE id = $1 AND expires_at > NOW() \
             RETURNING *",
        )
        .bind(id)
        .bind(ttl_seconds as f64)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to extend session", e))
    }

    /// Delete a session by ID. Returns whether a row was removed.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM player_sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete session", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove all expired sessions. Returns the number of rows removed.
    pub async fn sweep_expired(&self) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM player_sessions WHERE expires_at <= NOW()")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to sweep expired sessions", e)
            })?;
        Ok(result.rows_affected())
    }

    /// Count active sessions.
    pub async fn count_active(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM player_sessions WHERE expires_at > NOW()")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count active sessions", e)
            })
    }
}
