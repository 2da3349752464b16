//! Session persistence backends.
//!
//! The store talks to storage through [`SessionBackend`], implemented by:
//! - [`PostgresSessionBackend`] for production deployments
//! - [`MemorySessionBackend`] for single-node and test deployments

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use playhub_core::result::AppResult;
use playhub_entity::session::{CreateSession, Session};

pub use memory::MemorySessionBackend;
pub use postgres::PostgresSessionBackend;

/// Storage operations required by the session store.
///
/// Implementations must make `insert` atomic with respect to the
/// one-active-session-per-username constraint: of N concurrent inserts
/// for the same username, exactly one may return a session.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Insert a session, replacing an expired leftover for the same
    /// username if present. Returns `Ok(None)` when an active session
    /// already holds the username.
    async fn insert(&self, data: &CreateSession) -> AppResult<Option<Session>>;

    /// Find a session by ID, regardless of expiry.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>>;

    /// Find the active session for a username; expired-but-unswept
    /// records are treated as absent.
    async fn find_active_by_username(&self, username: &str) -> AppResult<Option<Session>>;

    /// Extend an active session's expiry to `now + ttl_seconds`.
    /// Returns `Ok(None)` if the session is absent or already expired.
    async fn extend(&self, id: Uuid, ttl_seconds: i64) -> AppResult<Option<Session>>;

    /// Delete a session by ID. Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Remove all expired sessions, returning the number removed.
    async fn sweep_expired(&self) -> AppResult<u64>;

    /// Count active sessions.
    async fn count_active(&self) -> AppResult<i64>;
}
