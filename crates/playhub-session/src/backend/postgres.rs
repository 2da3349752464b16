//! PostgreSQL session backend delegating to the repository layer.

use async_trait::async_trait;
use uuid::Uuid;

use playhub_core::result::AppResult;
use playhub_database::repositories::SessionRepository;
use playhub_entity::session::{CreateSession, Session};

use super::SessionBackend;

/// Session backend over PostgreSQL.
///
/// All statements are single atomic SQL operations; the uniqueness
/// constraint lives in the database, not in application locking.
#[derive(Debug, Clone)]
pub struct PostgresSessionBackend {
    /// Session database repository.
    repo: SessionRepository,
}

impl PostgresSessionBackend {
    /// Create a backend over an existing repository.
    pub fn new(repo: SessionRepository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl SessionBackend for PostgresSessionBackend {
    async fn insert(&self, data: &CreateSession) -> AppResult<Option<Session>> {
        self.repo.insert(data).await
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        self.repo.find_by_id(id).await
    }

    async fn find_active_by_username(&self, username: &str) -> AppResult<Option<Session>> {
        self.repo.find_active_by_username(username).await
    }

    async fn extend(&self, id: Uuid, ttl_seconds: i64) -> AppResult<Option<Session>> {
        self.repo.extend(id, ttl_seconds).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        self.repo.delete(id).await
    }

    async fn sweep_expired(&self) -> AppResult<u64> {
        self.repo.sweep_expired().await
    }

    async fn count_active(&self) -> AppResult<i64> {
        self.repo.count_active().await
    }
}
