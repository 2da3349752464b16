//! In-memory session backend using a Tokio mutex for single-node deployments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use playhub_core::result::AppResult;
use playhub_entity::session::{CreateSession, Session};

use super::SessionBackend;

/// Internal state for the memory backend.
///
/// Two maps mirror the two persistent lookup structures: primary records
/// by id, and the username index. `by_username` may point at an expired
/// record until the next sweep or replacing create.
#[derive(Debug, Default)]
struct InnerState {
    /// Session records keyed by id.
    by_id: HashMap<Uuid, Session>,
    /// Username index into `by_id`.
    by_username: HashMap<String, Uuid>,
}

/// In-memory session backend.
///
/// Every operation runs under one mutex. Suitable for single-node
/// deployments and tests only.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionBackend {
    /// Protected inner state.
    state: Arc<Mutex<InnerState>>,
}

impl MemorySessionBackend {
    /// Create an empty memory backend.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionBackend for MemorySessionBackend {
    async fn insert(&self, data: &CreateSession) -> AppResult<Option<Session>> {
        let mut state = self.state.lock().await;
        let now = Utc::now();

        if let Some(existing_id) = state.by_username.get(&data.username).copied() {
            let still_active = state
                .by_id
                .get(&existing_id)
                .is_some_and(|existing| existing.expires_at > now);
            if still_active {
                return Ok(None);
            }
            // Expired leftover or dangling index entry: replace it.
            state.by_id.remove(&existing_id);
        }

        let session = Session {
            id: Uuid::new_v4(),
            username: data.username.clone(),
            player_id: data.player_id,
            player_kind: data.player_kind,
            connection_key: data.connection_key,
            created_at: now,
            expires_at: now + Duration::seconds(data.ttl_seconds),
            refreshed_at: None,
        };

        state
            .by_username
            .insert(session.username.clone(), session.id);
        state.by_id.insert(session.id, session.clone());

        Ok(Some(session))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Session>> {
        let state = self.state.lock().await;
        Ok(state.by_id.get(&id).cloned())
    }

    async fn find_active_by_username(&self, username: &str) -> AppResult<Option<Session>> {
        let state = self.state.lock().await;
        let now = Utc::now();

        Ok(state
            .by_username
            .get(username)
            .and_then(|id| state.by_id.get(id))
            .filter(|session| session.expires_at > now)
            .cloned())
    }

    async fn extend(&self, id: Uuid, ttl_seconds: i64) -> AppResult<Option<Session>> {
        let mut state = self.state.lock().await;
        let now = Utc::now();

        match state.by_id.get_mut(&id) {
            Some(session) if session.expires_at > now => {
                session.expires_at = now + Duration::seconds(ttl_seconds);
                session.refreshed_at = Some(now);
                Ok(Some(session.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut state = self.state.lock().await;

        match state.by_id.remove(&id) {
            Some(session) => {
                if state.by_username.get(&session.username) == Some(&id) {
                    state.by_username.remove(&session.username);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn sweep_expired(&self) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let now = Utc::now();

        let expired: Vec<Uuid> = state
            .by_id
            .values()
            .filter(|session| session.expires_at <= now)
            .map(|session| session.id)
            .collect();

        for id in &expired {
            if let Some(session) = state.by_id.remove(id) {
                if state.by_username.get(&session.username) == Some(id) {
                    state.by_username.remove(&session.username);
                }
            }
        }

        Ok(expired.len() as u64)
    }

    async fn count_active(&self) -> AppResult<i64> {
        let state = self.state.lock().await;
        let now = Utc::now();

        Ok(state
            .by_id
            .values()
            .filter(|session| session.expires_at > now)
            .count() as i64)
    }
}
