//! Session store behavior tests against the in-memory backend.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::Duration;
use futures::future::join_all;

use playhub_core::config::SessionConfig;
use playhub_core::error::ErrorKind;
use playhub_core::events::SessionEvent;
use playhub_entity::session::PlayerKind;
use playhub_session::{SessionStore, SessionSweeper};

fn store() -> SessionStore {
    SessionStore::in_memory(SessionConfig::default())
}

#[tokio::test]
async fn test_create_then_lookup_returns_same_record() {
    let store = store();

    let created = store
        .create_session(
            "alice",
            7,
            PlayerKind::Authenticated,
            Some(42),
            Some(Duration::minutes(30)),
        )
        .await
        .unwrap();

    let found = store.lookup_by_username("alice").await.unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.username, "alice");
    assert_eq!(found.player_id, 7);
    assert_eq!(found.connection_key, Some(42));
    assert!(found.is_active());
}

#[tokio::test]
async fn test_lookup_unknown_username_not_found() {
    let err = store().lookup_by_username("nobody").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_expired_session_not_returned() {
    let store = store();
    store
        .create_session(
            "alice",
            7,
            PlayerKind::Authenticated,
            None,
            Some(Duration::seconds(1)),
        )
        .await
        .unwrap();

    tokio::time::sleep(StdDuration::from_millis(1200)).await;

    // Not yet swept, but must be treated as absent.
    let err = store.lookup_by_username("alice").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(store.count_active().await.unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_active_session_rejected() {
    let store = store();
    store
        .create_session("alice", 7, PlayerKind::Authenticated, None, None)
        .await
        .unwrap();

    let err = store
        .create_session("alice", 7, PlayerKind::Authenticated, None, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateSession);
}

#[tokio::test]
async fn test_concurrent_creates_exactly_one_succeeds() {
    let store = Arc::new(store());

    let attempts = (0..16).map(|i| {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            store
                .create_session("alice", i, PlayerKind::Authenticated, None, None)
                .await
        })
    });

    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.unwrap())
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(
        results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| e.kind == ErrorKind::DuplicateSession)
    );
    assert_eq!(store.count_active().await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_replaces_expired_leftover() {
    let store = store();
    let first = store
        .create_session(
            "alice",
            7,
            PlayerKind::Authenticated,
            None,
            Some(Duration::seconds(1)),
        )
        .await
        .unwrap();

    tokio::time::sleep(StdDuration::from_millis(1200)).await;

    // No sweep ran; the create must still win the username back.
    let second = store
        .create_session("alice", 7, PlayerKind::Authenticated, None, None)
        .await
        .unwrap();

    assert_ne!(second.id, first.id);
    assert_eq!(store.lookup_by_username("alice").await.unwrap().id, second.id);
}

#[tokio::test]
async fn test_refresh_extends_expiry() {
    let store = store();
    let created = store
        .create_session(
            "alice",
            7,
            PlayerKind::Authenticated,
            None,
            Some(Duration::seconds(1)),
        )
        .await
        .unwrap();

    let refreshed = store
        .refresh_session(created.id, Some(Duration::minutes(30)))
        .await
        .unwrap();
    assert!(refreshed.expires_at > created.expires_at);
    assert!(refreshed.refreshed_at.is_some());
    assert_eq!(refreshed.created_at, created.created_at);

    // Past the original ttl, the session must still be visible.
    tokio::time::sleep(StdDuration::from_millis(1200)).await;
    assert_eq!(store.lookup_by_username("alice").await.unwrap().id, created.id);
}

#[tokio::test]
async fn test_refresh_expired_session_not_found() {
    let store = store();
    let created = store
        .create_session(
            "alice",
            7,
            PlayerKind::Authenticated,
            None,
            Some(Duration::seconds(1)),
        )
        .await
        .unwrap();

    tokio::time::sleep(StdDuration::from_millis(1200)).await;

    let err = store
        .refresh_session(created.id, Some(Duration::minutes(30)))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_refresh_unknown_id_not_found() {
    let err = store()
        .refresh_session(uuid::Uuid::new_v4(), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_twice_then_not_found() {
    let store = store();
    let created = store
        .create_session("alice", 7, PlayerKind::Authenticated, None, None)
        .await
        .unwrap();

    store.delete_session(created.id).await.unwrap();

    let err = store.delete_session(created.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_frees_username() {
    let store = store();
    let first = store
        .create_session("alice", 7, PlayerKind::Authenticated, None, None)
        .await
        .unwrap();

    store.delete_session(first.id).await.unwrap();

    let second = store
        .create_session("alice", 7, PlayerKind::Authenticated, None, None)
        .await
        .unwrap();
    assert_ne!(second.id, first.id);
}

#[tokio::test]
async fn test_sweep_removes_only_expired() {
    let store = store();
    store
        .create_session(
            "shortlived",
            1,
            PlayerKind::Guest,
            None,
            Some(Duration::seconds(1)),
        )
        .await
        .unwrap();
    store
        .create_session(
            "longlived",
            2,
            PlayerKind::Authenticated,
            None,
            Some(Duration::minutes(30)),
        )
        .await
        .unwrap();

    tokio::time::sleep(StdDuration::from_millis(1200)).await;

    assert_eq!(store.sweep_expired().await.unwrap(), 1);
    assert!(store.lookup_by_username("longlived").await.is_ok());

    // Second sweep in a row finds nothing.
    assert_eq!(store.sweep_expired().await.unwrap(), 0);
}

#[tokio::test]
async fn test_sweeper_wrapper_reports_count() {
    let store = Arc::new(store());
    store
        .create_session(
            "alice",
            7,
            PlayerKind::Authenticated,
            None,
            Some(Duration::seconds(1)),
        )
        .await
        .unwrap();

    tokio::time::sleep(StdDuration::from_millis(1200)).await;

    let sweeper = SessionSweeper::new(Arc::clone(&store));
    assert_eq!(sweeper.run_sweep().await.unwrap(), 1);
    assert_eq!(sweeper.run_sweep().await.unwrap(), 0);
}

#[tokio::test]
async fn test_lifecycle_events_emitted() {
    let store = store();
    let mut events = store.subscribe();

    let created = store
        .create_session("alice", 7, PlayerKind::Authenticated, None, None)
        .await
        .unwrap();
    store.delete_session(created.id).await.unwrap();

    match events.recv().await.unwrap() {
        SessionEvent::Created {
            session_id,
            username,
            ..
        } => {
            assert_eq!(session_id, created.id);
            assert_eq!(username, "alice");
        }
        other => panic!("expected Created event, got {other:?}"),
    }
    match events.recv().await.unwrap() {
        SessionEvent::Deleted { session_id } => assert_eq!(session_id, created.id),
        other => panic!("expected Deleted event, got {other:?}"),
    }
}
