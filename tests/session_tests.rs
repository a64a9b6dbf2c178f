// Tests for the segment buffer, trigger/rotation policies, and the
// session registry.

use std::sync::Arc;

use streamscribe::audio::AudioClip;
use streamscribe::session::{
    Phase, RegistryError, RotationPolicy, SegmentStore, SessionRegistry, TriggerPolicy,
};

fn clip_of_bytes(bytes: usize) -> AudioClip {
    AudioClip::new(vec![0i16; bytes / 2], 16000, 1)
}

#[test]
fn test_store_tracks_len_and_bytes() {
    let mut store = SegmentStore::new();
    assert!(store.is_empty());
    assert_eq!(store.total_bytes(), 0);

    store.push(clip_of_bytes(400));
    store.push(clip_of_bytes(600));

    assert_eq!(store.len(), 2);
    assert_eq!(store.total_bytes(), 1000);
}

#[test]
fn test_store_assigns_arrival_indices() {
    let mut store = SegmentStore::new();
    assert_eq!(store.push(clip_of_bytes(2)), 0);
    assert_eq!(store.push(clip_of_bytes(2)), 1);
    store.evict_oldest();
    // Indices keep counting arrivals, they are never reused
    assert_eq!(store.push(clip_of_bytes(2)), 2);
}

#[test]
fn test_store_evicts_oldest_first() {
    let mut store = SegmentStore::new();
    store.push(clip_of_bytes(100));
    store.push(clip_of_bytes(200));

    let evicted = store.evict_oldest().unwrap();
    assert_eq!(evicted.index, 0);
    assert_eq!(evicted.byte_len, 100);
    assert_eq!(store.total_bytes(), 200);
    assert_eq!(store.len(), 1);
}

#[test]
fn test_store_clear_releases_everything() {
    let mut store = SegmentStore::new();
    store.push(clip_of_bytes(100));
    store.push(clip_of_bytes(100));

    assert_eq!(store.clear(), 2);
    assert!(store.is_empty());
    assert_eq!(store.total_bytes(), 0);
    assert!(store.evict_oldest().is_none());
}

#[test]
fn test_trigger_at_threshold() {
    let trigger = TriggerPolicy::new(1000);
    assert!(!trigger.should_run(0));
    assert!(!trigger.should_run(999));
    assert!(trigger.should_run(1000));
    assert!(trigger.should_run(1200));
}

#[test]
fn test_rotation_below_bound_is_noop() {
    let mut store = SegmentStore::new();
    store.push(clip_of_bytes(10));
    store.push(clip_of_bytes(10));

    let rotation = RotationPolicy::new(8);
    assert_eq!(rotation.rotate(&mut store), 0);
    assert_eq!(store.len(), 2);
}

#[test]
fn test_rotation_evicts_down_to_bound() {
    let mut store = SegmentStore::new();
    for _ in 0..5 {
        store.push(clip_of_bytes(10));
    }

    let rotation = RotationPolicy::new(2);
    assert_eq!(rotation.rotate(&mut store), 3);
    assert_eq!(store.len(), 2);

    // The two survivors are the newest arrivals
    let oldest = store.evict_oldest().unwrap();
    assert_eq!(oldest.index, 3);
}

#[tokio::test]
async fn test_registry_create_get_remove() {
    let registry = SessionRegistry::new();

    let handle = registry.create("alpha").await.unwrap();
    assert_eq!(handle.session_id, "alpha");
    assert_eq!(handle.phase().await, Phase::Active);
    assert_eq!(registry.len().await, 1);

    let fetched = registry.get("alpha").await.unwrap();
    assert_eq!(fetched.session_id, "alpha");

    assert!(registry.remove("alpha").await.is_some());
    assert!(registry.is_empty().await);
}

#[tokio::test]
async fn test_registry_rejects_duplicate_ids() {
    let registry = SessionRegistry::new();
    registry.create("alpha").await.unwrap();

    match registry.create("alpha").await {
        Err(RegistryError::Duplicate(id)) => assert_eq!(id, "alpha"),
        other => panic!("expected Duplicate error, got {:?}", other.map(|_| ())),
    }
}

#[tokio::test]
async fn test_registry_get_unknown_session() {
    let registry = SessionRegistry::new();
    assert!(matches!(
        registry.get("ghost").await,
        Err(RegistryError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_registry_remove_is_idempotent() {
    let registry = SessionRegistry::new();
    registry.create("alpha").await.unwrap();

    assert!(registry.remove("alpha").await.is_some());
    assert!(registry.remove("alpha").await.is_none());
    // Removing a session that never initialized is fine too
    assert!(registry.remove("never-created").await.is_none());
}

#[tokio::test]
async fn test_registry_concurrent_creates() {
    let registry = Arc::new(SessionRegistry::new());

    let mut tasks = Vec::new();
    for i in 0..16 {
        let registry = Arc::clone(&registry);
        tasks.push(tokio::spawn(async move {
            registry.create(&format!("session-{}", i)).await
        }));
    }

    for task in tasks {
        assert!(task.await.unwrap().is_ok());
    }
    assert_eq!(registry.len().await, 16);
}
