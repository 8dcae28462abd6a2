//! Protocol conformance suite run against both telemetry store
//! implementations. The two backends must be observably identical.

use raccord_core::{ContinuityState, ManifestationScore, Scene};
use raccord_interface::TelemetryStore;
use raccord_storage::{JsonFileTelemetryStore, MemoryTelemetryStore};
use std::collections::BTreeMap;

fn sample_state() -> ContinuityState {
    let scenes = vec![
        Scene::new(
            1,
            "coffee shop",
            vec!["Cole".to_string()],
            vec!["red notebook".to_string()],
            "Cole enters wearing a brown coat, carrying a red notebook.",
            "neutral",
        ),
        Scene::new(
            2,
            "police station",
            vec!["Cole".to_string()],
            vec![],
            "Cole reviews evidence.",
            "dramatic",
        ),
    ];
    let mut scores = BTreeMap::new();
    scores.insert(
        "red notebook".to_string(),
        ManifestationScore::from_counts("red notebook", 10, 3),
    );
    ContinuityState::from_run(&scenes, scores)
}

async fn assert_state_round_trip(store: &dyn TelemetryStore) {
    let state = sample_state();
    store.save_state(&state).await.unwrap();

    let loaded = store.load_state().await.unwrap().expect("state was saved");
    assert_eq!(loaded.scene_states(), state.scene_states());
    assert_eq!(loaded.manifestation_scores(), state.manifestation_scores());
}

async fn assert_counters_accumulate(store: &dyn TelemetryStore) {
    for appeared in [true, true, false, true] {
        store
            .record_manifestation("brown coat", appeared)
            .await
            .unwrap();
    }

    let scores = store.load_manifestation_scores().await.unwrap();
    let coat = &scores["brown coat"];
    assert_eq!(*coat.attempts(), 4);
    assert_eq!(*coat.successes(), 3);
    assert_eq!(coat.rate(), 0.75);
}

async fn assert_clear_removes_everything(store: &dyn TelemetryStore) {
    store.save_state(&sample_state()).await.unwrap();
    store.record_manifestation("sword", true).await.unwrap();

    store.clear().await.unwrap();

    assert!(store.load_state().await.unwrap().is_none());
    assert!(store.load_manifestation_scores().await.unwrap().is_empty());
}

async fn assert_repeated_writes_accumulate(store: &dyn TelemetryStore) {
    let writes = 25usize;
    for i in 0..writes {
        store
            .record_manifestation("umbrella", i % 2 == 0)
            .await
            .unwrap();
    }

    let scores = store.load_manifestation_scores().await.unwrap();
    assert_eq!(*scores["umbrella"].attempts(), writes as u64);
    assert_eq!(*scores["umbrella"].successes(), 13);
}

#[tokio::test]
async fn memory_store_conforms() {
    let store = MemoryTelemetryStore::new();
    assert_state_round_trip(&store).await;
    assert_counters_accumulate(&store).await;
    assert_clear_removes_everything(&store).await;
    assert_repeated_writes_accumulate(&store).await;
}

#[tokio::test]
async fn json_file_store_conforms() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileTelemetryStore::new(dir.path()).unwrap();
    assert_state_round_trip(&store).await;
    assert_counters_accumulate(&store).await;
    assert_clear_removes_everything(&store).await;
    assert_repeated_writes_accumulate(&store).await;
}

#[tokio::test]
async fn concurrent_writers_lose_no_updates() {
    use std::sync::Arc;

    let store = Arc::new(MemoryTelemetryStore::new());
    let mut handles = Vec::new();
    for i in 0..8 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            for _ in 0..50 {
                store
                    .record_manifestation("lantern", i % 2 == 0)
                    .await
                    .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let scores = store.load_manifestation_scores().await.unwrap();
    assert_eq!(*scores["lantern"].attempts(), 400);
    assert_eq!(*scores["lantern"].successes(), 200);
}

#[tokio::test]
async fn json_file_store_shares_files_between_handles() {
    let dir = tempfile::tempdir().unwrap();
    let writer = JsonFileTelemetryStore::new(dir.path()).unwrap();
    let reader = JsonFileTelemetryStore::new(dir.path()).unwrap();

    writer.save_state(&sample_state()).await.unwrap();
    writer.record_manifestation("knife", false).await.unwrap();

    assert!(reader.load_state().await.unwrap().is_some());
    let scores = reader.load_manifestation_scores().await.unwrap();
    assert_eq!(*scores["knife"].attempts(), 1);
    assert_eq!(*scores["knife"].successes(), 0);
}
