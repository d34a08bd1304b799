//! Integration tests for the marker flow running inside a Store
//!
//! These drive the reducer the way the view shell does: through the
//! single-writer store, with the in-memory store and map standing in for the
//! remote services.

use std::sync::Arc;
use std::time::Duration;
use waymark_markers::mocks::{InMemoryMarkerStore, RecordingMapWidget, StoreCall};
use waymark_markers::{
    ClearPolicy, LatLng, LoadStatus, Marker, MarkerAction, MarkerEnvironment, MarkerId,
    MarkerReducer, MarkerState, MarkerStoreError, SyncConfig,
};
use waymark_runtime::Store;
use waymark_testing::{test_clock, test_epoch};

type MarkerStoreHandle = Store<MarkerState, MarkerAction>;

fn start(
    store: &InMemoryMarkerStore,
    map: &RecordingMapWidget,
    config: SyncConfig,
) -> MarkerStoreHandle {
    let env = MarkerEnvironment::new(store.clone(), map.clone())
        .with_clock(Arc::new(test_clock()))
        .with_config(config);
    Store::new(MarkerState::new(), MarkerReducer::new(), env)
}

fn at(lat: f64, lng: f64) -> LatLng {
    LatLng::from_raw(lat, lng)
}

fn click(lat: f64, lng: f64) -> MarkerAction {
    MarkerAction::MapClicked {
        position: Some(at(lat, lng)),
    }
}

async fn ids(store: &MarkerStoreHandle) -> Vec<MarkerId> {
    store.state(MarkerState::persisted_ids).await
}

#[tokio::test]
async fn first_click_in_add_mode_creates_m1() {
    let remote = InMemoryMarkerStore::new();
    let store = start(&remote, &RecordingMapWidget::new(), SyncConfig::default());

    store.send(MarkerAction::LoadMarkers).await.unwrap();
    store.send(MarkerAction::ToggleAddMode).await.unwrap();
    store.send(click(49.84, 24.03)).await.unwrap();

    let markers = store.state(|s| s.markers.clone()).await;
    assert_eq!(
        markers,
        vec![Marker {
            id: Some(MarkerId::new("m1")),
            position: at(49.84, 24.03),
            created_at: Some(test_epoch()),
        }]
    );
    assert_eq!(
        remote.calls(),
        vec![StoreCall::List, StoreCall::Create(at(49.84, 24.03))]
    );
}

#[tokio::test]
async fn session_round_trip() {
    let remote = InMemoryMarkerStore::with_markers(vec![
        Marker::unsaved(at(1.0, 1.0)),
        Marker::unsaved(at(2.0, 2.0)),
    ]);
    let store = start(&remote, &RecordingMapWidget::new(), SyncConfig::default());

    store.send(MarkerAction::LoadMarkers).await.unwrap();
    assert_eq!(store.state(|s| s.load_status).await, LoadStatus::Loaded);
    assert_eq!(ids(&store).await, vec![MarkerId::new("m1"), MarkerId::new("m2")]);

    store.send(MarkerAction::ToggleAddMode).await.unwrap();
    store.send(click(3.0, 3.0)).await.unwrap();
    assert_eq!(
        ids(&store).await,
        vec![MarkerId::new("m1"), MarkerId::new("m2"), MarkerId::new("m3")]
    );

    // Back to delete mode, tap the first marker
    store.send(MarkerAction::ToggleAddMode).await.unwrap();
    store
        .send(MarkerAction::MarkerClicked { index: 0 })
        .await
        .unwrap();
    assert_eq!(ids(&store).await, vec![MarkerId::new("m2"), MarkerId::new("m3")]);

    let remaining: Vec<_> = remote.stored().into_iter().filter_map(|m| m.id).collect();
    assert_eq!(remaining, vec![MarkerId::new("m2"), MarkerId::new("m3")]);
}

#[tokio::test]
async fn second_load_request_does_not_refetch() {
    let remote = InMemoryMarkerStore::new();
    let store = start(&remote, &RecordingMapWidget::new(), SyncConfig::default());

    store.send(MarkerAction::LoadMarkers).await.unwrap();
    store.send(MarkerAction::LoadMarkers).await.unwrap();

    assert_eq!(remote.calls(), vec![StoreCall::List]);
}

#[tokio::test]
async fn failed_load_is_reported_and_can_be_retried() {
    let remote = InMemoryMarkerStore::with_markers(vec![Marker::unsaved(at(1.0, 1.0))]);
    remote.fail_lists(MarkerStoreError::Unavailable("down".into()));
    let store = start(&remote, &RecordingMapWidget::new(), SyncConfig::default());

    store.send(MarkerAction::LoadMarkers).await.unwrap();

    assert_eq!(store.state(|s| s.load_status).await, LoadStatus::Failed);
    assert!(store.state(MarkerState::is_empty).await);
    let notice = store.state(|s| s.notice.clone()).await.unwrap();
    assert_eq!(
        notice.message,
        "Could not load markers: Marker store unavailable: down"
    );

    // The session keeps working while the store is down
    store.send(MarkerAction::ToggleAddMode).await.unwrap();
    assert!(store.state(|s| s.is_add_mode).await);

    remote.heal();
    store.send(MarkerAction::LoadMarkers).await.unwrap();

    assert_eq!(store.state(|s| s.load_status).await, LoadStatus::Loaded);
    assert_eq!(ids(&store).await, vec![MarkerId::new("m1")]);
    assert_eq!(remote.calls(), vec![StoreCall::List, StoreCall::List]);
}

#[tokio::test]
async fn clear_all_deletes_in_list_order() {
    let remote = InMemoryMarkerStore::new();
    let store = start(&remote, &RecordingMapWidget::new(), SyncConfig::default());

    store.send(MarkerAction::ToggleAddMode).await.unwrap();
    for lat in [10.0, 20.0, 30.0] {
        store.send(click(lat, 0.0)).await.unwrap();
    }
    store.send(MarkerAction::ClearAll).await.unwrap();

    assert!(store.state(MarkerState::is_empty).await);
    assert!(remote.stored().is_empty());

    let deletes: Vec<_> = remote
        .calls()
        .into_iter()
        .filter(|call| matches!(call, StoreCall::Delete(_)))
        .collect();
    assert_eq!(
        deletes,
        vec![
            StoreCall::Delete(MarkerId::new("m1")),
            StoreCall::Delete(MarkerId::new("m2")),
            StoreCall::Delete(MarkerId::new("m3")),
        ]
    );
}

#[tokio::test]
async fn partial_clear_respects_policy() {
    for (policy, expected) in [
        (ClearPolicy::DropAll, vec![]),
        (ClearPolicy::RetainFailed, vec![MarkerId::new("m2")]),
    ] {
        let remote = InMemoryMarkerStore::new();
        let store = start(
            &remote,
            &RecordingMapWidget::new(),
            SyncConfig::default().with_clear_policy(policy),
        );

        store.send(MarkerAction::ToggleAddMode).await.unwrap();
        store.send(click(1.0, 1.0)).await.unwrap();
        store.send(click(2.0, 2.0)).await.unwrap();

        remote.fail_delete_of(
            MarkerId::new("m2"),
            MarkerStoreError::Unavailable("timeout".into()),
        );
        store.send(MarkerAction::ClearAll).await.unwrap();

        assert_eq!(ids(&store).await, expected, "policy {policy:?}");
        assert!(store.state(|s| s.notice.is_some()).await);
    }
}

#[tokio::test]
async fn clear_all_with_store_down_still_empties_list() {
    let remote = InMemoryMarkerStore::with_markers(vec![
        Marker::unsaved(at(1.0, 1.0)),
        Marker::unsaved(at(2.0, 2.0)),
    ]);
    let store = start(&remote, &RecordingMapWidget::new(), SyncConfig::default());
    store.send(MarkerAction::LoadMarkers).await.unwrap();

    remote.fail_deletes(MarkerStoreError::Unavailable("down".into()));
    store.send(MarkerAction::ClearAll).await.unwrap();

    assert!(store.state(MarkerState::is_empty).await);
    let notice = store.state(|s| s.notice.clone()).await.unwrap();
    assert_eq!(notice.message, "Could not delete 2 of 2 markers");
    // Both attempted, neither removed remotely
    assert_eq!(
        remote.calls(),
        vec![
            StoreCall::List,
            StoreCall::Delete(MarkerId::new("m1")),
            StoreCall::Delete(MarkerId::new("m2")),
        ]
    );
    assert_eq!(remote.stored().len(), 2);
}

#[tokio::test]
async fn markers_already_gone_remotely_count_as_cleared() {
    let remote = InMemoryMarkerStore::with_markers(vec![
        Marker::unsaved(at(1.0, 1.0)),
        Marker::unsaved(at(2.0, 2.0)),
    ]);
    let store = start(
        &remote,
        &RecordingMapWidget::new(),
        SyncConfig::default().with_clear_policy(ClearPolicy::RetainFailed),
    );
    store.send(MarkerAction::LoadMarkers).await.unwrap();

    remote.fail_delete_of(
        MarkerId::new("m1"),
        MarkerStoreError::NotFound(MarkerId::new("m1")),
    );
    store.send(MarkerAction::ClearAll).await.unwrap();

    assert!(store.state(MarkerState::is_empty).await);
    assert_eq!(store.state(|s| s.notice.clone()).await, None);
}

#[tokio::test]
async fn drag_never_reaches_the_store() {
    let remote = InMemoryMarkerStore::new();
    let store = start(&remote, &RecordingMapWidget::new(), SyncConfig::default());

    store.send(MarkerAction::ToggleAddMode).await.unwrap();
    store.send(click(1.0, 1.0)).await.unwrap();
    let calls_before = remote.calls();

    store
        .send(MarkerAction::MarkerDragEnded {
            index: 0,
            position: Some(at(5.0, 5.0)),
        })
        .await
        .unwrap();

    assert_eq!(remote.calls(), calls_before);
    assert_eq!(
        store.state(|s| s.markers.clone()).await,
        vec![Marker::unsaved(at(5.0, 5.0))]
    );
    // The remote copy still sits at the original position
    assert_eq!(remote.stored()[0].position, at(1.0, 1.0));

    // Without its id the dragged marker can no longer be deleted
    store.send(MarkerAction::ToggleAddMode).await.unwrap();
    store
        .send(MarkerAction::MarkerClicked { index: 0 })
        .await
        .unwrap();
    assert_eq!(remote.calls(), calls_before);
    assert_eq!(store.state(MarkerState::len).await, 1);
}

#[tokio::test]
async fn queued_clicks_are_persisted_in_order() {
    let remote = InMemoryMarkerStore::new();
    let store = start(&remote, &RecordingMapWidget::new(), SyncConfig::default());

    store.enqueue(MarkerAction::ToggleAddMode).unwrap();
    for lat in 1..=5 {
        store.enqueue(click(f64::from(lat), 0.0)).unwrap();
    }
    // FIFO: once this resolves, everything before it has been processed
    store.send(MarkerAction::ToggleListVisible).await.unwrap();

    let markers = store.state(|s| s.markers.clone()).await;
    let observed: Vec<_> = markers
        .iter()
        .map(|m| (m.id.clone().unwrap(), m.position.lat))
        .collect();
    assert_eq!(
        observed,
        vec![
            (MarkerId::new("m1"), 1.0),
            (MarkerId::new("m2"), 2.0),
            (MarkerId::new("m3"), 3.0),
            (MarkerId::new("m4"), 4.0),
            (MarkerId::new("m5"), 5.0),
        ]
    );
}

#[tokio::test]
async fn failure_notice_is_dismissed_after_ttl() {
    let remote = InMemoryMarkerStore::new();
    remote.fail_creates(MarkerStoreError::Unavailable("offline".into()));
    let store = start(
        &remote,
        &RecordingMapWidget::new(),
        SyncConfig::default().with_notice_ttl(Duration::from_millis(50)),
    );

    store.send(MarkerAction::ToggleAddMode).await.unwrap();
    store.send(click(1.0, 1.0)).await.unwrap();

    assert!(store.state(MarkerState::is_empty).await);
    let notice = store.state(|s| s.notice.clone()).await.unwrap();
    assert!(notice.message.contains("offline"));

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(store.state(|s| s.notice.clone()).await, None);
}

#[tokio::test]
async fn focus_moves_the_map_camera() {
    let map = RecordingMapWidget::new();
    let store = start(&InMemoryMarkerStore::new(), &map, SyncConfig::default());

    store.send(MarkerAction::ToggleAddMode).await.unwrap();
    store.send(click(48.0, 23.0)).await.unwrap();
    store.send(MarkerAction::FocusMarker { index: 0 }).await.unwrap();

    assert_eq!(map.pans(), vec![at(48.0, 23.0)]);
    assert_eq!(map.zooms(), vec![15]);
}

#[tokio::test]
async fn observers_see_remote_outcomes() {
    let store = start(
        &InMemoryMarkerStore::new(),
        &RecordingMapWidget::new(),
        SyncConfig::default(),
    );
    let mut actions = store.subscribe_actions();

    store.send(MarkerAction::ToggleAddMode).await.unwrap();
    store.send(click(1.0, 1.0)).await.unwrap();

    assert_eq!(actions.recv().await.unwrap(), MarkerAction::ToggleAddMode);
    assert_eq!(actions.recv().await.unwrap(), click(1.0, 1.0));
    assert!(matches!(
        actions.recv().await.unwrap(),
        MarkerAction::MarkerCreated { .. }
    ));
}
