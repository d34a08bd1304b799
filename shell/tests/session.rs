//! End-to-end tests for the shell session over the in-memory backend

use std::time::Duration;
use waymark_markers::mocks::{InMemoryMarkerStore, StoreCall};
use waymark_markers::{LatLng, MarkerId, SyncConfig};
use waymark_shell::commands::parse;
use waymark_shell::{Backend, Outcome, Session};

async fn run(session: &Session, line: &str) -> Outcome {
    let command = parse(line).unwrap().unwrap();
    session.execute(command).await.unwrap()
}

fn text(outcome: Outcome) -> String {
    match outcome {
        Outcome::Continue(text) => text,
        Outcome::Quit => panic!("unexpected quit"),
    }
}

#[tokio::test]
async fn add_list_focus_and_clear() {
    let remote = InMemoryMarkerStore::new();
    let session = Session::start(Backend::Memory(remote.clone()), SyncConfig::default(), None);
    session.load().await.unwrap();

    run(&session, "mode").await;
    run(&session, "click 49.84 24.03").await;
    let page = text(run(&session, "click 50 25").await);
    assert!(page.contains("( 2) Lat: 50.00000, Lng: 25.00000  [m2]"));

    let page = text(run(&session, "list").await);
    assert!(page.contains("Markers: 2"));
    assert!(page.contains("Marker 2"));

    let page = text(run(&session, "focus 1").await);
    assert!(page.starts_with("Map  Lat: 49.84000, Lng: 24.03000 @ zoom 15"));
    assert_eq!(session.map().camera().center, LatLng::from_raw(49.84, 24.03));

    run(&session, "clear").await;
    assert!(session.state(|s| s.is_empty()).await);
    assert!(remote.stored().is_empty());
}

#[tokio::test]
async fn tap_deletes_outside_add_mode() {
    let remote = InMemoryMarkerStore::new();
    let session = Session::start(Backend::Memory(remote.clone()), SyncConfig::default(), None);

    run(&session, "mode").await;
    run(&session, "click 1 1").await;
    run(&session, "tap 1").await;
    assert_eq!(session.state(|s| s.len()).await, 1);

    run(&session, "mode").await;
    run(&session, "tap 1").await;
    assert_eq!(session.state(|s| s.len()).await, 0);
    assert_eq!(
        remote.calls().last(),
        Some(&StoreCall::Delete(MarkerId::new("m1")))
    );
}

#[tokio::test]
async fn drag_moves_local_copy_only() {
    let remote = InMemoryMarkerStore::new();
    let session = Session::start(Backend::Memory(remote.clone()), SyncConfig::default(), None);

    run(&session, "mode").await;
    run(&session, "click 1 1").await;
    let page = text(run(&session, "drag 1 2 2").await);

    assert!(page.contains("Lat: 2.00000, Lng: 2.00000  [#1]"));
    assert_eq!(remote.stored()[0].position, LatLng::from_raw(1.0, 1.0));
}

#[tokio::test]
async fn failures_show_a_notice() {
    let remote = InMemoryMarkerStore::new();
    remote.fail_creates(waymark_markers::MarkerStoreError::Unavailable(
        "offline".to_string(),
    ));
    let session = Session::start(Backend::Memory(remote), SyncConfig::default(), None);

    run(&session, "mode").await;
    let page = text(run(&session, "click 1 1").await);
    assert!(page.contains("! Could not save marker: Marker store unavailable: offline"));
    assert!(page.contains("(no markers)"));
}

#[tokio::test]
async fn help_metrics_and_quit() {
    let session = Session::start(
        Backend::Memory(InMemoryMarkerStore::new()),
        SyncConfig::default(),
        None,
    );

    assert!(text(run(&session, "help").await).contains("click <lat> <lng>"));
    assert!(text(run(&session, "metrics").await).contains("metrics are off"));
    assert_eq!(run(&session, "quit").await, Outcome::Quit);

    session.shutdown(Duration::from_secs(1)).await.unwrap();
}
