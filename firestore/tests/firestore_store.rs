//! HTTP-level tests for the Firestore marker store against a mock server

use serde_json::json;
use waymark_firestore::{FirestoreConfig, FirestoreMarkerStore};
use waymark_markers::{LatLng, MarkerId, MarkerStore, MarkerStoreError, NewMarker};
use waymark_testing::test_epoch;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COLLECTION: &str = "/projects/demo/databases/(default)/documents/markers";

fn store_for(server: &MockServer) -> FirestoreMarkerStore {
    let config = FirestoreConfig::new("demo")
        .with_base_url(server.uri())
        .with_page_size(2);
    FirestoreMarkerStore::new(config).unwrap()
}

fn doc(id: &str, lat: f64, lng: f64) -> serde_json::Value {
    json!({
        "name": format!("projects/demo/databases/(default)/documents/markers/{id}"),
        "fields": {
            "lat": { "doubleValue": lat },
            "lng": { "doubleValue": lng },
            "timestamp": { "timestampValue": "2025-01-01T00:00:00Z" }
        }
    })
}

#[tokio::test]
async fn list_follows_page_tokens() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(COLLECTION))
        .and(query_param("pageSize", "2"))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [doc("a", 1.0, 1.0), doc("b", 2.0, 2.0)],
            "nextPageToken": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(COLLECTION))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [doc("c", 3.0, 3.0)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let markers = store_for(&server).list_all().await.unwrap();

    let ids: Vec<_> = markers.into_iter().filter_map(|m| m.id).collect();
    assert_eq!(
        ids,
        vec![MarkerId::new("a"), MarkerId::new("b"), MarkerId::new("c")]
    );
}

#[tokio::test]
async fn empty_collection_lists_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(COLLECTION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    assert_eq!(store_for(&server).list_all().await, Ok(vec![]));
}

#[tokio::test]
async fn malformed_document_fails_the_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(COLLECTION))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{
                "name": "projects/demo/databases/(default)/documents/markers/bad",
                "fields": { "lat": { "stringValue": "north" } }
            }]
        })))
        .mount(&server)
        .await;

    let error = store_for(&server).list_all().await.unwrap_err();
    assert!(matches!(error, MarkerStoreError::InvalidRecord(_)));
}

#[tokio::test]
async fn create_posts_fields_and_returns_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COLLECTION))
        .and(body_json(json!({
            "fields": {
                "lat": { "doubleValue": 49.84 },
                "lng": { "doubleValue": 24.03 },
                "timestamp": { "timestampValue": "2025-01-01T00:00:00Z" }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(doc("new-id", 49.84, 24.03)))
        .expect(1)
        .mount(&server)
        .await;

    let marker = NewMarker {
        position: LatLng::from_raw(49.84, 24.03),
        created_at: test_epoch(),
    };
    let id = store_for(&server).create(&marker).await.unwrap();
    assert_eq!(id, MarkerId::new("new-id"));
}

#[tokio::test]
async fn api_key_and_token_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{COLLECTION}/abc")))
        .and(query_param("key", "secret"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let config = FirestoreConfig::new("demo")
        .with_base_url(server.uri())
        .with_api_key("secret")
        .with_auth_token("tok");
    let store = FirestoreMarkerStore::new(config).unwrap();

    assert_eq!(store.delete_by_id(&MarkerId::new("abc")).await, Ok(()));
}

#[tokio::test]
async fn delete_maps_statuses() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{COLLECTION}/gone")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": 404, "message": "Document not found", "status": "NOT_FOUND" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{COLLECTION}/busy")))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{COLLECTION}/slow")))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{COLLECTION}/locked")))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": { "code": 403, "message": "Missing or insufficient permissions.", "status": "PERMISSION_DENIED" }
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);

    assert_eq!(
        store.delete_by_id(&MarkerId::new("gone")).await,
        Err(MarkerStoreError::NotFound(MarkerId::new("gone")))
    );
    assert!(
        store
            .delete_by_id(&MarkerId::new("busy"))
            .await
            .unwrap_err()
            .is_transient()
    );
    assert!(
        store
            .delete_by_id(&MarkerId::new("slow"))
            .await
            .unwrap_err()
            .is_transient()
    );
    assert_eq!(
        store.delete_by_id(&MarkerId::new("locked")).await,
        Err(MarkerStoreError::Request {
            status: 403,
            message: "Missing or insufficient permissions.".to_string(),
        })
    );
}

#[tokio::test]
async fn unreachable_server_is_unavailable() {
    // Nothing listens on port 1
    let config = FirestoreConfig::new("demo").with_base_url("http://127.0.0.1:1");
    let store = FirestoreMarkerStore::new(config).unwrap();

    let error = store.list_all().await.unwrap_err();
    assert!(error.is_transient());
}

#[tokio::test]
async fn batch_delete_continues_after_failure() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(format!("{COLLECTION}/b")))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let report = store_for(&server)
        .delete_many(vec![MarkerId::new("a"), MarkerId::new("b"), MarkerId::new("c")])
        .await;

    assert_eq!(report.deleted, vec![MarkerId::new("a"), MarkerId::new("c")]);
    assert!(report.has_failed(&MarkerId::new("b")));

    let paths: Vec<_> = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.url.path().rsplit('/').next().unwrap_or_default().to_string())
        .collect();
    assert_eq!(paths, ["a", "b", "c"]);
}
