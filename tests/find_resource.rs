//! Integration tests for name-or-id lookups using wiremock

use serde_json::json;
use sgsclient::resource::{find_id, find_resource};
use sgsclient::{Client, ClientConfig, Error};
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    let config = ClientConfig::new(format!("{}/v1/demo", server.uri()));
    Client::new(&config).expect("valid endpoint")
}

async fn mount_not_found(server: &MockServer, resource_path: &str) {
    Mock::given(method("GET"))
        .and(path(resource_path))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "itemNotFound": {"message": "not found", "code": 404}
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// A known id resolves without listing
#[tokio::test]
async fn test_id_hit_skips_name_search() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/demo/volumes/v-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "volume": {"id": "v-1", "name": "data"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/demo/volumes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"volumes": []})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let volume = assert_ok!(find_resource(&client.volumes(), "v-1").await);
    assert_eq!(volume.name(), Some("data"));
}

/// An unknown id falls back to an exact name match
#[tokio::test]
async fn test_single_name_match() {
    let server = MockServer::start().await;
    mount_not_found(&server, "/v1/demo/volumes/data").await;
    Mock::given(method("GET"))
        .and(path("/v1/demo/volumes"))
        .and(query_param("name", "data"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "volumes": [
                {"id": "v-1", "name": "data"},
                {"id": "v-2", "name": "data-old"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let id = assert_ok!(find_id(&client.volumes(), "data").await);
    assert_eq!(id, "v-1");
}

/// A 400 for a malformed id also falls back to the name search
#[tokio::test]
async fn test_bad_request_falls_back_to_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/demo/snapshots/nightly"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "badRequest": {"message": "invalid id", "code": 400}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/demo/snapshots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "snapshots": [{"id": "s-7", "name": "nightly"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let id = assert_ok!(find_id(&client.snapshots(), "nightly").await);
    assert_eq!(id, "s-7");
}

/// No match by id or name is NotFound
#[tokio::test]
async fn test_no_match() {
    let server = MockServer::start().await;
    mount_not_found(&server, "/v1/demo/backups/ghost").await;
    Mock::given(method("GET"))
        .and(path("/v1/demo/backups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"backups": []})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = assert_err!(find_resource(&client.backups(), "ghost").await);
    assert_eq!(
        err,
        Error::NotFound {
            message: "No backup with a name or ID of 'ghost' exists.".to_string()
        }
    );
}

/// Several exact name matches are ambiguous
#[tokio::test]
async fn test_multiple_matches() {
    let server = MockServer::start().await;
    mount_not_found(&server, "/v1/demo/replications/pair").await;
    Mock::given(method("GET"))
        .and(path("/v1/demo/replications"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "replications": [
                {"id": "r-1", "name": "pair"},
                {"id": "r-2", "name": "pair"}
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = assert_err!(find_resource(&client.replications(), "pair").await);
    assert!(matches!(err, Error::NoUniqueMatch { .. }));
    assert_eq!(
        err.to_string(),
        "Multiple replication matches found for 'pair', use an ID to be more specific."
    );
}

/// Failures other than a lookup miss are returned as is
#[tokio::test]
async fn test_server_error_is_not_a_miss() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/demo/checkpoints/c-1"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/demo/checkpoints"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"checkpoints": []})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = assert_err!(find_resource(&client.checkpoints(), "c-1").await);
    assert_eq!(err.status(), Some(503));
}
