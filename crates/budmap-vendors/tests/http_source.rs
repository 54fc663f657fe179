//! `HttpVendorSource` against a mock catalog service.

use budmap_core::SEED_VENDORS_YAML;
use budmap_vendors::{HttpVendorSource, SourceError, VendorSource};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// The embedded seed catalog as the JSON body a catalog service would return.
fn seed_catalog_json() -> Value {
    let file = budmap_core::parse_vendors(SEED_VENDORS_YAML).unwrap();
    json!({ "vendors": file.vendors })
}

fn source_for(server: &MockServer) -> HttpVendorSource {
    HttpVendorSource::new(&server.uri(), 5, "budmap-test/0.1").unwrap()
}

#[tokio::test]
async fn fetch_all_parses_vendor_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vendors"))
        .and(header("user-agent", "budmap-test/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(seed_catalog_json()))
        .expect(1)
        .mount(&server)
        .await;

    let vendors = source_for(&server).fetch_all().await.unwrap();
    assert_eq!(vendors.len(), 5);
    assert_eq!(vendors[0].id, "1");
    assert_eq!(vendors[0].name, "Green Dreams");
}

#[tokio::test]
async fn fetch_by_id_returns_vendor() {
    let server = MockServer::start().await;
    let green_dreams = seed_catalog_json()["vendors"][0].clone();
    Mock::given(method("GET"))
        .and(path("/vendors/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(green_dreams))
        .mount(&server)
        .await;

    let vendor = source_for(&server).fetch_by_id("1").await.unwrap();
    assert_eq!(vendor.map(|v| v.name).as_deref(), Some("Green Dreams"));
}

#[tokio::test]
async fn fetch_by_id_rejects_a_different_vendor() {
    let server = MockServer::start().await;
    let green_dreams = seed_catalog_json()["vendors"][0].clone();
    Mock::given(method("GET"))
        .and(path("/vendors/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(green_dreams))
        .mount(&server)
        .await;

    let err = source_for(&server).fetch_by_id("2").await.unwrap_err();
    assert!(
        matches!(
            err,
            SourceError::VendorIdMismatch { ref requested, ref returned, .. }
                if requested == "2" && returned == "1"
        ),
        "got: {err}"
    );
}

#[tokio::test]
async fn fetch_by_id_maps_404_to_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vendors/does-not-exist"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let vendor = source_for(&server).fetch_by_id("does-not-exist").await.unwrap();
    assert!(vendor.is_none());
}

#[tokio::test]
async fn fetch_all_404_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vendors"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = source_for(&server).fetch_all().await.unwrap_err();
    assert!(
        matches!(err, SourceError::UnexpectedStatus { status: 404, .. }),
        "got: {err}"
    );
}

#[tokio::test]
async fn server_error_is_unexpected_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let source = source_for(&server);
    let err = source.fetch_all().await.unwrap_err();
    assert!(
        matches!(err, SourceError::UnexpectedStatus { status: 500, .. }),
        "got: {err}"
    );
    let err = source.fetch_by_id("1").await.unwrap_err();
    assert!(
        matches!(err, SourceError::UnexpectedStatus { status: 500, .. }),
        "got: {err}"
    );
}

#[tokio::test]
async fn garbage_body_is_deserialize_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vendors"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = source_for(&server).fetch_all().await.unwrap_err();
    assert!(matches!(err, SourceError::Deserialize { .. }), "got: {err}");
}

#[tokio::test]
async fn invalid_remote_catalog_is_rejected() {
    let server = MockServer::start().await;
    let mut body = seed_catalog_json();
    body["vendors"][1]["rating"] = json!(9.5);
    Mock::given(method("GET"))
        .and(path("/vendors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let err = source_for(&server).fetch_all().await.unwrap_err();
    assert!(matches!(err, SourceError::InvalidCatalog(_)), "got: {err}");
}
