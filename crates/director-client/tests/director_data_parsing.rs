//! Integration tests for decoding Director responses.
//!
//! These tests serve recorded Director bodies from a local mock server and
//! validate that the client unwraps them the way the service intends,
//! including the stray backslashes real installs emit.

use director_client::{
    AlbumListParams, ContentListParams, ContentSort, DirectorClient, Error, GalleryParams, Scope,
    SortDirection,
};
use std::fs;
use std::path::PathBuf;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Get the path to the test fixtures directory.
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Load a fixture body from disk.
fn load_fixture(name: &str) -> String {
    let fixture_path = fixtures_dir().join(name);
    fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture at {}: {}",
            fixture_path.display(),
            e
        )
    })
}

/// Start a mock server answering `scope` with the named fixture.
async fn serve_fixture(scope: &str, fixture: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/{scope}")))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture(fixture)))
        .mount(&server)
        .await;
    server
}

fn hosted_client(server: &MockServer) -> DirectorClient {
    DirectorClient::new("hosted-a1b2c3", &server.uri()).expect("valid hosted configuration")
}

#[test]
fn test_album_fixture_is_not_plain_json() {
    // Recorded bodies carry escapes a strict parser rejects
    let body = load_fixture("album_list.json");
    assert!(serde_json::from_str::<serde_json::Value>(&body).is_err());
}

#[tokio::test]
async fn test_album_list_with_stray_backslashes() {
    let server = serve_fixture("get_album_list", "album_list.json").await;

    let albums = hosted_client(&server)
        .get_albums(&AlbumListParams::default())
        .await
        .unwrap_or_else(|e| panic!("Failed to decode album list: {e}"));

    let albums = albums.as_array().expect("albums should be a list");
    assert_eq!(albums.len(), 2, "Expected 2 albums in test data");

    let first = &albums[0];
    assert_eq!(first["id"], "441917");
    assert_eq!(first["name"], "Bob's Porsche");
    assert_eq!(first["description"], "Weekend drive & detail shots");
    assert_eq!(first["tags"], "suv,porsche");

    // Escaped slashes and \u escapes survive
    assert_eq!(
        first["preview"]["src"],
        "http://director.example.com/p.php?a=441917"
    );
    assert_eq!(first["contents"][0]["caption"], "Front édition");
    assert_eq!(first["contents"].as_array().map(Vec::len), Some(2));

    // Escaped quotes survive
    let second = &albums[1];
    assert_eq!(second["name"], "Summer \"Trip\"");
    assert_eq!(second["contents"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_gallery_payload_is_returned_whole() {
    let server = serve_fixture("get_gallery", "gallery.json").await;

    let gallery = hosted_client(&server)
        .get_gallery(81173, &GalleryParams::default())
        .await
        .unwrap();

    assert_eq!(gallery["id"], "81173");
    assert_eq!(gallery["name"], "Travel");

    let albums = gallery["albums"].as_array().expect("gallery should list albums");
    assert_eq!(albums.len(), 2);
    assert!(albums.iter().all(|album| album.get("id").is_some()));
}

#[tokio::test]
async fn test_content_list_scoped_to_album() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/get_content_list"))
        .and(query_param("only_images", "1"))
        .and(query_param("sort_on", "captured_on"))
        .and(query_param("sort_direction", "ASC"))
        .and(query_param("scope", "album"))
        .and(query_param("scope_id", "441975"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("content_list.json")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let params = ContentListParams {
        only_images: true,
        ..ContentListParams::default()
    }
    .with_sort(ContentSort::CapturedOn, SortDirection::Asc)
    .with_scope(Scope::Album, 441975);

    let contents = hosted_client(&server).get_images(&params).await.unwrap();
    let contents = contents.as_array().expect("contents should be a list");

    assert_eq!(contents.len(), 3);
    for content in contents {
        assert_eq!(content["album_id"], "441975");
    }
    assert!(contents[2]["captured_on"].is_null());
}

#[tokio::test]
async fn test_service_error_fixture() {
    let server = serve_fixture("get_gallery", "service_error.json").await;

    let err = hosted_client(&server)
        .get_gallery(10001, &GalleryParams::default())
        .await
        .unwrap_err();

    assert_eq!(err, Error::ServiceError("Gallery not found".to_string()));
    assert_eq!(err.error_code(), "SERVICE_ERROR");
}

#[tokio::test]
async fn test_local_install_uses_front_controller() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index.php"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"stat":"ok","data":{"version":"1.5.2"}}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = DirectorClient::new("local-a1b2c3", &server.uri()).unwrap();
    assert_eq!(
        client.base_path(),
        format!("{}/index.php?/api/", server.uri())
    );
    assert_eq!(client.get_version().await.unwrap(), "1.5.2");
}
