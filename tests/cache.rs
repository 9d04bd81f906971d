//! Cache Integration Tests
//!
//! Cached-fetch behavior against a real HTTP origin.

use std::sync::Arc;

use lektury_mirror::config::HttpSettings;
use lektury_mirror::{Cache, CachePolicy, HttpOrigin, MirrorError, RemoteUrl};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn http_cache(offline: bool) -> Cache {
    let origin = HttpOrigin::new(&HttpSettings::default()).unwrap();
    Cache::new(Arc::new(origin), offline, CachePolicy::TrustForever)
}

fn remote(server: &MockServer, p: &str) -> RemoteUrl {
    format!("{}{}", server.uri(), p).parse().unwrap()
}

#[tokio::test]
async fn test_cache_hit_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("remote"))
        .expect(0)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let file = temp.path().join("a.txt");
    std::fs::write(&file, "local copy").unwrap();

    let content = http_cache(false)
        .fetch(&file, &remote(&server, "/a.txt"))
        .await
        .unwrap();

    assert_eq!(content, b"local copy");
}

#[tokio::test]
async fn test_cache_miss_makes_exactly_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/a.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\x00binary\xffbody".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let file = temp.path().join("a.txt");
    let cache = http_cache(false);
    let url = remote(&server, "/media/a.txt");

    let content = cache.fetch(&file, &url).await.unwrap();
    assert_eq!(content, b"\x00binary\xffbody");
    assert_eq!(std::fs::read(&file).unwrap(), content);

    // Second call is served from disk
    let again = cache.fetch(&file, &url).await.unwrap();
    assert_eq!(again, content);
}

#[tokio::test]
async fn test_offline_miss_makes_no_request_and_writes_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("remote"))
        .expect(0)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let file = temp.path().join("a.txt");

    let err = http_cache(true)
        .fetch(&file, &remote(&server, "/a.txt"))
        .await
        .unwrap_err();

    assert!(matches!(err, MirrorError::Offline { .. }));
    assert_eq!(std::fs::read_dir(temp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_http_error_status_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone.pdf"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .expect(1)
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let file = temp.path().join("gone.pdf");

    let err = http_cache(false)
        .fetch(&file, &remote(&server, "/gone.pdf"))
        .await
        .unwrap_err();

    assert!(matches!(err, MirrorError::Status { status: 404, .. }));
    assert!(!file.exists());
}
