use std::time::Duration;

use journal_tracker_core::{Issn, TrackerConfig};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::{CatalogClient, CatalogError, CatalogLookup};

const SEARCH_PATH: &str = "/public/v1/libraries/3820/search";

fn issn(raw: &str) -> Issn {
    raw.parse().unwrap()
}

fn test_client(server: &MockServer) -> CatalogClient {
    CatalogClient::new("test-key".to_owned(), &server.uri(), 3820)
        .unwrap()
        .with_backoff(Duration::from_millis(5))
}

fn entry(issn: &str, title: &str) -> serde_json::Value {
    json!({ "id": 42, "type": "journals", "issn": issn, "title": title })
}

#[tokio::test]
async fn test_success_on_first_attempt() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("issns", "00368075,00280836"))
        .and(query_param("access_token", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [entry("0036-8075", "Science"), entry("0028-0836", "Nature")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let found = client.search_batch(&[issn("00368075"), issn("00280836")]).await.unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].issn, issn("00368075"));
    assert_eq!(found[0].title, "Science");
    assert_eq!(found[0].catalog_id.as_deref(), Some("42"));
}

#[tokio::test]
async fn test_retry_on_429_then_success() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [entry("00368075", "Science")] })),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("Rate limit exceeded"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    let found = client.search_batch(&[issn("00368075")]).await.unwrap();
    assert_eq!(found[0].title, "Science");
}

#[tokio::test]
async fn test_no_retry_on_401() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.search_batch(&[issn("00368075")]).await.unwrap_err();
    let err_msg = err.to_string();
    assert!(err_msg.contains("401"));
    assert!(err_msg.contains("Unauthorized"));
}

#[tokio::test]
async fn test_all_retries_exhausted() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .expect(4)
        .mount(&server)
        .await;

    let err = client.search_batch(&[issn("00368075")]).await.unwrap_err();
    assert!(matches!(err, CatalogError::RetriesExhausted(_)));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_missing_data_array_yields_nothing() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "nope" })))
        .mount(&server)
        .await;

    assert!(client.search_batch(&[issn("00368075")]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_entries_without_title_are_ignored() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "issn": "00368075" }, { "title": "No ISSN" }, entry("00280836", "Nature")]
        })))
        .mount(&server)
        .await;

    let found = client.search_batch(&[issn("00368075"), issn("00280836")]).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Nature");
}

#[tokio::test]
async fn test_lookup_batches_and_skips_failed_batch() {
    let server = MockServer::start().await;
    let client = test_client(&server).with_batch_size(2);

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("issns", "00000001,00000002"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [entry("00000001", "One"), entry("00000002", "Two")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("issns", "00000003"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .expect(1)
        .mount(&server)
        .await;

    let issns = [issn("00000001"), issn("00000002"), issn("0000-0001"), issn("00000003")];
    let found = client.lookup(&issns).await.unwrap();
    let titles: Vec<&str> = found.iter().map(|j| j.title.as_str()).collect();
    assert_eq!(titles, vec!["One", "Two"]);
}

#[tokio::test]
async fn test_lookup_errors_when_every_batch_fails() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let err = client.lookup(&[issn("00368075")]).await.unwrap_err();
    assert!(matches!(err, CatalogError::HttpStatus { code: 403, .. }));
}

#[tokio::test]
async fn test_lookup_of_nothing_makes_no_request() {
    let server = MockServer::start().await;
    let client = test_client(&server);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    assert!(client.lookup(&[]).await.unwrap().is_empty());
}

#[test]
fn from_config_requires_api_key() {
    let config = TrackerConfig::default();
    let err = CatalogClient::from_config(&config).unwrap_err();
    assert!(matches!(err, CatalogError::MissingApiKey));
}

#[test]
fn debug_redacts_api_key() {
    let config = TrackerConfig {
        catalog_api_key: Some("secret-value".to_owned()),
        batch_size: 0,
        ..TrackerConfig::default()
    };
    let client = CatalogClient::from_config(&config).unwrap();
    assert!(!format!("{client:?}").contains("secret-value"));
    assert_eq!(client.batch_size(), 1);
}
