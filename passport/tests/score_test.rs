//! Integration tests for the score lookup client.

use passport::ScoreClient;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn server_with(status: u16, body: Option<serde_json::Value>) -> MockServer {
    let server = MockServer::start().await;
    let mut template = ResponseTemplate::new(status);
    if let Some(body) = body {
        template = template.set_body_json(body);
    }
    Mock::given(method("GET"))
        .and(path("/score/0xabc"))
        .respond_with(template)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_score_found() {
    let server = server_with(200, Some(json!({"data": {"totalScore": 42.5}}))).await;
    let client = ScoreClient::new(&format!("{}/score", server.uri()));
    assert_eq!(client.fetch_score("0xabc").await, Some(42.5));
}

#[tokio::test]
async fn test_score_missing_is_none() {
    let server = server_with(200, Some(json!({"data": {}}))).await;
    let client = ScoreClient::new(&format!("{}/score", server.uri()));
    assert_eq!(client.fetch_score("0xabc").await, None);
}

#[tokio::test]
async fn test_score_error_status_is_none() {
    let server = server_with(500, None).await;
    let client = ScoreClient::new(&format!("{}/score", server.uri()));
    assert_eq!(client.fetch_score("0xabc").await, None);
}

#[tokio::test]
async fn test_score_unknown_address_is_none() {
    let server = server_with(200, Some(json!({"data": {"totalScore": 1.0}}))).await;
    let client = ScoreClient::new(&format!("{}/score", server.uri()));
    // No mock for this path: wiremock answers 404.
    assert_eq!(client.fetch_score("0xdef").await, None);
}

#[tokio::test]
async fn test_score_malformed_body_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;
    let client = ScoreClient::new(&format!("{}/score", server.uri()));
    assert_eq!(client.fetch_score("0xabc").await, None);
}

#[tokio::test]
async fn test_score_unreachable_is_none() {
    let client = ScoreClient::new("http://127.0.0.1:1/score");
    assert_eq!(client.fetch_score("0xabc").await, None);
}
