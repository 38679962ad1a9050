// Integration tests for stream sessions over real HTTP
// These tests run the reqwest transport against a wiremock server

use std::time::Duration;

use opstream::session::{
    DeploymentParams, ProvisionParams, SessionParams, SessionState, TailParams,
};
use opstream::{SessionSnapshot, StreamClient, StreamConfig, StreamSession};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn event_stream(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/event-stream")
}

async fn settle<P: SessionParams>(session: &StreamSession<P>) -> SessionSnapshot {
    tokio::time::timeout(Duration::from_secs(10), session.wait_until_settled())
        .await
        .expect("session did not settle")
}

#[tokio::test]
async fn test_provision_stream_completes_with_status() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/servers/srv-1/provision/abc/stream"))
        .respond_with(event_stream(
            "data: {\"line\":\"step 1\"}\n\ndata: {\"line\":\"step 2\"}\n\ndata: {\"done\":true,\"status\":\"active\"}\n\n",
        ))
        .mount(&mock_server)
        .await;

    let client = StreamClient::from_config(StreamConfig::new().with_base_url(mock_server.uri()));
    let mut session = client.provision();
    session.set_params(Some(ProvisionParams::new("srv-1", "abc")));

    let snapshot = settle(&session).await;
    assert_eq!(snapshot.lines, vec!["step 1", "step 2"]);
    assert!(!snapshot.is_streaming);
    assert_eq!(snapshot.status.as_deref(), Some("active"));
    assert_eq!(snapshot.error, None);
}

#[tokio::test]
async fn test_server_error_fails_without_lines() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/apps/app-1/deployments/9/stream"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = StreamClient::from_config(StreamConfig::new().with_base_url(mock_server.uri()));
    let mut session = client.deployment();
    session.set_params(Some(DeploymentParams::new("app-1", "9")));

    let snapshot = settle(&session).await;
    assert!(snapshot.lines.is_empty());
    assert!(!snapshot.is_streaming);
    assert_eq!(snapshot.status, None);
    let error = snapshot.error.expect("error should be set");
    assert!(error.contains("500"), "unexpected error: {}", error);
}

#[tokio::test]
async fn test_unknown_stream_reports_not_found() {
    let mock_server = MockServer::start().await;

    let client = StreamClient::from_config(StreamConfig::new().with_base_url(mock_server.uri()));
    let mut session = client.provision();
    session.set_params(Some(ProvisionParams::new("srv-1", "expired")));

    let snapshot = settle(&session).await;
    assert!(snapshot.error.unwrap().contains("404"));
}

#[tokio::test]
async fn test_bearer_token_and_accept_header_are_sent() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/apps/app-1/deployments/d1/stream"))
        .and(header("Authorization", "Bearer secret-token"))
        .and(header("Accept", "text/event-stream"))
        .respond_with(event_stream("data: {\"done\":true,\"status\":\"success\"}\n\n"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = StreamConfig::new()
        .with_base_url(mock_server.uri())
        .with_auth_token("secret-token");
    let client = StreamClient::from_config(config);
    let mut session = client.deployment();
    session.set_params(Some(DeploymentParams::new("app-1", "d1")));

    let snapshot = settle(&session).await;
    assert_eq!(snapshot.status.as_deref(), Some("success"));
    assert_eq!(snapshot.error, None);
}

#[tokio::test]
async fn test_tail_query_and_server_close() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/apps/web/logs/stream"))
        .and(query_param("lines", "25"))
        .and(query_param("container", "worker"))
        .respond_with(event_stream(
            "data: {\"line\":\"GET / 200\"}\n\ndata: {\"done\":true}\n\ndata: {\"line\":\"GET /health 200\"}\n\n",
        ))
        .mount(&mock_server)
        .await;

    let client = StreamClient::from_config(StreamConfig::new().with_base_url(mock_server.uri()));
    let mut tail = client.tail();
    tail.set_params(Some(TailParams::new("web").with_container("worker").with_lines(25)));

    settle(&tail).await;
    let snapshot = tail.tail_snapshot();
    // Terminal frames do not end a tail; only the server closing the body does
    assert_eq!(snapshot.lines, vec!["GET / 200", "GET /health 200"]);
    assert!(!snapshot.is_streaming);
    assert_eq!(snapshot.error, None);
    assert_eq!(tail.state(), SessionState::Completed(None));
}

#[tokio::test]
async fn test_connection_refused_fails() {
    // Nothing listens on port 1
    let client = StreamClient::from_config(StreamConfig::new().with_base_url("http://127.0.0.1:1"));
    let mut session = client.provision();
    session.set_params(Some(ProvisionParams::new("s", "t")));

    let snapshot = settle(&session).await;
    assert!(snapshot.error.is_some());
    assert!(snapshot.lines.is_empty());
}
