//! Backend client tests against a stub HTTP server.
//!
//! The client is blocking, so every call runs on `spawn_blocking` while the
//! stub server lives on the async runtime.

use std::net::TcpListener;
use std::time::Duration;

use factcheck_client::{
    BackendClient, BackendConfig, ClientError, Confidence, FactChecker, Source, Verdict,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const EIFFEL: &str = "The Eiffel Tower is in London.";

fn eiffel_response() -> Value {
    json!({
        "verdict": "False",
        "confidence": "High",
        "reason": "The Eiffel Tower is located in Paris, France.",
        "additional_context": "...",
        "sources": []
    })
}

fn history_item(id: i64) -> Value {
    json!({
        "id": id,
        "statement": format!("Statement number {id}"),
        "verdict": "True",
        "confidence": "Medium",
        "reason": "Because.",
        "additional_context": "Context.",
        "created_at": "2025-06-01 12:00:00"
    })
}

fn config_for(server: &MockServer) -> BackendConfig {
    BackendConfig::new(format!("{}/v1", server.uri()))
}

/// Run a blocking closure off the async runtime.
async fn blocking<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task panicked")
}

#[tokio::test]
async fn test_eiffel_tower_scenario() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/fact-check"))
        .and(body_json(json!({ "statement": EIFFEL })))
        .respond_with(ResponseTemplate::new(200).set_body_json(eiffel_response()))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let result = blocking(move || {
        BackendClient::new(config)
            .expect("client")
            .fetch_fact_check(EIFFEL)
    })
    .await
    .expect("fact-check result");

    assert_eq!(result.verdict, Verdict::False);
    assert_eq!(result.confidence, Confidence::High);
    assert_eq!(result.reason, "The Eiffel Tower is located in Paris, France.");
    assert_eq!(result.sources, Vec::<Source>::new());
}

#[tokio::test]
async fn test_sources_are_parsed_in_order() {
    let server = MockServer::start().await;
    let mut body = eiffel_response();
    body["sources"] = json!([
        {"title": "Eiffel Tower", "url": "https://en.wikipedia.org/wiki/Eiffel_Tower"},
        {"title": "Paris", "url": "https://en.wikipedia.org/wiki/Paris"}
    ]);
    Mock::given(method("POST"))
        .and(path("/v1/fact-check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let result = blocking(move || BackendClient::new(config).expect("client").fetch_fact_check(EIFFEL))
        .await
        .expect("fact-check result");

    let titles: Vec<&str> = result.sources.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Eiffel Tower", "Paris"]);
}

#[tokio::test]
async fn test_invalid_verdict_is_a_validation_failure() {
    let server = MockServer::start().await;
    let mut body = eiffel_response();
    body["verdict"] = json!("Maybe");
    Mock::given(method("POST"))
        .and(path("/v1/fact-check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let (fetched, tried) = blocking(move || {
        let client = BackendClient::new(config).expect("client");
        (client.fetch_fact_check(EIFFEL), client.try_fact_check(EIFFEL))
    })
    .await;

    assert!(fetched.is_none());
    let err = tried.expect_err("validation should fail");
    assert!(err.is_validation(), "unexpected error: {err}");
    assert!(matches!(err, ClientError::Validation(_)));
}

#[tokio::test]
async fn test_non_json_body_is_a_validation_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/fact-check"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let err = blocking(move || BackendClient::new(config).expect("client").try_fact_check(EIFFEL))
        .await
        .expect_err("decode should fail");

    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/fact-check"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "An internal error occurred"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let err = blocking(move || BackendClient::new(config).expect("client").try_fact_check(EIFFEL))
        .await
        .expect_err("status should fail");

    match err {
        ClientError::Status { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("internal error"));
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/fact-check"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(eiffel_response())
                .set_delay(Duration::from_millis(1250)),
        )
        .mount(&server)
        .await;

    // 25 vs 20 time units, scaled down to keep the test fast.
    let config = config_for(&server).with_fact_check_timeout(Duration::from_millis(1000));
    let (fetched, tried) = blocking(move || {
        let client = BackendClient::new(config).expect("client");
        (client.fetch_fact_check(EIFFEL), client.try_fact_check(EIFFEL))
    })
    .await;

    assert!(fetched.is_none());
    match tried {
        Err(ClientError::Http(e)) => assert!(e.is_timeout(), "expected timeout, got {e}"),
        other => panic!("expected Http timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_refused_yields_none() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        listener.local_addr().expect("addr").port()
    };
    let config = BackendConfig::new(format!("http://127.0.0.1:{port}/v1"));

    let (fetched, history) = blocking(move || {
        let client = BackendClient::new(config).expect("client");
        (client.fetch_fact_check(EIFFEL), client.fetch_history())
    })
    .await;

    assert!(fetched.is_none());
    assert!(history.is_none());
}

#[tokio::test]
async fn test_empty_history_is_not_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let history = blocking(move || BackendClient::new(config).expect("client").fetch_history()).await;

    assert_eq!(history, Some(Vec::new()));
}

#[tokio::test]
async fn test_history_records_parsed() {
    let server = MockServer::start().await;
    let mut newest = history_item(2);
    newest["verdict"] = json!("Partially true");
    Mock::given(method("GET"))
        .and(path("/v1/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([newest, history_item(1)])))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let history = blocking(move || BackendClient::new(config).expect("client").fetch_history())
        .await
        .expect("history");

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, 2);
    assert_eq!(history[0].verdict, "Partially true");
    assert_eq!(history[1].statement, "Statement number 1");
    assert_eq!(history[1].created_at, "2025-06-01 12:00:00");
}

#[tokio::test]
async fn test_one_bad_history_record_fails_whole_fetch() {
    let server = MockServer::start().await;
    let mut items: Vec<Value> = (1..=100).map(history_item).collect();
    if let Some(obj) = items[57].as_object_mut() {
        obj.remove("id");
    }
    Mock::given(method("GET"))
        .and(path("/v1/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(items)))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let (fetched, tried) = blocking(move || {
        let client = BackendClient::new(config).expect("client");
        (client.fetch_history(), client.try_history())
    })
    .await;

    assert!(fetched.is_none());
    match tried {
        Err(ClientError::Validation(e)) => assert!(e.message().contains("history record 57")),
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_history_server_error_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/history"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "Failed to retrieve history"})))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let history = blocking(move || BackendClient::new(config).expect("client").fetch_history()).await;

    assert!(history.is_none());
}

#[tokio::test]
async fn test_history_null_body_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/history"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let history = blocking(move || BackendClient::new(config).expect("client").fetch_history()).await;

    assert!(history.is_none());
}

#[tokio::test]
async fn test_health_reports_up() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "UP"})))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let up = blocking(move || BackendClient::new(config).expect("client").health()).await;

    assert!(up);
}

#[tokio::test]
async fn test_health_reports_down() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let up = blocking(move || BackendClient::new(config).expect("client").health()).await;

    assert!(!up);
}
