use std::time::Duration;

use reqwest::Method;
use vault_client::{
    CancellationToken, RequestExecutor, RequestOptions, Secret, VaultError,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn executor(uri: &str) -> RequestExecutor {
    RequestExecutor::new(uri, reqwest::Client::new())
}

#[tokio::test]
async fn test_body_round_trip_through_server_echo() {
    let server = MockServer::start().await;

    // Representative payload: nested maps, lists, nulls.
    let payload = serde_json::json!({
        "name": "app",
        "tags": ["a", "b"],
        "nested": { "deep": { "value": 1 }, "absent": null },
        "empty_list": []
    });

    Mock::given(method("POST"))
        .and(path("/v1/secret/data/app"))
        .and(body_json(payload.clone()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "data": payload.clone() })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let exec = executor(&server.uri());
    let secret: Secret<serde_json::Value> = exec
        .vault_request(
            Method::POST,
            "secret/data/app",
            Some(payload.clone()),
            RequestOptions::default(),
            None,
        )
        .await
        .unwrap();

    assert_eq!(secret.data.unwrap(), payload);
}

#[tokio::test]
async fn test_empty_body_2xx_is_a_default_secret() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/sys/policies/acl/app"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let exec = executor(&server.uri());
    let secret: Secret<serde_json::Value> = exec
        .vault_request(
            Method::POST,
            "sys/policies/acl/app",
            Some(serde_json::json!({ "policy": "..." })),
            RequestOptions::default(),
            None,
        )
        .await
        .unwrap();

    assert!(secret.data.is_none());
    assert!(secret.auth.is_none());
    assert_eq!(secret.lease_duration, 0);
}

#[tokio::test]
async fn test_token_header_attached_when_configured() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/secret/data/app"))
        .and(header("X-Vault-Token", "t1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let exec = executor(&server.uri());
    exec.set_token("t1").await;
    let _: Secret<serde_json::Value> = exec
        .vault_request(
            Method::GET,
            "secret/data/app",
            None,
            RequestOptions::default(),
            None,
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_no_token_header_without_a_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/sys/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let exec = executor(&server.uri());
    let _: Secret<serde_json::Value> = exec
        .vault_request(
            Method::GET,
            "sys/health",
            None,
            RequestOptions::default(),
            None,
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("X-Vault-Token").is_none());
}

#[tokio::test]
async fn test_wrap_ttl_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/secret/data/app"))
        .and(header("X-Vault-Wrap-TTL", "60s"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "wrap_info": {
                "token": "wrap-token",
                "ttl": 60,
                "creation_path": "secret/data/app"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let exec = executor(&server.uri());
    let secret: Secret<serde_json::Value> = exec
        .vault_request(
            Method::GET,
            "secret/data/app",
            None,
            RequestOptions::default().with_wrap_ttl("60s"),
            None,
        )
        .await
        .unwrap();

    let wrap = secret.wrap_info.unwrap();
    assert_eq!(wrap.token, "wrap-token");
    assert_eq!(wrap.ttl, 60);
}

#[tokio::test]
async fn test_non_2xx_preserves_raw_body_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/sys/init"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string("Vault is already initialized"),
        )
        .mount(&server)
        .await;

    let exec = executor(&server.uri());
    let err = exec
        .vault_request::<serde_json::Value>(
            Method::PUT,
            "sys/init",
            Some(serde_json::json!({})),
            RequestOptions::default(),
            None,
        )
        .await
        .unwrap_err();

    match err {
        VaultError::RequestFailed { status, message } => {
            assert_eq!(status, 400);
            // Callers pattern-match on the raw text.
            assert!(message.contains("already initialized"));
        }
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_custom_failure_handler_receives_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/sys/health"))
        .respond_with(ResponseTemplate::new(503).set_body_string("sealed"))
        .mount(&server)
        .await;

    let exec = executor(&server.uri());
    let secret: Secret<serde_json::Value> = exec
        .vault_request_with(
            Method::GET,
            "sys/health",
            None,
            RequestOptions::default(),
            None,
            Some(|status: u16, body: String| {
                assert_eq!(status, 503);
                assert_eq!(body, "sealed");
                Ok(Secret::default())
            }),
        )
        .await
        .unwrap();

    assert!(secret.data.is_none());
}

#[tokio::test]
async fn test_raw_text_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/sys/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain text, not json"))
        .mount(&server)
        .await;

    let exec = executor(&server.uri());
    let text = exec
        .vault_request_text(
            Method::GET,
            "sys/health",
            None,
            RequestOptions::default(),
            None,
        )
        .await
        .unwrap();

    assert_eq!(text, "plain text, not json");
}

#[tokio::test]
async fn test_connection_failure_is_a_transport_error() {
    // Nothing listens here.
    let exec = executor("http://127.0.0.1:1");
    let err = exec
        .vault_request::<serde_json::Value>(
            Method::GET,
            "sys/health",
            None,
            RequestOptions::default(),
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, VaultError::Transport(_)));
}

#[tokio::test]
async fn test_cancellation_aborts_in_flight_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/secret/data/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({}))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let exec = executor(&server.uri());
    let err = exec
        .vault_request::<serde_json::Value>(
            Method::GET,
            "secret/data/slow",
            None,
            RequestOptions::default(),
            Some(&cancel),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, VaultError::Cancelled));
}

#[tokio::test]
async fn test_get_requests_carry_no_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/secret/data/app"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let exec = executor(&server.uri());
    // A body passed with GET is dropped, not serialized.
    let _: Secret<serde_json::Value> = exec
        .vault_request(
            Method::GET,
            "secret/data/app",
            Some(serde_json::json!({ "ignored": true })),
            RequestOptions::default(),
            None,
        )
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
}
