//! End-to-end proxy tests against a local stub upstream.

use axum::Router;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::routing::{get, post};
use flate2::Compression;
use flate2::write::GzEncoder;
use regtrace_providers::{Provider, ProviderRegistry};
use regtrace_proxy::Proxy;
use serde_json::{Value, json};
use std::io::Write;
use std::net::SocketAddr;

const CHAT_RESPONSE: &str = r#"{
  "model": "gpt-4o",
  "choices": [{
    "message": {
      "tool_calls": [{
        "id": "call_1",
        "function": {"name": "get_weather", "arguments": "{\"city\": \"Lisbon\"}"}
      }]
    }
  }],
  "usage": {"prompt_tokens": 10, "completion_tokens": 5}
}"#;

async fn chat() -> ([(header::HeaderName, &'static str); 1], &'static str) {
    ([(header::CONTENT_TYPE, "application/json")], CHAT_RESPONSE)
}

async fn gzipped() -> (HeaderMap, Vec<u8>) {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(br#"{"compressed": true}"#).unwrap();
    let body = encoder.finish().unwrap();

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_ENCODING, HeaderValue::from_static("gzip"));
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    (headers, body)
}

async fn plain() -> &'static str {
    "not json at all"
}

async fn start_stub() -> SocketAddr {
    let app = Router::new()
        .route("/v1/chat/completions", post(chat))
        .route("/gzip", get(gzipped))
        .route("/plain", get(plain));

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0))
        .await
        .expect("bind stub");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve stub");
    });
    addr
}

async fn start_proxy_against_stub() -> (Proxy, SocketAddr) {
    let stub = start_stub().await;
    let registry =
        ProviderRegistry::new().with_base_url(Provider::OpenAi, format!("http://{}", stub));
    let proxy = Proxy::start(registry).await.expect("start proxy");
    let addr = proxy.addr();
    (proxy, addr)
}

#[tokio::test]
async fn forwards_and_records_one_trace_per_call() {
    let (proxy, addr) = start_proxy_against_stub().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("http://{}/v1/chat/completions", addr))
        .header("Authorization", "Bearer secret123")
        .header("x-regtrace-target", "openai")
        .json(&json!({"model": "gpt-4o", "messages": []}))
        .send()
        .await
        .expect("proxied request");

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("response json");
    assert_eq!(body["usage"]["prompt_tokens"], 10);

    let traces = proxy.drain();
    assert_eq!(traces.len(), 1);

    let trace = &traces[0];
    assert_eq!(trace.provider, "openai");
    assert_eq!(trace.endpoint, "/v1/chat/completions");
    assert_eq!(trace.model.as_deref(), Some("gpt-4o"));
    assert_eq!(trace.tokens_in, 10);
    assert_eq!(trace.tokens_out, 5);
    assert_eq!(trace.tool_calls.len(), 1);
    assert_eq!(trace.tool_calls[0].name, "get_weather");
    assert_eq!(trace.response.status_code, 200);

    // Credentials never reach the stored trace.
    assert_eq!(trace.request.headers["authorization"], "[REDACTED]");
    // The internal routing header is recorded but was not forwarded upstream.
    assert_eq!(trace.request.headers["x-regtrace-target"], "openai");

    proxy.shutdown().await;
}

#[tokio::test]
async fn missing_target_header_uses_default_provider() {
    let (proxy, addr) = start_proxy_against_stub().await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/v1/chat/completions", addr))
        .json(&json!({"model": "gpt-4o"}))
        .send()
        .await
        .expect("proxied request");

    assert_eq!(response.status(), 200);
    assert_eq!(proxy.drain().len(), 1);
    proxy.shutdown().await;
}

#[tokio::test]
async fn unknown_provider_is_bad_gateway_and_records_nothing() {
    let (proxy, addr) = start_proxy_against_stub().await;

    let response = reqwest::Client::new()
        .post(format!("http://{}/v1/chat/completions", addr))
        .header("x-regtrace-target", "mistral")
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 502);
    assert!(proxy.drain().is_empty());
    proxy.shutdown().await;
}

#[tokio::test]
async fn upstream_failure_is_bad_gateway_and_records_nothing() {
    // Port 9 (discard) on localhost is almost certainly closed.
    let registry = ProviderRegistry::new()
        .with_custom_endpoint("http://127.0.0.1:9")
        .with_default_provider(Provider::Custom);
    let proxy = Proxy::start(registry).await.expect("start proxy");

    let response = reqwest::Client::new()
        .post(format!("http://{}/v1/chat/completions", proxy.addr()))
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 502);
    assert!(proxy.drain().is_empty());
    proxy.shutdown().await;
}

#[tokio::test]
async fn gzip_responses_reach_the_caller_decompressed() {
    let (proxy, addr) = start_proxy_against_stub().await;

    let response = reqwest::Client::new()
        .get(format!("http://{}/gzip", addr))
        .header("x-regtrace-target", "openai")
        .send()
        .await
        .expect("request");

    assert_eq!(response.status(), 200);
    assert!(response.headers().get(header::CONTENT_ENCODING).is_none());
    let length: usize = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .expect("content-length")
        .to_str()
        .unwrap()
        .parse()
        .unwrap();

    let body = response.bytes().await.expect("body");
    assert_eq!(length, body.len());
    assert_eq!(&body[..], br#"{"compressed": true}"#);

    // The trace holds the decompressed JSON too.
    let traces = proxy.drain();
    assert_eq!(traces[0].response.body["compressed"], true);
    proxy.shutdown().await;
}

#[tokio::test]
async fn non_json_bodies_are_stored_as_quoted_strings() {
    let (proxy, addr) = start_proxy_against_stub().await;

    let response = reqwest::Client::new()
        .get(format!("http://{}/plain", addr))
        .send()
        .await
        .expect("request");
    assert_eq!(response.text().await.unwrap(), "not json at all");

    let traces = proxy.drain();
    assert_eq!(
        traces[0].response.body,
        Value::String("not json at all".to_string())
    );
    proxy.shutdown().await;
}

#[tokio::test]
async fn concurrent_requests_all_get_recorded() {
    let (proxy, addr) = start_proxy_against_stub().await;
    let client = reqwest::Client::new();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client
                .post(format!("http://{}/v1/chat/completions", addr))
                .json(&json!({"model": "gpt-4o"}))
                .send()
                .await
                .expect("request")
                .status()
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.expect("join"), 200);
    }

    assert_eq!(proxy.drain().len(), 8);
    proxy.shutdown().await;
}

#[tokio::test]
async fn shutdown_is_idempotent() {
    let (proxy, _addr) = start_proxy_against_stub().await;
    proxy.shutdown().await;
    proxy.shutdown().await;
}
