use crate::error::{Error, Result};
use crate::forward;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use regtrace_providers::{Provider, ProviderRegistry, TARGET_HEADER, extract_details};
use regtrace_types::{TraceRecord, TraceRequest, TraceResponse, sanitize_body};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Client-side timeout for each upstream forward
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(120);

/// Grace period for in-flight handlers during shutdown
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(Clone)]
struct ProxyState {
    registry: Arc<ProviderRegistry>,
    client: reqwest::Client,
    traces: Arc<Mutex<Vec<TraceRecord>>>,
}

/// The interception proxy.
///
/// Binds an ephemeral local port, forwards every request to the provider
/// selected by the `x-regtrace-target` header, and records one trace per
/// successfully forwarded call. Serving runs on a background task; handlers
/// run concurrently, one per connection.
pub struct Proxy {
    addr: SocketAddr,
    traces: Arc<Mutex<Vec<TraceRecord>>>,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Proxy {
    /// Bind `127.0.0.1:0` and start serving. Returns as soon as the socket
    /// is bound; the bound address is available via [`Proxy::addr`].
    pub async fn start(registry: ProviderRegistry) -> Result<Self> {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0))
            .await
            .map_err(Error::Bind)?;
        let addr = listener.local_addr().map_err(Error::Bind)?;

        let client = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .map_err(Error::Client)?;

        let traces = Arc::new(Mutex::new(Vec::new()));
        let state = ProxyState {
            registry: Arc::new(registry),
            client,
            traces: traces.clone(),
        };

        let app = Router::new().fallback(handle).with_state(state);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let serve = axum::serve(listener, app).with_graceful_shutdown(async {
                // Resolves on explicit shutdown or when the Proxy is dropped
                let _ = shutdown_rx.await;
            });
            if let Err(err) = serve.await {
                tracing::warn!(error = %err, "proxy server terminated with error");
            }
        });

        tracing::info!(%addr, "interception proxy listening");

        Ok(Self {
            addr,
            traces,
            shutdown: Mutex::new(Some(shutdown_tx)),
            task: Mutex::new(Some(task)),
        })
    }

    /// The bound local address, e.g. `127.0.0.1:49152`
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Snapshot all traces recorded so far. Safe to call while serving.
    pub fn drain(&self) -> Vec<TraceRecord> {
        self.traces
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Stop accepting connections and wait (bounded) for in-flight
    /// handlers. Idempotent: repeated calls return immediately.
    pub async fn shutdown(&self) {
        let sender = self
            .shutdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(sender) = sender else {
            return;
        };
        let _ = sender.send(());

        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task
            && tokio::time::timeout(SHUTDOWN_GRACE, task).await.is_err()
        {
            tracing::warn!("proxy did not drain in-flight requests within grace period");
        }
    }
}

async fn handle(State(state): State<ProxyState>, request: Request) -> Response {
    let started = Instant::now();
    let (parts, body) = request.into_parts();

    let target = parts
        .headers
        .get(TARGET_HEADER)
        .and_then(|value| value.to_str().ok());
    let Some((provider, base_url)) = state.registry.resolve(target) else {
        tracing::warn!(target = ?target, "rejecting request for unknown provider");
        return (StatusCode::BAD_GATEWAY, "Unknown provider").into_response();
    };

    let request_body = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            return (
                StatusCode::BAD_REQUEST,
                format!("Failed to read request body: {}", err),
            )
                .into_response();
        }
    };

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = format!("{}{}", base_url, path_and_query);

    let upstream_response = state
        .client
        .request(parts.method.clone(), &url)
        .headers(forward::upstream_headers(&parts.headers))
        .body(request_body.to_vec())
        .send()
        .await;

    // A failed forward is not capturable telemetry: 502, record nothing.
    let upstream_response = match upstream_response {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(provider = %provider, error = %err, "upstream request failed");
            return (StatusCode::BAD_GATEWAY, format!("Upstream error: {}", err)).into_response();
        }
    };

    let status = upstream_response.status();
    let upstream_headers = upstream_response.headers().clone();
    let raw_body = match upstream_response.bytes().await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(provider = %provider, error = %err, "failed reading upstream body");
            return (StatusCode::BAD_GATEWAY, format!("Upstream error: {}", err)).into_response();
        }
    };

    // The caller always receives an uncompressed body.
    let response_body = if forward::is_gzip(&upstream_headers) {
        forward::gunzip(&raw_body)
    } else {
        raw_body.to_vec()
    };

    let latency = started.elapsed();

    let trace = build_trace(
        provider,
        &parts,
        &request_body,
        status.as_u16(),
        &upstream_headers,
        &response_body,
        latency,
    );

    {
        // Lock scope covers only the append, never the network call.
        let mut traces = state
            .traces
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        traces.push(trace);
    }

    let mut response = Response::new(Body::from(response_body));
    *response.status_mut() = status;
    *response.headers_mut() = forward::caller_headers(&upstream_headers);
    response
}

fn build_trace(
    provider: Provider,
    parts: &axum::http::request::Parts,
    request_body: &[u8],
    status_code: u16,
    response_headers: &axum::http::HeaderMap,
    response_body: &[u8],
    latency: Duration,
) -> TraceRecord {
    let request_json = sanitize_body(request_body);
    let response_json = sanitize_body(response_body);

    let details = extract_details(provider, &request_json, &response_json);

    let path = parts.uri.path().to_string();

    TraceRecord {
        id: Uuid::new_v4(),
        timestamp: Utc::now(),
        provider: provider.name().to_string(),
        endpoint: path.clone(),
        model: details.model,
        request: TraceRequest {
            method: parts.method.to_string(),
            path,
            headers: forward::trace_headers(&parts.headers),
            body: request_json,
        },
        response: TraceResponse {
            status_code,
            headers: forward::trace_headers(response_headers),
            body: response_json,
        },
        latency_ms: latency.as_millis() as u64,
        tool_calls: details.tool_calls,
        tokens_in: details.tokens_in,
        tokens_out: details.tokens_out,
        metadata: HashMap::new(),
    }
}
