use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

// NOTE: Schema Design Goals
//
// 1. Fidelity: A trace stores the intercepted exchange verbatim (minus credentials).
//    Non-JSON bodies are kept as JSON strings so no byte of a payload is dropped.
// 2. Comparability: Sessions carry a derived summary that is always recomputed
//    from the trace list, never maintained incrementally, so two summaries of the
//    same traces are identical by construction.
// 3. Ordering: Traces are appended in request-completion order. Concurrent calls
//    can complete out of order, so consumers must not read the list as a
//    conversation timeline.

/// One intercepted LLM API call, immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Unique record ID within the session
    pub id: Uuid,

    /// Capture timestamp (UTC, at request completion)
    pub timestamp: DateTime<Utc>,

    /// Logical provider name ("openai", "anthropic", "custom")
    pub provider: String,

    /// Endpoint path on the provider (e.g. "/v1/chat/completions")
    pub endpoint: String,

    /// Model name extracted from the request body, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    pub request: TraceRequest,
    pub response: TraceResponse,

    /// Round-trip latency in milliseconds
    pub latency_ms: u64,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallRecord>,

    #[serde(default)]
    pub tokens_in: u64,

    #[serde(default)]
    pub tokens_out: u64,

    /// Free-form annotations attached at capture time
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, String>,
}

/// Request half of an intercepted exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceRequest {
    pub method: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub body: Value,
}

/// Response half of an intercepted exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceResponse {
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub body: Value,
}

/// A tool invocation extracted from a provider response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub arguments: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
}

/// All traces captured across one monitored process lifetime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceSession {
    pub id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    /// The command line that was monitored, as invoked
    pub command: String,

    pub traces: Vec<TraceRecord>,
    pub summary: TraceSummary,
}

/// Aggregates derived from a trace list. Always recomputed in full.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceSummary {
    pub total_calls: usize,
    pub total_tokens_in: u64,
    pub total_tokens_out: u64,
    pub total_latency_ms: u64,
    #[serde(default)]
    pub by_provider: HashMap<String, usize>,
    #[serde(default)]
    pub by_model: HashMap<String, usize>,
    #[serde(default)]
    pub tools_called: Vec<String>,
}

/// Token counts and tool calls extracted from one provider exchange.
///
/// Extraction is total: malformed or unexpected shapes produce the
/// `Default` value, never an error.
#[derive(Debug, Clone, Default)]
pub struct ExchangeDetails {
    pub model: Option<String>,
    pub tokens_in: u64,
    pub tokens_out: u64,
    pub tool_calls: Vec<ToolCallRecord>,
}
