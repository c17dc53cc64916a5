//! Messages-API response parsing for the Anthropic API shape.
//!
//! Token counts live under `usage.input_tokens` / `usage.output_tokens`;
//! tool calls are `content[]` blocks with `type == "tool_use"` carrying
//! `name` and a structured `input` object.

use crate::extract::{string_field, usage_count};
use regtrace_types::{ExchangeDetails, ToolCallRecord};
use serde_json::Value;

pub fn parse_response(body: &Value) -> ExchangeDetails {
    ExchangeDetails {
        model: None,
        tokens_in: usage_count(body, "input_tokens"),
        tokens_out: usage_count(body, "output_tokens"),
        tool_calls: parse_tool_calls(body),
    }
}

fn parse_tool_calls(body: &Value) -> Vec<ToolCallRecord> {
    let Some(blocks) = body.get("content").and_then(Value::as_array) else {
        return Vec::new();
    };

    blocks
        .iter()
        .filter(|block| block.get("type").and_then(Value::as_str) == Some("tool_use"))
        .map(|block| ToolCallRecord {
            id: string_field(block, "id"),
            name: string_field(block, "name"),
            arguments: block.get("input").cloned().unwrap_or(Value::Null),
            response: None,
        })
        .collect()
}
