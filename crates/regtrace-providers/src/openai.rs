//! Chat-completions response parsing for the OpenAI API shape.
//!
//! Token counts live under `usage.prompt_tokens` / `usage.completion_tokens`;
//! tool calls under `choices[0].message.tool_calls[]`, with arguments carried
//! as a JSON-encoded string inside `function.arguments`.

use crate::extract::{string_field, usage_count};
use regtrace_types::{ExchangeDetails, ToolCallRecord};
use serde_json::Value;

pub fn parse_response(body: &Value) -> ExchangeDetails {
    ExchangeDetails {
        model: None,
        tokens_in: usage_count(body, "prompt_tokens"),
        tokens_out: usage_count(body, "completion_tokens"),
        tool_calls: parse_tool_calls(body),
    }
}

fn parse_tool_calls(body: &Value) -> Vec<ToolCallRecord> {
    let Some(calls) = body
        .get("choices")
        .and_then(Value::as_array)
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("tool_calls"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    calls
        .iter()
        .map(|call| {
            let function = call.get("function");
            ToolCallRecord {
                id: string_field(call, "id"),
                name: function.map(|f| string_field(f, "name")).unwrap_or_default(),
                arguments: parse_arguments(function),
                response: None,
            }
        })
        .collect()
}

/// `function.arguments` is a string containing JSON; decode it when possible,
/// keep the raw string otherwise.
fn parse_arguments(function: Option<&Value>) -> Value {
    let Some(args) = function.and_then(|f| f.get("arguments")) else {
        return Value::Null;
    };
    match args {
        Value::String(raw) => serde_json::from_str(raw).unwrap_or_else(|_| args.clone()),
        other => other.clone(),
    }
}
