use crate::registry::Provider;
use crate::{anthropic, openai};
use regtrace_types::ExchangeDetails;
use serde_json::Value;

/// Extract model, token counts, and tool calls from one proxied exchange.
///
/// Total over all inputs: an unknown provider or a body of any unexpected
/// shape yields zero values rather than an error. The model name lives in
/// the request body (`model` field) for every known provider; the rest is
/// provider-specific and lives in the response.
pub fn extract_details(provider: Provider, request: &Value, response: &Value) -> ExchangeDetails {
    let mut details = match provider {
        Provider::OpenAi => openai::parse_response(response),
        Provider::Anthropic => anthropic::parse_response(response),
        Provider::Custom => ExchangeDetails::default(),
    };

    details.model = request
        .get("model")
        .and_then(Value::as_str)
        .map(str::to_string);

    details
}

/// Read a u64 out of `body.usage.<key>`, defaulting to 0
pub(crate) fn usage_count(body: &Value, key: &str) -> u64 {
    body.get("usage")
        .and_then(|usage| usage.get(key))
        .and_then(Value::as_u64)
        .unwrap_or(0)
}

pub(crate) fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn openai_usage_is_extracted() {
        let request = json!({"model": "gpt-4o"});
        let response = json!({"usage": {"prompt_tokens": 10, "completion_tokens": 5}});
        let details = extract_details(Provider::OpenAi, &request, &response);
        assert_eq!(details.model.as_deref(), Some("gpt-4o"));
        assert_eq!(details.tokens_in, 10);
        assert_eq!(details.tokens_out, 5);
        assert!(details.tool_calls.is_empty());
    }

    #[test]
    fn custom_provider_yields_defaults_plus_model() {
        let request = json!({"model": "llama3"});
        let response = json!({"anything": true});
        let details = extract_details(Provider::Custom, &request, &response);
        assert_eq!(details.model.as_deref(), Some("llama3"));
        assert_eq!(details.tokens_in, 0);
        assert_eq!(details.tokens_out, 0);
    }

    #[test]
    fn malformed_bodies_never_fail() {
        let details = extract_details(Provider::OpenAi, &json!("not an object"), &json!(42));
        assert!(details.model.is_none());
        assert_eq!(details.tokens_in, 0);
        assert!(details.tool_calls.is_empty());
    }
}
