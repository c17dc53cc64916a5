use regtrace_types::{TraceRecord, TraceSummary};
use std::collections::BTreeSet;

/// Compute a session summary in one full pass over the trace list.
///
/// Summaries are always rebuilt from scratch, never incrementally updated,
/// so they cannot drift from the traces they describe.
pub fn summarize(traces: &[TraceRecord]) -> TraceSummary {
    let mut summary = TraceSummary {
        total_calls: traces.len(),
        ..Default::default()
    };

    let mut tools = BTreeSet::new();

    for trace in traces {
        summary.total_tokens_in += trace.tokens_in;
        summary.total_tokens_out += trace.tokens_out;
        summary.total_latency_ms += trace.latency_ms;
        *summary.by_provider.entry(trace.provider.clone()).or_insert(0) += 1;
        if let Some(model) = &trace.model {
            *summary.by_model.entry(model.clone()).or_insert(0) += 1;
        }
        for call in &trace.tool_calls {
            tools.insert(call.name.clone());
        }
    }

    summary.tools_called = tools.into_iter().collect();
    summary
}
