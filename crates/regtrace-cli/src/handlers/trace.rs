use crate::output;
use anyhow::{Context, Result};
use regtrace_engine::compare_trace_summaries;
use regtrace_runtime::{Config, TraceStore, run_traced, run_untraced};
use std::path::{Path, PathBuf};

pub fn handle(
    config_path: &Path,
    command: &[String],
    save_baseline: bool,
    output_file: Option<String>,
    no_proxy: bool,
) -> Result<i32> {
    let config = Config::load_or_default(config_path);
    let store = TraceStore::new(Path::new("."));

    output::print_trace_header(command);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let outcome = if no_proxy {
        runtime.block_on(run_untraced(command))?
    } else {
        runtime.block_on(run_traced(command, config.registry()))?
    };

    output::print_session_summary(&outcome.session);

    let session_path = output_file
        .map(PathBuf::from)
        .unwrap_or_else(|| store.session_path(&outcome.session));
    store
        .save_session(&outcome.session, &session_path)
        .with_context(|| format!("failed to write {}", session_path.display()))?;
    output::print_saved(&session_path, "Traces");

    if save_baseline {
        let baseline_path = store.save_session_as_baseline(&outcome.session)?;
        output::print_saved(&baseline_path, "Baseline");
    } else if let Some(baseline) = store.load_baseline_session(&store.baseline_path()) {
        let comparison = compare_trace_summaries(&baseline.summary, &outcome.session.summary);
        output::print_trace_comparison(&comparison);
    }

    Ok(outcome.exit_code)
}
