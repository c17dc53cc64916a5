use crate::args::RunFormat;
use crate::output;
use anyhow::Result;
use chrono::Utc;
use regtrace_engine::{NotImplementedEvaluator, apply_comparison, compare_eval_results, run_test};
use regtrace_runtime::{Config, TraceStore, load_suite};
use regtrace_types::{EvalResult, TestStatus};
use std::path::{Path, PathBuf};

pub fn handle(
    config_path: &Path,
    tests: Option<String>,
    baseline: Option<String>,
    ci: bool,
    format: RunFormat,
) -> Result<i32> {
    let config = Config::load_or_default(config_path);
    let store = TraceStore::new(Path::new("."));

    let suite_path = tests
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(&config.evals.path).join("tests.toml"));

    let suite = match load_suite(&suite_path) {
        Ok(suite) => suite,
        Err(err) => {
            output::print_suite_error(&err, format);
            return Ok(1);
        }
    };

    if format == RunFormat::Text {
        output::print_run_header(&suite);
    }

    let mut result = EvalResult {
        timestamp: Utc::now(),
        test_suite: suite.name.clone(),
        total_tests: suite.tests.len(),
        ..Default::default()
    };

    for test in &suite.tests {
        let test_result = run_test(test, &NotImplementedEvaluator);
        if format == RunFormat::Text {
            output::print_test_line(&test_result);
        }
        match test_result.status {
            TestStatus::Passed => result.passed += 1,
            TestStatus::Failed | TestStatus::Error => result.failed += 1,
        }
        result.test_results.push(test_result);
    }

    // The prior run's results are the eval baseline; a trace baseline has a
    // different shape and is compared by `trace`, not here.
    let baseline_path = baseline.map(PathBuf::from).unwrap_or_else(|| store.results_path());
    if let Some(baseline_eval) = store.load_baseline_eval(&baseline_path) {
        let comparison = compare_eval_results(&baseline_eval, &result);
        apply_comparison(&mut result, comparison);
    }

    if ci {
        store.save_results(&result)?;
    }

    match format {
        RunFormat::Text => output::print_eval_text(&result),
        RunFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        RunFormat::Github => output::print_eval_github(&result),
    }

    if ci && (result.failed > 0 || result.regressions > 0) {
        Ok(1)
    } else {
        Ok(0)
    }
}
