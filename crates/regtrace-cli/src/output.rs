//! Console rendering for trace sessions and eval results.

use crate::args::RunFormat;
use owo_colors::OwoColorize;
use regtrace_types::{
    EvalResult, ModelChange, TestResult, TestStatus, TestSuite, TraceComparison, TraceSession,
};
use std::path::Path;

pub fn print_trace_header(command: &[String]) {
    println!();
    println!("{}", "Regtrace".bold());
    println!("{}", "Capturing LLM API calls...".dimmed());
    println!();
    println!("{} Running: {}", "→".dimmed(), command.join(" "));
    println!("{}", "─".repeat(50));
}

pub fn print_session_summary(session: &TraceSession) {
    let summary = &session.summary;
    let elapsed = session
        .end_time
        .signed_duration_since(session.start_time)
        .num_milliseconds();

    println!("{}", "─".repeat(50));
    println!();
    println!(
        "{} Captured {} LLM calls in {}ms",
        "✓".green(),
        summary.total_calls,
        elapsed
    );

    if summary.total_calls == 0 {
        println!("{}", "  No LLM API calls detected".dimmed());
        return;
    }

    println!();
    println!("  Summary:");

    if !summary.by_provider.is_empty() {
        let mut parts: Vec<String> = summary
            .by_provider
            .iter()
            .map(|(provider, count)| format!("{} ({})", provider, count))
            .collect();
        parts.sort();
        println!("    Providers: {}", parts.join(", "));
    }

    if !summary.by_model.is_empty() {
        let mut parts: Vec<String> = summary
            .by_model
            .iter()
            .map(|(model, count)| format!("{} ({})", model, count))
            .collect();
        parts.sort();
        println!("    Models: {}", parts.join(", "));
    }

    if summary.total_tokens_in > 0 || summary.total_tokens_out > 0 {
        println!(
            "    Tokens: {} in / {} out",
            summary.total_tokens_in, summary.total_tokens_out
        );
    }

    println!("    Total latency: {}ms", summary.total_latency_ms);

    if !summary.tools_called.is_empty() {
        println!("    Tools called: {}", summary.tools_called.join(", "));
    }
}

pub fn print_saved(path: &Path, label: &str) {
    println!("{} {} saved to {}", "✓".green(), label, path.display());
}

pub fn print_trace_comparison(comparison: &TraceComparison) {
    println!();
    println!("  Comparison with baseline:");

    if comparison.call_count_changed() {
        println!(
            "    {} Call count changed: {} → {}",
            "⚠".yellow(),
            comparison.baseline_calls,
            comparison.current_calls
        );
    } else {
        println!(
            "    {} Call count unchanged: {}",
            "✓".green(),
            comparison.current_calls
        );
    }

    for tool in &comparison.new_tools {
        println!("    {} New tool called: {}", "⚠".yellow(), tool);
    }
    for tool in &comparison.removed_tools {
        println!("    {} Tool no longer called: {}", "⚠".yellow(), tool);
    }

    for change in &comparison.model_changes {
        match change {
            ModelChange::New { model, .. } => {
                println!("    {} New model used: {}", "⚠".yellow(), model);
            }
            ModelChange::CountChanged {
                model,
                baseline,
                current,
            } => {
                println!(
                    "    {} Model {} usage changed: {} → {}",
                    "⚠".yellow(),
                    model,
                    baseline,
                    current
                );
            }
        }
    }

    if let Some(direction) = comparison.token_direction() {
        println!(
            "    {} Token usage {} by {}",
            "⚠".yellow(),
            direction.as_str(),
            comparison.token_delta.abs()
        );
    }
}

pub fn print_suite_error(err: &regtrace_runtime::Error, format: RunFormat) {
    if format == RunFormat::Json {
        println!(
            "{}",
            serde_json::json!({ "error": err.to_string() })
        );
    } else {
        eprintln!("{} Failed to load test suite: {}", "✗".red(), err);
    }
}

pub fn print_run_header(suite: &TestSuite) {
    println!();
    println!("{}", "Regtrace Eval Runner".bold());
    println!("{}", "Running AI agent evaluations...".dimmed());
    println!();
    println!("Test suite: {}", suite.name);
    println!("Tests: {}", suite.tests.len());
    println!();
}

pub fn print_test_line(result: &TestResult) {
    match result.status {
        TestStatus::Passed => {
            println!("  {} {}", "✓".green(), result.name);
        }
        TestStatus::Failed | TestStatus::Error => {
            println!("  {} {}", "✗".red(), result.name);
            for check in &result.checks {
                if !check.passed {
                    println!("      {}: {}", check.check, check.message);
                }
            }
        }
    }
}

pub fn print_eval_text(result: &EvalResult) {
    println!();
    println!("{}", "─".repeat(50));
    println!();

    let pass_rate = if result.total_tests > 0 {
        result.passed as f64 / result.total_tests as f64 * 100.0
    } else {
        0.0
    };
    println!(
        "Results: {}/{} tests passed ({:.1}%)",
        result.passed, result.total_tests, pass_rate
    );

    if result.failed > 0 {
        println!("{} {} test(s) failed", "✗".red(), result.failed);
    }

    if let Some(comparison) = &result.comparison {
        println!();
        println!("Baseline comparison:");

        if !comparison.new_failures.is_empty() {
            println!(
                "  {} {} regression(s):",
                "✗".red(),
                comparison.new_failures.len()
            );
            for name in &comparison.new_failures {
                println!("    - {} (was passing)", name);
            }
        }

        if !comparison.new_passes.is_empty() {
            println!(
                "  {} {} new pass(es):",
                "✓".green(),
                comparison.new_passes.len()
            );
            for name in &comparison.new_passes {
                println!("    - {} (was failing)", name);
            }
        }

        if !comparison.added_tests.is_empty() {
            println!("  {} {} new test(s)", "○".dimmed(), comparison.added_tests.len());
        }

        if !comparison.removed_tests.is_empty() {
            println!(
                "  {} {} removed test(s)",
                "⚠".yellow(),
                comparison.removed_tests.len()
            );
        }

        if comparison.new_failures.is_empty() && comparison.new_passes.is_empty() {
            println!("  {} No behavioral changes detected", "✓".green());
        }
    }

    println!();
}

/// GitHub Actions workflow commands.
/// https://docs.github.com/en/actions/using-workflows/workflow-commands-for-github-actions
pub fn print_eval_github(result: &EvalResult) {
    println!("::group::Test Results");
    for test_result in &result.test_results {
        match test_result.status {
            TestStatus::Passed => println!("✓ {}", test_result.name),
            TestStatus::Failed | TestStatus::Error => {
                println!("✗ {}", test_result.name);
                for check in &test_result.checks {
                    if !check.passed {
                        println!("  - {}: {}", check.check, check.message);
                    }
                }
            }
        }
    }
    println!("::endgroup::");

    if let Some(comparison) = &result.comparison
        && !comparison.new_failures.is_empty()
    {
        println!("::group::Regressions Detected");
        for name in &comparison.new_failures {
            println!(
                "::error title=Regression::{} failed (was passing in baseline)",
                name
            );
        }
        println!("::endgroup::");
    }

    if result.regressions > 0 {
        println!(
            "::error::{} regression(s) detected. {}/{} tests passed.",
            result.regressions, result.passed, result.total_tests
        );
    } else if result.failed > 0 {
        println!(
            "::warning::{} test(s) failed. {}/{} tests passed.",
            result.failed, result.passed, result.total_tests
        );
    } else {
        println!("::notice::All {} tests passed.", result.total_tests);
    }
}
