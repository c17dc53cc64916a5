//! Structural diffing of a current run against a persisted baseline.
//!
//! Both flavors are pure functions over two snapshots. They classify change;
//! deciding whether a change is fatal is the caller's job (CI mode).

use regtrace_types::{
    BaselineComparison, EvalResult, ModelChange, TestResult, TestStatus, TraceComparison,
    TraceSummary,
};
use std::collections::{BTreeMap, BTreeSet};

/// Diff two eval runs keyed by test name.
///
/// Duplicate names within one run are a caller error; indexing is
/// last-write-wins. Name lists in the output are sorted for stable output
/// and stable tests.
pub fn compare_eval_results(baseline: &EvalResult, current: &EvalResult) -> BaselineComparison {
    let baseline_by_name: BTreeMap<&str, &TestResult> = baseline
        .test_results
        .iter()
        .map(|result| (result.name.as_str(), result))
        .collect();
    let current_by_name: BTreeMap<&str, &TestResult> = current
        .test_results
        .iter()
        .map(|result| (result.name.as_str(), result))
        .collect();

    let mut comparison = BaselineComparison {
        baseline_date: baseline.timestamp,
        new_failures: Vec::new(),
        new_passes: Vec::new(),
        removed_tests: Vec::new(),
        added_tests: Vec::new(),
    };

    for (name, current_result) in &current_by_name {
        match baseline_by_name.get(name) {
            Some(baseline_result) => {
                match (baseline_result.status, current_result.status) {
                    (TestStatus::Passed, TestStatus::Failed) => {
                        comparison.new_failures.push(name.to_string());
                    }
                    (TestStatus::Failed, TestStatus::Passed) => {
                        comparison.new_passes.push(name.to_string());
                    }
                    // Equal statuses, or transitions involving Error, are
                    // not behavioral change.
                    _ => {}
                }
            }
            None => comparison.added_tests.push(name.to_string()),
        }
    }

    for name in baseline_by_name.keys() {
        if !current_by_name.contains_key(name) {
            comparison.removed_tests.push(name.to_string());
        }
    }

    tracing::debug!(
        regressions = comparison.new_failures.len(),
        new_passes = comparison.new_passes.len(),
        added = comparison.added_tests.len(),
        removed = comparison.removed_tests.len(),
        "compared eval results against baseline"
    );

    comparison
}

/// Mark regressed results and set the regression count on a fresh run.
pub fn apply_comparison(current: &mut EvalResult, comparison: BaselineComparison) {
    for result in &mut current.test_results {
        result.regression = comparison.new_failures.contains(&result.name);
    }
    current.regressions = comparison.new_failures.len();
    current.comparison = Some(comparison);
}

/// Diff two trace summaries: call counts, tool sets, per-model usage, and
/// aggregate token delta. Every nonzero difference is reported; there is no
/// tolerance band.
pub fn compare_trace_summaries(baseline: &TraceSummary, current: &TraceSummary) -> TraceComparison {
    let baseline_tools: BTreeSet<&str> =
        baseline.tools_called.iter().map(String::as_str).collect();
    let current_tools: BTreeSet<&str> = current.tools_called.iter().map(String::as_str).collect();

    let mut model_changes = Vec::new();
    let current_models: BTreeMap<&str, usize> = current
        .by_model
        .iter()
        .map(|(model, count)| (model.as_str(), *count))
        .collect();
    for (model, count) in current_models {
        match baseline.by_model.get(model) {
            None => model_changes.push(ModelChange::New {
                model: model.to_string(),
                count,
            }),
            Some(&baseline_count) if baseline_count != count => {
                model_changes.push(ModelChange::CountChanged {
                    model: model.to_string(),
                    baseline: baseline_count,
                    current: count,
                });
            }
            Some(_) => {}
        }
    }

    let baseline_tokens = (baseline.total_tokens_in + baseline.total_tokens_out) as i64;
    let current_tokens = (current.total_tokens_in + current.total_tokens_out) as i64;

    TraceComparison {
        baseline_calls: baseline.total_calls,
        current_calls: current.total_calls,
        new_tools: current_tools
            .difference(&baseline_tools)
            .map(|tool| tool.to_string())
            .collect(),
        removed_tools: baseline_tools
            .difference(&current_tools)
            .map(|tool| tool.to_string())
            .collect(),
        model_changes,
        token_delta: current_tokens - baseline_tokens,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use regtrace_types::DeltaDirection;
    use std::collections::HashMap;

    fn test_result(name: &str, status: TestStatus) -> TestResult {
        TestResult {
            name: name.to_string(),
            status,
            duration_ms: 1,
            checks: vec![],
            error: None,
            regression: false,
        }
    }

    fn eval_result(results: Vec<TestResult>) -> EvalResult {
        EvalResult {
            timestamp: Utc::now(),
            test_suite: "suite".to_string(),
            total_tests: results.len(),
            test_results: results,
            ..Default::default()
        }
    }

    #[test]
    fn classifies_regressions_new_passes_added_removed() {
        let baseline = eval_result(vec![
            test_result("a", TestStatus::Passed),
            test_result("b", TestStatus::Passed),
            test_result("d", TestStatus::Failed),
            test_result("e", TestStatus::Passed),
        ]);
        let current = eval_result(vec![
            test_result("a", TestStatus::Passed),
            test_result("b", TestStatus::Failed),
            test_result("c", TestStatus::Passed),
            test_result("d", TestStatus::Passed),
        ]);

        let comparison = compare_eval_results(&baseline, &current);
        assert_eq!(comparison.new_failures, vec!["b"]);
        assert_eq!(comparison.new_passes, vec!["d"]);
        assert_eq!(comparison.added_tests, vec!["c"]);
        assert_eq!(comparison.removed_tests, vec!["e"]);
    }

    #[test]
    fn single_regression_with_added_test() {
        // baseline {A: passed, B: passed}, current {A: passed, B: failed, C: passed}
        let baseline = eval_result(vec![
            test_result("A", TestStatus::Passed),
            test_result("B", TestStatus::Passed),
        ]);
        let current = eval_result(vec![
            test_result("A", TestStatus::Passed),
            test_result("B", TestStatus::Failed),
            test_result("C", TestStatus::Passed),
        ]);

        let comparison = compare_eval_results(&baseline, &current);
        assert_eq!(comparison.new_failures, vec!["B"]);
        assert!(comparison.new_passes.is_empty());
        assert_eq!(comparison.added_tests, vec!["C"]);
        assert!(comparison.removed_tests.is_empty());
    }

    #[test]
    fn comparing_run_against_itself_is_empty() {
        let run = eval_result(vec![
            test_result("a", TestStatus::Passed),
            test_result("b", TestStatus::Failed),
        ]);
        let comparison = compare_eval_results(&run, &run);
        assert!(comparison.new_failures.is_empty());
        assert!(comparison.new_passes.is_empty());
        assert!(comparison.added_tests.is_empty());
        assert!(comparison.removed_tests.is_empty());
    }

    #[test]
    fn error_status_is_not_a_regression() {
        let baseline = eval_result(vec![test_result("a", TestStatus::Passed)]);
        let current = eval_result(vec![test_result("a", TestStatus::Error)]);
        let comparison = compare_eval_results(&baseline, &current);
        assert!(comparison.new_failures.is_empty());
    }

    #[test]
    fn apply_comparison_sets_flags_and_count() {
        let baseline = eval_result(vec![test_result("a", TestStatus::Passed)]);
        let mut current = eval_result(vec![test_result("a", TestStatus::Failed)]);
        let comparison = compare_eval_results(&baseline, &current);
        apply_comparison(&mut current, comparison);
        assert_eq!(current.regressions, 1);
        assert!(current.test_results[0].regression);
    }

    fn summary(
        calls: usize,
        tokens: (u64, u64),
        models: &[(&str, usize)],
        tools: &[&str],
    ) -> TraceSummary {
        TraceSummary {
            total_calls: calls,
            total_tokens_in: tokens.0,
            total_tokens_out: tokens.1,
            total_latency_ms: 0,
            by_provider: HashMap::new(),
            by_model: models
                .iter()
                .map(|(model, count)| (model.to_string(), *count))
                .collect(),
            tools_called: tools.iter().map(|tool| tool.to_string()).collect(),
        }
    }

    #[test]
    fn trace_comparison_reports_all_deltas() {
        let baseline = summary(3, (100, 50), &[("gpt-4o", 3)], &["get_weather"]);
        let current = summary(
            4,
            (120, 60),
            &[("gpt-4o", 2), ("claude-sonnet", 2)],
            &["process_refund"],
        );

        let comparison = compare_trace_summaries(&baseline, &current);
        assert!(comparison.call_count_changed());
        assert_eq!(comparison.new_tools, vec!["process_refund"]);
        assert_eq!(comparison.removed_tools, vec!["get_weather"]);
        assert_eq!(comparison.token_delta, 30);
        assert_eq!(comparison.token_direction(), Some(DeltaDirection::Increased));
        assert_eq!(
            comparison.model_changes,
            vec![
                ModelChange::New {
                    model: "claude-sonnet".to_string(),
                    count: 2
                },
                ModelChange::CountChanged {
                    model: "gpt-4o".to_string(),
                    baseline: 3,
                    current: 2
                },
            ]
        );
    }

    #[test]
    fn identical_summaries_are_unchanged() {
        let summary = summary(2, (10, 5), &[("gpt-4o", 2)], &["get_weather"]);
        let comparison = compare_trace_summaries(&summary, &summary);
        assert!(comparison.is_unchanged());
        assert_eq!(comparison.token_direction(), None);
    }

    #[test]
    fn token_decrease_is_signed() {
        let baseline = summary(1, (100, 100), &[], &[]);
        let current = summary(1, (40, 40), &[], &[]);
        let comparison = compare_trace_summaries(&baseline, &current);
        assert_eq!(comparison.token_delta, -120);
        assert_eq!(comparison.token_direction(), Some(DeltaDirection::Decreased));
    }
}
