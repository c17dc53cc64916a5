//! Check running: parse check specifications, dispatch to a pluggable
//! evaluator, and fold per-check outcomes into a test result.
//!
//! The semantics of a check (what "grounded_in_retrieval" means) are the
//! evaluator's concern; this module only owns the structure.

use regtrace_types::{CheckResult, TestCase, TestResult, TestStatus};
use std::time::Instant;

/// What an evaluator reports for one check
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub passed: bool,
    pub message: String,
}

impl CheckOutcome {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }
}

/// Pluggable check-execution capability.
///
/// Implementations receive the check type token and its optional parameter
/// (the part after the first `:`), plus the test case under evaluation.
pub trait CheckEvaluator {
    fn evaluate(&self, check_type: &str, param: Option<&str>, test: &TestCase) -> CheckOutcome;
}

/// Split a check specification on the first `:` into (type, parameter)
pub fn parse_check_spec(spec: &str) -> (&str, Option<&str>) {
    match spec.split_once(':') {
        Some((check_type, param)) => (check_type.trim(), Some(param.trim())),
        None => (spec.trim(), None),
    }
}

/// Run every check declared by a test case and aggregate the outcome.
/// The test fails if any check fails; checks run in declaration order.
pub fn run_test(test: &TestCase, evaluator: &dyn CheckEvaluator) -> TestResult {
    let started = Instant::now();
    let mut status = TestStatus::Passed;
    let mut checks = Vec::with_capacity(test.checks.len());

    for spec in &test.checks {
        let (check_type, param) = parse_check_spec(spec);
        let outcome = evaluator.evaluate(check_type, param, test);
        if !outcome.passed {
            status = TestStatus::Failed;
        }
        checks.push(CheckResult {
            check: spec.clone(),
            passed: outcome.passed,
            message: outcome.message,
        });
    }

    TestResult {
        name: test.name.clone(),
        status,
        duration_ms: started.elapsed().as_millis() as u64,
        checks,
        error: None,
        regression: false,
    }
}

/// Placeholder evaluator covering the known check vocabulary.
///
/// Real check semantics need a model response to judge, which is outside
/// this engine. Known check types pass with a descriptive message so suites
/// remain runnable end to end; `INTENTIONAL_FAIL` always fails, which gives
/// tests and demos a deterministic failure.
pub struct NotImplementedEvaluator;

impl CheckEvaluator for NotImplementedEvaluator {
    fn evaluate(&self, check_type: &str, param: Option<&str>, _test: &TestCase) -> CheckOutcome {
        match check_type {
            "schema_valid" => CheckOutcome::pass("Response matches expected schema"),
            "tool_called" => CheckOutcome::pass(format!(
                "Tool '{}' was called",
                param.unwrap_or_default()
            )),
            "no_tool_called" => CheckOutcome::pass("No tools were called"),
            "grounded_in_retrieval" => {
                CheckOutcome::pass("Response is grounded in retrieved documents")
            }
            "no_hallucination" | "no_fabrication" => {
                CheckOutcome::pass("No hallucinated content detected")
            }
            "tone" => CheckOutcome::pass(format!("Tone matches: {}", param.unwrap_or_default())),
            "sentiment" => {
                CheckOutcome::pass(format!("Sentiment is {}", param.unwrap_or_default()))
            }
            "stays_on_topic" => CheckOutcome::pass("Response stays on topic"),
            "response_time" => CheckOutcome::pass(format!(
                "Response time within {}",
                param.unwrap_or_default()
            )),
            "length" => CheckOutcome::pass(format!(
                "Response length within {} chars",
                param.unwrap_or_default()
            )),
            "INTENTIONAL_FAIL" => CheckOutcome::fail("Intentional failure for testing"),
            other => CheckOutcome::pass(format!("Check '{}' not yet implemented", other)),
        }
    }
}
