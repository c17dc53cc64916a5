use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A collection of test cases loaded from `evals/tests.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuite {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tests: Vec<TestCase>,
}

/// A single named test: a prompt plus the checks applied to its output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,

    /// Inline prompt text or a path to a prompt file
    pub prompt: String,

    /// Check specifications, each a type token optionally followed by
    /// `:` and a parameter (e.g. `tool_called:refund.create`)
    #[serde(default)]
    pub checks: Vec<String>,
}

/// Terminal status of one test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    Failed,
    Error,
}

/// Outcome of running one test case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub status: TestStatus,
    pub duration_ms: u64,
    #[serde(default)]
    pub checks: Vec<CheckResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Set only by the comparison engine, never by the check runner
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub regression: bool,
}

/// Outcome of one check within a test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// The original check specification string
    pub check: String,
    pub passed: bool,
    #[serde(default)]
    pub message: String,
}

/// Persisted result of one eval run (`.regtrace/results.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalResult {
    pub timestamp: DateTime<Utc>,
    pub test_suite: String,
    pub total_tests: usize,
    pub passed: usize,
    pub failed: usize,
    pub regressions: usize,
    pub test_results: Vec<TestResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<BaselineComparison>,
}

/// Classification of change between a current eval run and its baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineComparison {
    pub baseline_date: DateTime<Utc>,

    /// Tests that passed in the baseline and fail now (the regressions)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub new_failures: Vec<String>,

    /// Tests that failed in the baseline and pass now
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub new_passes: Vec<String>,

    /// Tests present in the baseline but absent from the current run
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed_tests: Vec<String>,

    /// Tests present now but absent from the baseline
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub added_tests: Vec<String>,
}

impl Default for EvalResult {
    fn default() -> Self {
        Self {
            timestamp: Utc::now(),
            test_suite: String::new(),
            total_tests: 0,
            passed: 0,
            failed: 0,
            regressions: 0,
            test_results: Vec::new(),
            comparison: None,
        }
    }
}

/// Direction of an aggregate counter change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaDirection {
    Increased,
    Decreased,
}

impl DeltaDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeltaDirection::Increased => "increased",
            DeltaDirection::Decreased => "decreased",
        }
    }
}

/// A model whose usage differs from the baseline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelChange {
    /// Model appears in the current run but not in the baseline
    New { model: String, count: usize },
    /// Model appears in both, with a different call count
    CountChanged {
        model: String,
        baseline: usize,
        current: usize,
    },
}

/// Classification of change between a current trace session and its baseline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraceComparison {
    pub baseline_calls: usize,
    pub current_calls: usize,

    /// Tools invoked now but not in the baseline
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub new_tools: Vec<String>,

    /// Tools invoked in the baseline but not now
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub removed_tools: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub model_changes: Vec<ModelChange>,

    /// Signed change in total (input + output) tokens
    pub token_delta: i64,
}

impl TraceComparison {
    pub fn call_count_changed(&self) -> bool {
        self.baseline_calls != self.current_calls
    }

    pub fn token_direction(&self) -> Option<DeltaDirection> {
        match self.token_delta {
            0 => None,
            d if d > 0 => Some(DeltaDirection::Increased),
            _ => Some(DeltaDirection::Decreased),
        }
    }

    /// True when nothing differs from the baseline
    pub fn is_unchanged(&self) -> bool {
        !self.call_count_changed()
            && self.new_tools.is_empty()
            && self.removed_tools.is_empty()
            && self.model_changes.is_empty()
            && self.token_delta == 0
    }
}
