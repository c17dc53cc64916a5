pub mod checks;
pub mod compare;
pub mod summary;

pub use checks::{CheckEvaluator, CheckOutcome, NotImplementedEvaluator, run_test};
pub use compare::{apply_comparison, compare_eval_results, compare_trace_summaries};
pub use summary::summarize;
