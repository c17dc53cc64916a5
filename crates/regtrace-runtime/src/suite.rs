use crate::{Error, Result};
use regtrace_types::TestSuite;
use std::path::Path;

/// Load a test suite from `evals/tests.toml` (or an explicit path).
///
/// Unlike config loading, a broken suite is a hard error: there is nothing
/// sensible to run without it.
pub fn load_suite(path: &Path) -> Result<TestSuite> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| Error::Suite(format!("could not read {}: {}", path.display(), err)))?;
    toml::from_str(&content)
        .map_err(|err| Error::Suite(format!("could not parse {}: {}", path.display(), err)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUITE: &str = r#"
name = "customer-support"
description = "Refund agent behavior"

[[tests]]
name = "refund request"
prompt = "My order arrived broken, I want a refund."
checks = ["tool_called:process_refund", "tone:empathetic"]

[[tests]]
name = "weather smalltalk"
prompt = "What's the weather in Lisbon?"
checks = ["tool_called:get_weather"]
"#;

    #[test]
    fn parses_suite_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tests.toml");
        std::fs::write(&path, SUITE).unwrap();

        let suite = load_suite(&path).unwrap();
        assert_eq!(suite.name, "customer-support");
        assert_eq!(suite.tests.len(), 2);
        assert_eq!(suite.tests[0].checks[0], "tool_called:process_refund");
    }

    #[test]
    fn missing_suite_is_an_error() {
        let err = load_suite(Path::new("/nonexistent/tests.toml")).unwrap_err();
        assert!(matches!(err, Error::Suite(_)));
    }

    #[test]
    fn malformed_suite_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tests.toml");
        std::fs::write(&path, "name = [broken").unwrap();
        assert!(matches!(load_suite(&path), Err(Error::Suite(_))));
    }
}
