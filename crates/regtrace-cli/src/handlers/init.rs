use crate::output;
use anyhow::{Context, Result, bail};
use regtrace_runtime::Config;
use std::path::Path;

const STARTER_SUITE: &str = r#"name = "starter-suite"
description = "Example checks; replace with your own tests"

[[tests]]
name = "answers politely"
prompt = "My order arrived damaged. What can I do?"
checks = ["tone:empathetic", "stays_on_topic"]

[[tests]]
name = "uses the refund tool"
prompt = "Please refund order A-17, it never arrived."
checks = ["tool_called:process_refund", "no_hallucination"]
"#;

pub fn handle(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    let mut config = Config::default();
    config.project = std::env::current_dir()
        .ok()
        .and_then(|dir| dir.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_default();

    config
        .save_to(config_path)
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    output::print_saved(config_path, "Config");

    let suite_path = Path::new(&config.evals.path).join("tests.toml");
    if !suite_path.exists() || force {
        if let Some(parent) = suite_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&suite_path, STARTER_SUITE)
            .with_context(|| format!("failed to write {}", suite_path.display()))?;
        output::print_saved(&suite_path, "Test suite");
    }

    Ok(())
}
