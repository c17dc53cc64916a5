use crate::args::{Cli, Commands};
use crate::handlers;
use anyhow::Result;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Dispatch a parsed CLI invocation. Returns the process exit code.
pub fn run(cli: Cli) -> Result<i32> {
    init_tracing();

    let config_path = Path::new(&cli.config);

    match cli.command {
        Commands::Trace {
            save_baseline,
            output,
            no_proxy,
            command,
        } => handlers::trace::handle(config_path, &command, save_baseline, output, no_proxy),

        Commands::Run {
            tests,
            baseline,
            ci,
            format,
        } => handlers::run::handle(config_path, tests, baseline, ci, format),

        Commands::Init { force } => handlers::init::handle(config_path, force).map(|_| 0),
    }
}

fn init_tracing() {
    // Quiet by default; RUST_LOG opts in. Diagnostics go to stderr so they
    // never mix with JSON output.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
