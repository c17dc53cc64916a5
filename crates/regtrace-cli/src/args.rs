use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "regtrace")]
#[command(about = "Trace LLM API calls made by any command and catch behavioral regressions", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the config file
    #[arg(long, short = 'c', default_value = "regtrace.toml", global = true)]
    pub config: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a command and trace all LLM API calls it makes
    #[command(after_help = "Examples:\n  regtrace trace -- python app.py\n  regtrace trace --save-baseline -- python test_agent.py")]
    Trace {
        /// Save the captured session as the new baseline
        #[arg(long, short = 'b')]
        save_baseline: bool,

        /// Output file for the session (default: .regtrace/traces/<start-time>-<id>.json)
        #[arg(long, short = 'o')]
        output: Option<String>,

        /// Run without the proxy (captures nothing)
        #[arg(long)]
        no_proxy: bool,

        /// The command to run, after `--`
        #[arg(trailing_var_arg = true, required = true)]
        command: Vec<String>,
    },

    /// Run evaluations against the test suite and compare with the baseline
    #[command(after_help = "Examples:\n  regtrace run\n  regtrace run --ci\n  regtrace run --tests evals/tests.toml")]
    Run {
        /// Path to the test suite (default: <evals.path>/tests.toml)
        #[arg(long, short = 't')]
        tests: Option<String>,

        /// Path to the baseline results (default: .regtrace/results.json)
        #[arg(long, short = 'b')]
        baseline: Option<String>,

        /// CI mode: exit 1 on failure or regression, write results.json
        #[arg(long)]
        ci: bool,

        /// Output format
        #[arg(long, default_value = "text")]
        format: RunFormat,
    },

    /// Create a default regtrace.toml and a starter test suite
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunFormat {
    /// Human-readable, colored output
    Text,
    /// Raw JSON of the eval result
    Json,
    /// GitHub Actions workflow commands
    Github,
}
