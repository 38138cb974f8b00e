use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod cmd;

#[derive(Parser)]
#[command(name = "styleguard")]
#[command(version, about = "Stylesheet lint orchestration for incremental build pipelines")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Base directory for file patterns. Defaults to the current directory.
    #[arg(long, global = true)]
    pub context: Option<PathBuf>,

    /// File pattern to lint (repeatable). Defaults to **/*.scss and **/*.sass.
    #[arg(long = "files", global = true)]
    pub files: Vec<String>,

    /// Lint configuration file handed to the engine.
    #[arg(long, global = true)]
    pub config_file: Option<PathBuf>,

    /// Stylelint-compatible executable to invoke.
    #[arg(long, default_value = "stylelint", global = true)]
    pub stylelint: PathBuf,

    /// Suppress the per-cycle echo of lint results.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Fail the cycle when error-severity results are present.
    #[arg(long, global = true)]
    pub fail_on_error: bool,

    /// Report every finding as a warning instead of splitting by severity.
    #[arg(long, global = true)]
    pub no_emit_errors: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a single lint cycle and print the collected diagnostics
    Lint,
    /// Poll the context directory and lint on changes
    Watch {
        /// Poll interval in milliseconds
        #[arg(long, default_value = "750")]
        interval_ms: u64,

        /// Lint only files whose timestamps changed between cycles
        #[arg(long)]
        dirty_only: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Lint => cmd::cmd_lint(&cli).await,
        Commands::Watch {
            interval_ms,
            dirty_only,
        } => cmd::cmd_watch(&cli, *interval_ms, *dirty_only).await,
    }
}

fn init_tracing(verbose: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(if verbose { "styleguard=debug" } else { "warn" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
