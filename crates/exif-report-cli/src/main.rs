//! exif-report - post embedded media metadata to a pull request
//!
//! Intended to run as a CI step. Every option can be given as a flag or
//! through the environment variables a GitHub Action exposes.
//!
//! Exit status: 0 on success or when there is nothing to report, 2 for
//! configuration errors, 3 for scan errors, 4 for inspector failures, 5 for
//! publish failures, 1 for anything else.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, Level};

use exif_report_core::{
    CommandInspector, ConfigError, GitHubCommenter, LogFormat, Pipeline, PipelineError,
    RunConfig, RunOutcome, DEFAULT_API_URL, DEFAULT_INSPECTOR,
};

#[derive(Parser, Debug)]
#[command(name = "exif-report")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Report embedded media metadata as a pull request comment", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,

    /// Directory to scan
    #[arg(long, env = "INPUT_ROOT", default_value = ".")]
    root: PathBuf,

    /// Whitespace-separated extensions to inspect (e.g. "jpg .png")
    #[arg(long, env = "INPUT_TARGET_EXT", default_value = "")]
    extensions: String,

    /// API token used to post the comment
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Target repository as owner/name
    #[arg(long, env = "INPUT_REPOSITORY")]
    repository: Option<String>,

    /// Pull request number
    #[arg(long, env = "INPUT_PR_NUMBER")]
    pr_number: Option<String>,

    /// Inspection program, called with one file path
    #[arg(long, env = "INPUT_INSPECTOR", default_value = DEFAULT_INSPECTOR)]
    inspector: String,

    /// Maximum concurrent inspections
    #[arg(long, env = "INPUT_JOBS", default_value_t = 1)]
    jobs: usize,

    /// Per-file inspection timeout in seconds (0 = none)
    #[arg(long, env = "INPUT_TIMEOUT_SECS", default_value_t = 0)]
    timeout_secs: u64,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    exif_report_core::init_tracing(LogFormat::from_json_flag(cli.json), level);

    match run(cli).await {
        Ok(outcome) => {
            println!("{outcome}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %format!("{err:#}"), "Run failed");
            eprintln!("error: {err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn run(cli: Cli) -> Result<RunOutcome> {
    let config = load_config(&cli)?;
    info!(pull_request = %config.target, inspector = %cli.inspector, "Starting");

    let inspector = CommandInspector::new(cli.inspector).with_timeout_secs(cli.timeout_secs);
    let publisher = GitHubCommenter::new(&cli.api_url, config.token.clone())
        .map_err(PipelineError::Publish)
        .context("Failed to create GitHub client")?;

    let pipeline = Pipeline::new(
        config.target,
        Arc::new(inspector),
        Arc::new(publisher),
        cli.jobs,
    );

    let outcome = pipeline.run(&cli.root, &cli.extensions).await?;
    Ok(outcome)
}

/// Validate required settings before touching the filesystem or network.
fn load_config(cli: &Cli) -> Result<RunConfig, PipelineError> {
    if cli.jobs == 0 {
        return Err(ConfigError::ZeroJobs.into());
    }

    let config = RunConfig::from_raw(
        cli.token.as_deref(),
        cli.repository.as_deref(),
        cli.pr_number.as_deref(),
    )?;
    Ok(config)
}

fn exit_code(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<PipelineError>()
        .map(PipelineError::exit_code)
        .unwrap_or(1)
}
