use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use txn_quality::{display, CliOverrides, Pipeline, QualityConfig, RunReport, RunStatus};

/// Validate a batch of transactions and record the run in the audit history.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Input CSV
    #[arg(long)]
    input: Option<PathBuf>,
    /// Control summary output
    #[arg(long)]
    summary: Option<PathBuf>,
    /// Audit history to append to
    #[arg(long)]
    audit_log: Option<PathBuf>,
    /// Row-level results output
    #[arg(long)]
    row_results: Option<PathBuf>,
    /// Clean subset output
    #[arg(long)]
    clean_output: Option<PathBuf>,
    /// Print the run report as JSON instead of text
    #[arg(long)]
    json: bool,
    /// Exit with status 1 when any quality check fails
    #[arg(long)]
    fail_on_errors: bool,
}

const EXIT_QUALITY_FAIL: u8 = 1;
const EXIT_INFRA_ERROR: u8 = 2;

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "txn_quality=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(report) if args.fail_on_errors && report.run_status() == RunStatus::Fail => {
            ExitCode::from(EXIT_QUALITY_FAIL)
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_INFRA_ERROR)
        }
    }
}

fn run(args: &Args) -> anyhow::Result<RunReport> {
    let overrides = CliOverrides {
        input: args.input.clone(),
        control_summary: args.summary.clone(),
        audit_log: args.audit_log.clone(),
        row_results: args.row_results.clone(),
        clean_output: args.clean_output.clone(),
    };
    let config = QualityConfig::load(args.config.as_deref(), &overrides)?;
    let report = Pipeline::new(config).run()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", display::format_report(&report));
    }
    Ok(report)
}
