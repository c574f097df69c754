// src/main.rs
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod active_leave;
mod active_leave_tests;
mod clock;
mod config;
mod leave;
mod leave_sheet;
mod notifier;
mod pipeline;
mod profile;
mod report;
mod routing;

use clock::{FixedClock, SystemClock};
use config::{AppConfig, ConfigError};
use leave_sheet::ExtractError;
use notifier::{LogNotifier, NotificationError, Notifier, SlackWebhookNotifier};
use pipeline::{LeaveReportPipeline, RunSummary};
use profile::ProfileKind;

// --- Command Line ---

#[derive(Parser, Debug)]
#[command(name = "leavebot", version)]
#[command(about = "Posts today's leave report from a VOGSY export to Slack")]
struct Args {
    /// Workbook holding the "VOGSY Data" sheet
    #[arg(long, alias = "excelPath", default_value = "leaves.xlsx")]
    excel_path: PathBuf,

    #[arg(long, value_enum, default_value_t = ProfileKind::Generic)]
    profile: ProfileKind,

    /// Report as of this day instead of the local date (YYYY-MM-DD)
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Log the reports instead of posting them
    #[arg(long)]
    dry_run: bool,

    /// Log every extracted record of this employee
    #[arg(long)]
    trace_employee: Option<String>,
}

// --- Error Handling ---

#[derive(Error, Debug)]
enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Could not read leave export: {0}")]
    Extract(#[from] ExtractError),
    #[error("Failed to set up Slack client: {0}")]
    Notifier(#[from] NotificationError),
}

impl AppError {
    fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => 2,
            AppError::Extract(_) => 3,
            AppError::Notifier(_) => 1,
        }
    }
}

// --- Main Application Logic ---

fn build_notifier(config: &AppConfig, dry_run: bool) -> Result<Box<dyn Notifier + Send + Sync>, AppError> {
    if dry_run {
        info!("Dry run: reports will be logged, not sent");
        return Ok(Box::new(LogNotifier));
    }
    let url = config.webhook_url()?;
    info!("Posting reports via {}", config.webhook_var());
    let notifier = SlackWebhookNotifier::new(url.to_string(), Some(config.webhook_timeout))?;
    Ok(Box::new(notifier))
}

async fn run(args: Args) -> anyhow::Result<RunSummary> {
    let config = AppConfig::from_env(args.profile).map_err(AppError::from)?;
    let notifier = build_notifier(&config, args.dry_run)?;

    info!("Running {:?} leave report from {}", config.profile.kind, args.excel_path.display());

    let pipeline = LeaveReportPipeline::new(config.profile, notifier).with_trace_employee(args.trace_employee);
    let pipeline = match args.today {
        Some(day) => {
            info!("Reporting as of {} instead of the local date", day);
            pipeline.with_clock(FixedClock::new(day))
        }
        None => pipeline.with_clock(SystemClock),
    };
    let summary = pipeline
        .run(&args.excel_path)
        .await
        .map_err(AppError::from)
        .with_context(|| format!("Leave report aborted for {}", args.excel_path.display()))?;
    Ok(summary)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            if !summary.failed.is_empty() {
                warn!("Reports not delivered to: {}", summary.failed.join(", "));
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{:#}", err);
            let code = err.downcast_ref::<AppError>().map_or(1, AppError::exit_code);
            ExitCode::from(code)
        }
    }
}
