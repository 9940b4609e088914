mod intake;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use brdcase::config::{apply_env_overrides, load_config, prepare_environment, Config};
use brdcase::pipeline::{BatchReport, Pipeline, PipelineConfig};
use brdcase::{GoogleSheetsClient, OpenAiClient};

use intake::Intake;

/// Generate UI/UX test cases from requirement PDFs and write them to Google Sheets.
#[derive(Parser, Debug)]
#[command(name = "brdcase", author, version, about)]
struct Args {
    /// Requirement documents to process, in order.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// JSON configuration file. Built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Test cases to request per document (defaults to generation.target_count).
    #[arg(short, long)]
    target_count: Option<usize>,

    /// Request every test case in a single Happy Path batch.
    #[arg(long)]
    no_batch: bool,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init(args.log_json) {
        eprintln!("Failed to initialize logging: {}", e);
    }
    // Another logger may already be installed; tracing still works without the bridge.
    let _ = tracing_log::LogTracer::init();

    match run(args).await {
        Ok(report) => {
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => error!("Failed to serialize report: {}", e),
            }
            if report.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<BatchReport> {
    info!("Starting brdcase v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    apply_env_overrides(&mut config).context("Invalid environment override")?;
    if args.no_batch {
        config.generation.batch_mode = false;
    }

    let startup = prepare_environment(&config).context("Startup checks failed")?;
    if !startup.is_clean() {
        warn!(
            "{} startup warning(s); processing may fail",
            startup.warnings.len()
        );
    }

    let target_count = args.target_count.unwrap_or(config.generation.target_count);
    anyhow::ensure!(target_count > 0, "--target-count must be at least 1");

    let chat = OpenAiClient::from_config(&config.generation)
        .context("Generative API client unavailable")?;
    let sheets = GoogleSheetsClient::from_config(&config.sheets)
        .context("Google Sheets client unavailable")?;

    let pipeline = Pipeline::from_config(
        Arc::new(PipelineConfig::from_config(&config)),
        Box::new(chat),
        Box::new(sheets),
    );
    let intake = Intake::from_config(&config);

    let staged: Vec<_> = args.files.iter().map(|input| intake.stage(input)).collect();
    let report = pipeline.run_all(staged, target_count).await;
    Ok(report)
}
