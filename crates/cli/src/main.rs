//! job-digest CLI entry point.
//!
//! This binary is the composition root for the whole system. Responsibilities:
//!
//! 1. **Load configuration**: read `.env` (if present), then parse flags and
//!    environment variables with `clap`.
//! 2. **Wire observability**: install `tracing-subscriber` with a text or JSON
//!    layer and, when `OTEL_EXPORTER_OTLP_ENDPOINT` is set, an OpenTelemetry
//!    OTLP exporter.
//! 3. **Construct infrastructure**: build the `GithubClient` and inject it,
//!    together with a `TracingLogger`, into `DigestIssueService`.
//! 4. **Dispatch** the `create`, `validate`, or `preview` subcommand.
//!
//! Command output goes to stdout; logs go to stderr.

mod config;
mod telemetry;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use digest_core::{
    build_labels, format_issue, parse, validate_digest, DigestIssueService, Timestamp,
    TracingLogger,
};
use github::GithubClient;
use tokio::io::AsyncReadExt;

use crate::config::{Cli, Command, CreateArgs};

#[tokio::main]
async fn main() -> ExitCode {
    let env_file = config::load_dotenv();
    let cli = Cli::parse();

    let _telemetry = match telemetry::init(cli.log_format) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(path) = env_file {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "job-digest failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Create(args) => create(args).await,
        Command::Validate(args) => {
            let raw = read_input(&args.input).await?;
            let report = validate_digest(&raw);
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(if report.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Command::Preview(args) => {
            let raw = read_input(&args.input).await?;
            let digest = parse(&raw)?;
            let content = format_issue(&digest, Timestamp::now());
            let labels: Vec<String> = build_labels(&digest.summary)
                .iter()
                .map(ToString::to_string)
                .collect();
            println!("Title: {}", content.title);
            println!("Labels: {}", labels.join(", "));
            println!();
            println!("{}", content.body);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn create(args: CreateArgs) -> Result<ExitCode> {
    // Configuration problems surface before the digest is read.
    let github_config = args.github_config()?;
    tracing::info!(repository = %github_config.repository, "Target repository");

    let raw = read_input(&args.input.input).await?;
    let tracker = GithubClient::new(github_config)?;
    let service = DigestIssueService::new(Arc::new(tracker), Arc::new(TracingLogger));

    let created = service.create_digest_issue(&raw).await?;
    println!("{}", serde_json::to_string_pretty(&created)?);
    Ok(ExitCode::SUCCESS)
}

async fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut raw = String::new();
        tokio::io::stdin()
            .read_to_string(&mut raw)
            .await
            .context("failed to read digest from stdin")?;
        Ok(raw)
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read digest from {}", path.display()))
    }
}
