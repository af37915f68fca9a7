//! Generative-language API probe
//!
//! A small command-line tool for manually checking credentials and endpoint
//! behavior of the Gemini API and of a locally hosted interview service.

mod core;
mod models;
mod probes;

use crate::core::config::Config;
use crate::core::logging::init_logging;
use crate::core::services::{GeminiClient, InterviewClient};
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::time::Duration;
use tracing::{info, warn};

/// Origin header the interview service expects for validation calls
const INTERVIEW_ORIGIN: &str = "http://localhost:3000";

/// Probe selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    ListModels,
    TestKeys,
    Interview,
    ExecuteCheck,
    Health,
}

impl Command {
    fn from_str(s: &str) -> Option<Self> {
        match s {
            "list-models" => Some(Command::ListModels),
            "test-keys" => Some(Command::TestKeys),
            "interview" => Some(Command::Interview),
            "execute-check" => Some(Command::ExecuteCheck),
            "health" => Some(Command::Health),
            _ => None,
        }
    }
}

/// Parsed command-line arguments
#[derive(Debug, Default)]
struct Args {
    config_path: Option<String>,
    command: Option<String>,
    help: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Args> {
    let mut parsed = Args::default();
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => parsed.help = true,
            "--config" | "-c" => {
                parsed.config_path = Some(iter.next().context("--config requires a path")?);
            }
            other if parsed.command.is_none() => parsed.command = Some(other.to_string()),
            other => anyhow::bail!("Unexpected argument: {}", other),
        }
    }

    Ok(parsed)
}

#[tokio::main]
async fn main() {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            print_help();
            std::process::exit(2);
        }
    };

    if args.help || args.command.is_none() {
        print_help();
        return;
    }

    let command = match args.command.as_deref().and_then(Command::from_str) {
        Some(command) => command,
        None => {
            eprintln!("Unknown command: {}", args.command.as_deref().unwrap_or_default());
            print_help();
            std::process::exit(2);
        }
    };

    // Load configuration
    let config = match Config::load(args.config_path.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log_level);

    if let Err(e) = run(command, &config).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(command: Command, config: &Config) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    info!("Running {:?}", command);

    match command {
        Command::ListModels => {
            let client = GeminiClient::new(&config.gemini_base_url, config.request_timeout)?;
            match probes::model_lister::run(&client, &config.api_key, &mut out).await? {
                Ok(listing) => info!("Listed {} models (HTTP {})", listing.models.models.len(), listing.status),
                Err(e) => warn!("Model listing failed (HTTP {:?}): {}", e.status(), e),
            }
        }
        Command::TestKeys => {
            let client = GeminiClient::new(&config.gemini_base_url, config.request_timeout)?;
            let outcomes = probes::key_tester::run_and_report(
                &client,
                &config.model,
                &config.credentials,
                &config.results_log,
                &mut out,
            )
            .await
            .with_context(|| format!("Failed to write {}", config.results_log))?;
            for outcome in &outcomes {
                let status = match &outcome.result {
                    Ok(response) => Some(response.status),
                    Err(e) => e.status(),
                };
                info!(
                    "{} ({}): {} (HTTP {:?})",
                    outcome.label,
                    outcome.auth.as_str(),
                    if outcome.succeeded() { "accepted" } else { "rejected" },
                    status
                );
            }
        }
        Command::Interview => {
            let client = InterviewClient::new(&config.interview_url, config.interview_timeout)?;
            let outcomes = probes::interview_flow::run(
                &client,
                &config.interview_job_id,
                &config.custom_skills,
                &probes::interview_flow::scenarios(),
                &mut out,
            )
            .await?;
            for outcome in &outcomes {
                info!(
                    "Round {}: {} (warning: {:?})",
                    outcome.round,
                    if outcome.result.is_ok() { "replied" } else { "failed" },
                    outcome.warning
                );
            }
            let warnings = outcomes.iter().filter(|o| o.warning.is_some()).count();
            let failures = outcomes.iter().filter(|o| o.result.is_err()).count();
            info!(
                "Interview flow: {} scenarios, {} topic warnings, {} failed requests",
                outcomes.len(),
                warnings,
                failures
            );
        }
        Command::ExecuteCheck => {
            let client = InterviewClient::new(&config.interview_url, config.interview_timeout)?
                .with_origin(INTERVIEW_ORIGIN);
            let (summary, outcomes) = probes::execute_check::run(
                &client,
                &config.validate_job_id,
                &probes::execute_check::all_cases(),
                Duration::from_millis(config.pace_ms),
                &mut out,
            )
            .await?;
            for outcome in outcomes.iter().filter(|o| !o.passed) {
                info!("Failed case: {} (reply received: {})", outcome.name, outcome.result.is_ok());
            }
            info!("Execute check: {}/{} passed", summary.passed, summary.total());
        }
        Command::Health => {
            let client = GeminiClient::new(&config.gemini_base_url, config.request_timeout)?;
            let report =
                probes::health::run(&client, &config.api_key, &config.health_model, &mut out).await?;
            if report.is_ok() {
                info!("Health check passed for {}", config.health_model);
            } else {
                warn!("Health check failed for {} (HTTP {:?})", config.health_model, report.code);
            }
        }
    }

    out.flush()?;
    Ok(())
}

/// Print help message
fn print_help() {
    println!("genlang-probe v0.1.0");
    println!();
    println!("Usage: genlang-probe [OPTIONS] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  list-models     List the models visible to GEMINI_API_KEY");
    println!("  test-keys       Try every configured credential, results go to the results log");
    println!("  interview       Run the scripted interview chat scenarios");
    println!("  execute-check   Run the code/design validation suite");
    println!("  health          Ping the health model");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>  Configuration file (default: $CONFIG_PATH or probe.toml)");
    println!("  -h, --help           Display this help message");
    println!();
    println!("Credentials are read from the environment variables named in the");
    println!("configuration file (a .env file in the working directory is loaded first).");
    println!("  GEMINI_API_KEY - default key for list-models, health and test-keys");
    println!("  RUST_LOG       - overrides [logging] level");
}
