//! CLI tool to upload a native result JSON file to the collection server.
//!
//! Usage:
//!   report-run [--project-id ID] [--fail-on-error] <results.json>
//!
//! Configuration falls back to TRR_* environment variables; a .env file in
//! the working directory is honored.

use std::env;
use std::process::ExitCode;

use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

use test_run_reporter::models::AggregateResult;
use test_run_reporter::{Reporter, ReporterOptions};

fn print_usage() {
    eprintln!("Usage: report-run [OPTIONS] <results.json>");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --project-id, -p ID   Project identifier (overrides TRR_PROJECT_ID)");
    eprintln!("  --fail-on-error       Exit nonzero when delivery fails");
    eprintln!("  --help, -h            Show this help");
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to set tracing subscriber");
        return ExitCode::FAILURE;
    }

    let args: Vec<String> = env::args().collect();

    let mut project_id: Option<String> = None;
    let mut fail_on_error: Option<bool> = None;
    let mut results_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--project-id" | "-p" => {
                i += 1;
                if i < args.len() {
                    project_id = Some(args[i].clone());
                }
            }
            "--fail-on-error" => {
                fail_on_error = Some(true);
            }
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                return ExitCode::FAILURE;
            }
            path => {
                results_path = Some(path.to_string());
            }
        }
        i += 1;
    }

    let Some(results_path) = results_path else {
        eprintln!("Missing required argument: <results.json>");
        print_usage();
        return ExitCode::FAILURE;
    };

    let content = match tokio::fs::read_to_string(&results_path).await {
        Ok(content) => content,
        Err(e) => {
            error!("Could not read {}: {}", results_path, e);
            return ExitCode::FAILURE;
        }
    };

    let aggregate: AggregateResult = match serde_json::from_str(&content) {
        Ok(aggregate) => aggregate,
        Err(e) => {
            error!("Could not parse {} as a native result: {}", results_path, e);
            return ExitCode::FAILURE;
        }
    };

    let options = ReporterOptions {
        project_id,
        fail_on_error,
        ..Default::default()
    };
    let reporter = Reporter::new(&options);

    match reporter.on_run_complete(&aggregate).await {
        Ok(()) => {
            info!("Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Delivery failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
