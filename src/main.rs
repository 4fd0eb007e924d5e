//! CLI entry point for the bin day lookup tool.
//!
//! Provides subcommands for looking up a property's weekly collection
//! schedule, listing the address candidates behind a postcode, and
//! normalizing raw property payloads offline.

use anyhow::Result;
use bin_day::{
    cache::ScheduleCache,
    error::Error,
    fetch::{BasicClient, read_source},
    infra::eastherts::{DEFAULT_BASE_URL, EastHertsClient},
    normalize::normalize_payload,
    output::{ScheduleView, append_events, print_json, render_schedule},
    parser::parse_payload,
    pipeline,
    resolver::{self, normalize_postcode},
    schedule::aggregate::aggregate,
    schedule::week::{cutover_start, service_baseline},
};
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bin_day")]
#[command(about = "Look up household waste collection schedules", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the weekly collection schedule for an address
    Lookup {
        /// Postcode to search, any casing or spacing
        #[arg(short, long)]
        postcode: String,

        /// House number or name fragment to select the address
        #[arg(long)]
        house: String,

        /// Print the schedule as pretty JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,

        /// CSV file to append the normalized events to
        #[arg(short, long)]
        csv: Option<String>,
    },
    /// List candidate addresses for a postcode
    Addresses {
        /// Postcode to search, any casing or spacing
        #[arg(short, long)]
        postcode: String,
    },
    /// Normalize a raw property-details payload from a file or URL
    Inspect {
        /// Path to file or URL to fetch
        #[arg(value_name = "FILE_OR_URL")]
        source: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bin_day.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bin_day.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Lookup {
            postcode,
            house,
            json,
            csv,
        } => lookup_command(&postcode, &house, json, csv.as_deref()).await,
        Commands::Addresses { postcode } => addresses_command(&postcode).await,
        Commands::Inspect { source } => inspect_command(&source).await,
    };

    if let Err(err) = outcome {
        // Pipeline failures get the stable user-facing wording; anything
        // else (IO, setup) surfaces as-is.
        if let Some(failure) = err.downcast_ref::<Error>() {
            error!(error = %err, "Command failed");
            eprintln!("{}", failure.user_message());
            drop(file_guard);
            std::process::exit(1);
        }
        return Err(err);
    }

    Ok(())
}

/// Council API client for the configured base URL.
fn council_client() -> Result<EastHertsClient, Error> {
    let base_url =
        std::env::var("BIN_DAY_API_BASE").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    EastHertsClient::new(base_url)
}

/// Runs the full pipeline for one address and renders the weekly view.
#[tracing::instrument(skip(json, csv))]
async fn lookup_command(postcode: &str, house: &str, json: bool, csv: Option<&str>) -> Result<()> {
    let client = council_client()?;
    let cache = ScheduleCache::new();

    let property = pipeline::lookup(&client, &cache, postcode, house).await?;

    let now = Utc::now();
    let baseline = service_baseline();
    let weeks = aggregate(
        cutover_start(now, baseline),
        now,
        baseline,
        &property.collections,
    );

    if let Some(path) = csv {
        append_events(path, &property.collections)?;
        info!(path, events = property.collections.len(), "CSV rows appended");
    }

    if json {
        print_json(&ScheduleView {
            property: &property,
            weeks: &weeks,
        })?;
    } else {
        print!("{}", render_schedule(&property, &weeks));
    }

    Ok(())
}

/// Runs the address-resolution step alone and logs each candidate.
#[tracing::instrument]
async fn addresses_command(postcode: &str) -> Result<()> {
    let client = council_client()?;
    let postcode = normalize_postcode(postcode);

    let candidates = resolver::resolve(&client, &postcode).await?;

    for candidate in &candidates {
        info!(uprn = %candidate.uprn, address = %candidate.address, "Candidate");
    }

    info!(postcode = %postcode, total = candidates.len(), "Address search complete");
    Ok(())
}

/// Normalizes a raw payload from disk or HTTP and prints the result.
#[tracing::instrument]
async fn inspect_command(source: &str) -> Result<()> {
    let client = BasicClient::new()?;
    let bytes = read_source(&client, source).await?;

    let value: serde_json::Value = serde_json::from_slice(&bytes)?;
    let property = normalize_payload("", "", "", parse_payload(value)?)?;

    println!("{}", serde_json::to_string_pretty(&property)?);
    Ok(())
}
