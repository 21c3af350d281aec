//! soilwatch - Soil Health Index service
//!
//! Polls a ThingSpeak soil sensor channel, scores every reading, and serves
//! the results over HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Serve against the configured channel
//! soilwatch
//!
//! # Serve demo data only (no network)
//! soilwatch --offline
//!
//! # Score one reading and exit
//! soilwatch score --nitrogen 45.2 --phosphorus 23.8 --potassium 156.4 \
//!     --soil-ph 6.5 --soil-moisture 68.5 --temperature 24.3 --humidity 72.1
//!
//! # Check a config file
//! soilwatch check-config ./soilwatch.toml
//! ```
//!
//! # Environment Variables
//!
//! - `SOILWATCH_CONFIG`: Path to TOML config (default: ./soilwatch.toml)
//! - `SOILWATCH_SERVER_ADDR`: HTTP bind address
//! - `SOILWATCH_THINGSPEAK_KEY`: ThingSpeak read API key
//! - `SOILWATCH_CORS_ORIGINS`: Comma-separated allowed CORS origins
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Notify, RwLock};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use soilwatch::acquisition::{latest_or_fallback, DemoSource, ReadingSource, ThingSpeakClient};
use soilwatch::api::{create_app, DashboardState};
use soilwatch::config::{self, validation, AppConfig, ConfigError};
use soilwatch::pipeline::{run_feed_poller, AppState};
use soilwatch::processing::build_report;
use soilwatch::types::SensorReading;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "soilwatch")]
#[command(about = "Soil Health Index scoring and sensor-feed service")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "0.0.0.0:8080")
    #[arg(short, long, value_name = "HOST:PORT")]
    addr: Option<String>,

    /// Path to a TOML config file. Unlike SOILWATCH_CONFIG, a bad file here is fatal.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Serve demo data without contacting the feed
    #[arg(long)]
    offline: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Run the poller and HTTP server (default)
    Serve,

    /// Score one reading and print the report as JSON
    Score {
        #[command(flatten)]
        reading: ReadingArgs,
        /// Print only the rounded percent and label
        #[arg(long)]
        brief: bool,
    },

    /// Fetch the latest reading from the configured feed and score it
    Fetch,

    /// Validate a config file and report errors, warnings and typos
    CheckConfig {
        /// Config file to check (default: the normal search order)
        path: Option<PathBuf>,
        /// Write the built-in defaults to this path and exit
        #[arg(long, value_name = "PATH")]
        write_defaults: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct ReadingArgs {
    /// Nitrogen (mg/kg)
    #[arg(long, allow_negative_numbers = true)]
    nitrogen: f64,
    /// Phosphorus (mg/kg)
    #[arg(long, allow_negative_numbers = true)]
    phosphorus: f64,
    /// Potassium (mg/kg)
    #[arg(long, allow_negative_numbers = true)]
    potassium: f64,
    /// Soil pH
    #[arg(long, allow_negative_numbers = true)]
    soil_ph: f64,
    /// Soil moisture (%)
    #[arg(long, allow_negative_numbers = true)]
    soil_moisture: f64,
    /// Temperature (°C)
    #[arg(long, allow_negative_numbers = true)]
    temperature: f64,
    /// Relative humidity (%)
    #[arg(long, allow_negative_numbers = true)]
    humidity: f64,
}

impl From<ReadingArgs> for SensorReading {
    fn from(a: ReadingArgs) -> Self {
        Self {
            nitrogen: a.nitrogen,
            phosphorus: a.phosphorus,
            potassium: a.potassium,
            soil_ph: a.soil_ph,
            soil_moisture: a.soil_moisture,
            temperature: a.temperature,
            humidity: a.humidity,
        }
    }
}

// ============================================================================
// Task Names for Supervisor Logging
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum TaskName {
    HttpServer,
    FeedPoller,
}

impl std::fmt::Display for TaskName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpServer => write!(f, "HttpServer"),
            Self::FeedPoller => write!(f, "FeedPoller"),
        }
    }
}

// ============================================================================
// Config Loading
// ============================================================================

/// An explicit `--config` must load cleanly; otherwise use the search order.
fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    let mut config = match path {
        Some(p) => AppConfig::load_from_file(p)
            .with_context(|| format!("Failed to load config from {}", p.display()))?,
        None => return Ok(AppConfig::load()),
    };
    config.apply_env_overrides();
    Ok(config)
}

fn build_source(config: &AppConfig, offline: bool) -> Result<Arc<dyn ReadingSource>> {
    if offline || !config.feed.enabled {
        info!("Input: demo data (feed disabled)");
        return Ok(Arc::new(DemoSource));
    }
    info!(
        channel = %config.feed.channel_id,
        authenticated = !config.feed.read_api_key.is_empty(),
        "Input: ThingSpeak channel"
    );
    let client = ThingSpeakClient::new(&config.feed).context("Failed to build feed client")?;
    Ok(Arc::new(client))
}

// ============================================================================
// Subcommands
// ============================================================================

fn run_score(reading: SensorReading, brief: bool) -> Result<()> {
    let report = build_report(&reading)?;
    if brief {
        println!("{}% {}", report.display_percent, report.result.label);
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

async fn run_fetch(config: &AppConfig, offline: bool) -> Result<()> {
    let source = build_source(config, offline)?;
    let observation = latest_or_fallback(source.as_ref()).await;
    let report = build_report(&observation.reading)?;
    let out = serde_json::json!({
        "observation": observation,
        "report": report,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn run_check_config(path: Option<PathBuf>, write_defaults: Option<PathBuf>) -> Result<()> {
    if let Some(out) = write_defaults {
        AppConfig::default().save_to_file(&out)?;
        println!("Wrote default config to {}", out.display());
        return Ok(());
    }

    let path = path
        .or_else(|| std::env::var(config::defaults::CONFIG_PATH_ENV).ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(config::defaults::LOCAL_CONFIG_FILE));
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let typos = validation::validate_unknown_keys(&contents);
    for w in &typos {
        println!("warning: {w}");
    }

    let parsed = AppConfig::from_toml_str(&contents).map_err(|e| match e {
        ConfigError::Parse(None, inner) => ConfigError::Parse(Some(path.clone()), inner),
        other => other,
    })?;
    let (errors, warnings) = validation::validate_ranges(&parsed);
    for w in &warnings {
        println!("warning: {w}");
    }
    for e in &errors {
        println!("error: {e}");
    }

    if errors.is_empty() {
        println!(
            "{} is valid ({} warning(s))",
            path.display(),
            typos.len() + warnings.len()
        );
        Ok(())
    } else {
        Err(ConfigError::Validation(errors).into())
    }
}

// ============================================================================
// Service
// ============================================================================

/// Outcome of one supervised task as yielded by `JoinSet::join_next`.
type TaskOutcome = std::result::Result<Result<TaskName>, tokio::task::JoinError>;

fn spawn_http_server(
    tasks: &mut JoinSet<Result<TaskName>>,
    listener: tokio::net::TcpListener,
    app: axum::Router,
    cancel_token: CancellationToken,
) {
    tasks.spawn(async move {
        let drain = async move {
            cancel_token.cancelled().await;
            info!(task = %TaskName::HttpServer, "Draining HTTP connections");
        };
        axum::serve(listener, app)
            .with_graceful_shutdown(drain)
            .await
            .context("HTTP server stopped unexpectedly")?;
        Ok(TaskName::HttpServer)
    });
}

/// Log how a task ended; failures and panics become errors.
fn check_task_exit(outcome: TaskOutcome) -> Result<()> {
    match outcome {
        Ok(Ok(task)) => {
            info!(%task, "Task stopped");
            Ok(())
        }
        Ok(Err(e)) => {
            error!(error = %e, "Task failed");
            Err(e)
        }
        Err(e) => {
            error!(error = %e, "Task panicked");
            Err(anyhow::anyhow!("supervised task panicked: {e}"))
        }
    }
}

/// Wait for shutdown or the first task exit, then stop and drain the rest.
///
/// Returns the first task failure, if any.
async fn run_supervisor(
    tasks: &mut JoinSet<Result<TaskName>>,
    cancel_token: CancellationToken,
) -> Result<()> {
    info!(tasks = tasks.len(), "Supervising service tasks");

    let first = tokio::select! {
        () = cancel_token.cancelled() => Ok(()),
        Some(outcome) = tasks.join_next() => check_task_exit(outcome),
        else => Ok(()),
    };

    // Both tasks run until shutdown, so any early exit stops the service
    cancel_token.cancel();

    let mut failure = first.err();
    while let Some(outcome) = tasks.join_next().await {
        if let Err(e) = check_task_exit(outcome) {
            failure.get_or_insert(e);
        }
    }
    failure.map_or(Ok(()), Err)
}

async fn run_service(
    app_config: AppConfig,
    server_addr: String,
    offline: bool,
    cancel_token: CancellationToken,
) -> Result<()> {
    let source = build_source(&app_config, offline)?;
    let interval = Duration::from_secs(app_config.feed.poll_interval_secs.max(1));

    let app_state = Arc::new(RwLock::new(AppState::new(
        &app_config.farm.name,
        source.source_name(),
        app_config.feed.poll_interval_secs,
    )));
    let refresh = Arc::new(Notify::new());

    let state = DashboardState::new(
        Arc::clone(&app_state),
        Arc::clone(&source),
        Arc::clone(&refresh),
        app_config,
    );
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind HTTP server to {server_addr}"))?;
    info!(addr = %server_addr, "HTTP API listening");

    let mut tasks: JoinSet<Result<TaskName>> = JoinSet::new();
    spawn_http_server(&mut tasks, listener, app, cancel_token.clone());

    let poll_cancel = cancel_token.clone();
    tasks.spawn(async move {
        let polls = run_feed_poller(source, app_state, interval, refresh, poll_cancel).await;
        info!(task = %TaskName::FeedPoller, polls, "Poller finished");
        Ok(TaskName::FeedPoller)
    });

    run_supervisor(&mut tasks, cancel_token).await
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Read before logging starts so RUST_LOG may come from .env
    let dotenv = dotenvy::dotenv();

    let args = CliArgs::parse();
    init_logging(args.json_logs);
    match dotenv {
        Ok(path) => debug!(path = %path.display(), "Loaded environment from .env"),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => warn!(error = %e, "Ignoring unreadable .env file"),
    }

    match args.command {
        Some(SubCommand::Score { reading, brief }) => run_score(reading.into(), brief),
        Some(SubCommand::CheckConfig {
            path,
            write_defaults,
        }) => run_check_config(path.or(args.config), write_defaults),
        Some(SubCommand::Fetch) => {
            let app_config = load_config(args.config.as_ref())?;
            run_fetch(&app_config, args.offline).await
        }
        Some(SubCommand::Serve) | None => {
            let app_config = load_config(args.config.as_ref())?;
            serve(app_config, args.addr, args.offline).await
        }
    }
}

async fn serve(app_config: AppConfig, addr: Option<String>, offline: bool) -> Result<()> {
    if app_config.feed.read_api_key.is_empty() && app_config.feed.enabled && !offline {
        warn!("No ThingSpeak read key configured; only public channels will respond");
    }

    let server_addr = addr.unwrap_or_else(|| app_config.server.addr.clone());
    info!(
        farm = %app_config.farm.name,
        poll_interval_secs = app_config.feed.poll_interval_secs,
        "Starting soilwatch"
    );

    // Graceful shutdown via Ctrl+C
    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, initiating shutdown");
        shutdown_token.cancel();
    });

    run_service(app_config, server_addr, offline, cancel_token).await?;

    info!("soilwatch shutdown complete");
    Ok(())
}
