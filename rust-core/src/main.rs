//! CLI: stdin JSON -> stdout JSON.
//!
//! Usage:
//!   curl -s $API/api/streaming | airmobility matrix
//!   echo '{"current":[...], "historical":[...]}' | airmobility radar
//!   echo '{"history":{"data":[...]}, "status":{...}, ...}' | airmobility dashboard
use airmobility_core::config::{CliOverrides, Config};
use airmobility_core::error::FetchError;
use airmobility_core::logging::init_tracing;
use airmobility_core::{
    build_region_matrix, detect_migration_anomalies, AggregationRecord, AnomalyRoute, Dashboard,
    Envelope, Flight, Insights, SyncFrame, SystemStatus,
};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use tracing::{debug, error};

#[derive(Debug, Parser)]
#[command(name = "airmobility", version, about = "Air-traffic mobility analytics")]
struct Cli {
    /// TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Log filter, e.g. `airmobility=debug`
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Region-to-region heatmap matrix from `{"data": [...]}`
    Matrix,
    /// Top migration anomalies from `{"current": [...], "historical": [...]}`
    Radar,
    /// Full dashboard view from one refresh cycle's worth of backend responses
    Dashboard,
}

// --- Radar structs ---

#[derive(Debug, Deserialize)]
struct RadarInput {
    current: Vec<AggregationRecord>,
    historical: Vec<AggregationRecord>,
}

#[derive(Debug, Serialize)]
struct RadarOutput {
    anomalies: Vec<AnomalyRoute>,
}

// --- Dashboard structs ---

/// A missing field means that fetch failed this cycle.
#[derive(Debug, Deserialize)]
struct DashboardInput {
    history: Option<Envelope<AggregationRecord>>,
    status: Option<SystemStatus>,
    streaming: Option<Envelope<AggregationRecord>>,
    realtime: Option<Envelope<Flight>>,
    insights: Option<Insights>,
}

fn required<T>(value: Option<T>, source_name: &'static str) -> Result<T, FetchError> {
    value.ok_or(FetchError::Missing { source_name })
}

impl DashboardInput {
    /// Split into the one-time history load and one refresh cycle.
    fn into_parts(self) -> (Result<Vec<AggregationRecord>, FetchError>, SyncFrame) {
        let history = required(self.history, "history").map(|e| e.data);
        let frame = SyncFrame {
            status: required(self.status, "status"),
            streaming: required(self.streaming, "streaming").map(|e| e.data),
            realtime: required(self.realtime, "realtime").map(|e| e.data),
            insights: required(self.insights, "insights"),
        };
        (history, frame)
    }
}

fn write_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(io::stdout(), value)
    } else {
        serde_json::to_writer(io::stdout(), value)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let overrides = CliOverrides {
        pretty: cli.pretty,
        log_level: cli.log_level.clone(),
    };
    let config = Config::load(cli.config.as_deref(), &overrides)?;
    init_tracing(config.log_filter());
    debug!(?config, "configuration resolved");

    match cli.command {
        Command::Matrix => {
            let input: Envelope<AggregationRecord> = serde_json::from_reader(io::stdin())?;
            write_json(&build_region_matrix(&input.data), config.pretty())?;
        }
        Command::Radar => {
            let input: RadarInput = serde_json::from_reader(io::stdin())?;
            let anomalies = detect_migration_anomalies(&input.current, &input.historical);
            write_json(&RadarOutput { anomalies }, config.pretty())?;
        }
        Command::Dashboard => {
            let input: DashboardInput = serde_json::from_reader(io::stdin())?;
            let (history, frame) = input.into_parts();
            let mut dashboard = Dashboard::new();
            dashboard.load_history(history);
            if let Err(e) = dashboard.apply_sync(frame) {
                error!(error = %e, "dashboard refresh failed");
                return Err(e.into());
            }
            write_json(&dashboard.view(), config.pretty())?;
        }
    }
    Ok(())
}
