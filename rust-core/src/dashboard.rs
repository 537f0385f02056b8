//! Dashboard snapshot state and refresh-cycle policy.
//!
//! Lifecycle: `load_history` once at startup, then `apply_sync` on every
//! refresh tick. `view` recomputes everything derived from the current
//! snapshot; nothing derived is cached between calls.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::anomaly::{detect_migration_anomalies, AnomalyRoute};
use crate::error::{FetchError, SyncError};
use crate::matrix::{build_region_matrix, RegionMatrix};
use crate::models::{AggregationRecord, Flight, Insights, SystemStatus};

/// Results of the four concurrent fetches of one refresh cycle.
#[derive(Debug, Clone)]
pub struct SyncFrame {
    pub status: Result<SystemStatus, FetchError>,
    pub streaming: Result<Vec<AggregationRecord>, FetchError>,
    pub realtime: Result<Vec<Flight>, FetchError>,
    pub insights: Result<Insights, FetchError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamingAction {
    Start,
    Stop,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlightRow {
    pub callsign: String,
    pub source_region: String,
    /// `HH:MM:SS`, or `-` when the timestamp cannot be parsed.
    pub time: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub streaming_active: bool,
    pub streaming_action: StreamingAction,
    pub flights: Vec<FlightRow>,
    pub matrix: RegionMatrix,
    pub anomalies: Vec<AnomalyRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insights: Option<Insights>,
}

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    status: Option<SystemStatus>,
    flights: Vec<Flight>,
    streaming: Vec<AggregationRecord>,
    history: Vec<AggregationRecord>,
    insights: Option<Insights>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// One-time historical baseline load. A failure leaves the baseline
    /// empty, which silences the radar rather than failing the dashboard.
    pub fn load_history(&mut self, history: Result<Vec<AggregationRecord>, FetchError>) {
        match history {
            Ok(records) => {
                info!(records = records.len(), "historical baseline loaded");
                self.history = records;
            }
            Err(e) => warn!(error = %e, "failed to load historical baseline"),
        }
    }

    /// Apply one refresh cycle. Status, streaming and realtime are all
    /// required; on any of them failing nothing is updated. Insights may
    /// fail alone, in which case the previous insights are kept.
    pub fn apply_sync(&mut self, frame: SyncFrame) -> Result<(), SyncError> {
        let status = frame.status?;
        let streaming = frame.streaming?;
        let realtime = frame.realtime?;

        self.status = Some(status);
        self.streaming = streaming;
        self.flights = realtime;
        match frame.insights {
            Ok(insights) => self.insights = Some(insights),
            Err(e) => warn!(error = %e, "insights unavailable, keeping previous"),
        }

        info!(
            flights = self.flights.len(),
            aggregates = self.streaming.len(),
            "dashboard synced"
        );
        Ok(())
    }

    pub fn streaming_active(&self) -> bool {
        self.status.as_ref().is_some_and(|s| s.streaming_active)
    }

    /// What the streaming toggle should ask the backend to do next.
    pub fn streaming_action(&self) -> StreamingAction {
        if self.streaming_active() {
            StreamingAction::Stop
        } else {
            StreamingAction::Start
        }
    }

    pub fn view(&self) -> DashboardView {
        let flights = self
            .flights
            .iter()
            .map(|f| FlightRow {
                callsign: f.callsign.clone(),
                source_region: f.source_region.clone(),
                time: f
                    .time_of_day()
                    .map(|t| t.format("%H:%M:%S").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            })
            .collect();

        DashboardView {
            streaming_active: self.streaming_active(),
            streaming_action: self.streaming_action(),
            flights,
            matrix: build_region_matrix(&self.streaming),
            anomalies: detect_migration_anomalies(&self.streaming, &self.history),
            insights: self.insights.clone(),
        }
    }
}
