//! Air-traffic mobility analytics: region flow matrix and migration radar.
//! Pure functions over aggregation snapshots; no I/O, no state between calls.

mod anomaly;
pub mod config;
mod dashboard;
pub mod error;
pub mod logging;
mod matrix;
mod models;

pub use anomaly::{
    detect_migration_anomalies, AnomalyRoute, LOCAL_TARGET, MAX_ANOMALIES, SURGE_THRESHOLD,
};
pub use dashboard::{Dashboard, DashboardView, FlightRow, StreamingAction, SyncFrame};
pub use matrix::{build_region_matrix, RegionMatrix};
pub use models::{
    AggregationRecord, Envelope, FilesAvailable, Flight, Insights, SystemStatus, UNKNOWN_REGION,
};
