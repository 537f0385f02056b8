//! Market-share deviation against a historical baseline ("migration radar").

use crate::models::AggregationRecord;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// Minimum share gain (absolute, 0..1) for a route to count as a surge.
pub const SURGE_THRESHOLD: f64 = 0.05;

/// Most anomalies reported per call.
pub const MAX_ANOMALIES: usize = 5;

/// Display label for a route with no target region.
pub const LOCAL_TARGET: &str = "Local";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyRoute {
    pub source: String,
    pub target: String,
    pub current_share: f64,
    pub baseline_share: f64,
    pub deviation: f64,
}

/// Compare current route shares against historical shares and return the
/// strongest surges, largest first, at most [`MAX_ANOMALIES`].
///
/// Historical records with the same route are summed (multi-year data).
/// Current records are taken one by one without merging.
pub fn detect_migration_anomalies(
    current: &[AggregationRecord],
    historical: &[AggregationRecord],
) -> Vec<AnomalyRoute> {
    // Widened so counts near u64::MAX cannot overflow the totals.
    let total_current: u128 = current.iter().map(|r| u128::from(r.flight_count)).sum();
    let total_historical: u128 = historical.iter().map(|r| u128::from(r.flight_count)).sum();
    debug!(%total_current, %total_historical, "migration radar totals");
    if total_current == 0 || total_historical == 0 {
        return vec![];
    }

    let baseline = historical_shares(historical, total_historical);

    let mut anomalies: Vec<AnomalyRoute> = current
        .iter()
        .map(|r| {
            let current_share = r.flight_count as f64 / total_current as f64;
            let baseline_share = baseline.get(&r.route_key()).copied().unwrap_or(0.0);
            AnomalyRoute {
                source: r.source_region.clone(),
                target: r
                    .target_region
                    .clone()
                    .unwrap_or_else(|| LOCAL_TARGET.to_string()),
                current_share,
                baseline_share,
                deviation: current_share - baseline_share,
            }
        })
        .filter(|a| a.deviation > SURGE_THRESHOLD)
        .collect();

    // sort_by is stable: equal deviations keep input order.
    anomalies.sort_by(|a, b| {
        b.deviation
            .partial_cmp(&a.deviation)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    anomalies.truncate(MAX_ANOMALIES);

    info!(anomalies = anomalies.len(), "migration radar computed");
    anomalies
}

fn historical_shares(
    historical: &[AggregationRecord],
    total: u128,
) -> HashMap<(&str, &str), f64> {
    let mut counts: HashMap<(&str, &str), u128> = HashMap::new();
    for r in historical {
        *counts.entry(r.route_key()).or_default() += u128::from(r.flight_count);
    }
    counts
        .into_iter()
        .map(|(key, count)| (key, count as f64 / total as f64))
        .collect()
}
