//! Origin x destination flow matrix for the regional heatmap.

use crate::models::AggregationRecord;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Dense region-to-region count matrix. Rows are origins, columns are
/// destinations, both in the same sorted region order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegionMatrix {
    regions: Vec<String>,
    cells: Vec<Vec<u64>>,
    max_count: u64,
}

impl RegionMatrix {
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn rows(&self) -> &[Vec<u64>] {
        &self.cells
    }

    pub fn max_count(&self) -> u64 {
        self.max_count
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Count for `source -> target`, 0 when the pair never appeared.
    pub fn cell(&self, source: &str, target: &str) -> u64 {
        match (self.index_of(source), self.index_of(target)) {
            (Some(i), Some(j)) => self.cells[i][j],
            _ => 0,
        }
    }

    /// Cell count relative to the busiest cell, in [0, 1].
    pub fn intensity(&self, source: &str, target: &str) -> f64 {
        if self.max_count == 0 {
            return 0.0;
        }
        self.cell(source, target) as f64 / self.max_count as f64
    }

    fn index_of(&self, region: &str) -> Option<usize> {
        self.regions.binary_search_by(|r| r.as_str().cmp(region)).ok()
    }
}

/// Build the heatmap matrix from one aggregation snapshot.
///
/// Duplicate `(source, target)` records overwrite each other: the last one
/// seen is the cell value. This differs on purpose from
/// [`crate::detect_migration_anomalies`], which sums duplicates for its
/// historical baseline.
pub fn build_region_matrix(records: &[AggregationRecord]) -> RegionMatrix {
    if records.is_empty() {
        return RegionMatrix::default();
    }

    let regions: Vec<String> = records
        .iter()
        .flat_map(|r| [r.source_region.as_str(), r.normalized_target()])
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut by_route: HashMap<(&str, &str), u64> = HashMap::with_capacity(records.len());
    for r in records {
        by_route.insert(r.route_key(), r.flight_count);
    }

    let max_count = by_route.values().copied().max().unwrap_or(0);
    let cells = regions
        .iter()
        .map(|source| {
            regions
                .iter()
                .map(|target| {
                    by_route
                        .get(&(source.as_str(), target.as_str()))
                        .copied()
                        .unwrap_or(0)
                })
                .collect()
        })
        .collect();

    debug!(
        records = records.len(),
        regions = regions.len(),
        routes = by_route.len(),
        max_count,
        "built region matrix"
    );

    RegionMatrix {
        regions,
        cells,
        max_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rec(source: &str, target: Option<&str>, count: u64) -> AggregationRecord {
        AggregationRecord::new(source, target, count)
    }

    #[test]
    fn test_empty_input() {
        let m = build_region_matrix(&[]);
        assert!(m.is_empty());
        assert!(m.regions().is_empty());
        assert!(m.rows().is_empty());
        assert_eq!(m.max_count(), 0);
        assert_eq!(m.cell("EU", "AS"), 0);
        assert_eq!(m.intensity("EU", "AS"), 0.0);
    }

    #[test]
    fn test_regions_sorted_and_unknown_target() {
        let records = vec![
            rec("NA", Some("EU"), 12),
            rec("EU", None, 4),
            rec("AS", Some("EU"), 7),
            rec("NA", Some("EU"), 12),
        ];
        let m = build_region_matrix(&records);
        assert_eq!(m.regions(), ["AS", "EU", "NA", "Unknown"]);
        assert_eq!(m.cell("EU", "Unknown"), 4);
        assert_eq!(m.cell("AS", "EU"), 7);
        assert_eq!(m.cell("EU", "AS"), 0);
        assert_eq!(m.cell("Mars", "EU"), 0);
        assert_eq!(m.max_count(), 12);
        assert_eq!(m.rows()[2][1], 12);
    }

    #[test]
    fn test_duplicate_pair_last_write_wins() {
        // Not summed: the heatmap shows the latest count for a pair.
        let m = build_region_matrix(&[rec("EU", Some("AS"), 10), rec("EU", Some("AS"), 3)]);
        assert_eq!(m.cell("EU", "AS"), 3);
        assert_eq!(m.max_count(), 3);
    }

    #[test]
    fn test_intensity_relative_to_max() {
        let m = build_region_matrix(&[rec("EU", Some("AS"), 50), rec("AS", Some("EU"), 100)]);
        assert_eq!(m.intensity("AS", "EU"), 1.0);
        assert_eq!(m.intensity("EU", "AS"), 0.5);
        assert_eq!(m.intensity("EU", "EU"), 0.0);
    }

    #[test]
    fn test_zero_counts_do_not_produce_nan() {
        let m = build_region_matrix(&[rec("EU", Some("AS"), 0)]);
        assert_eq!(m.regions().len(), 2);
        assert_eq!(m.max_count(), 0);
        assert_eq!(m.intensity("EU", "AS"), 0.0);
    }

    fn arb_records() -> impl Strategy<Value = Vec<AggregationRecord>> {
        let region = prop::sample::select(vec!["AF", "AS", "EU", "NA", "OC", "SA"]);
        let target = prop::option::of(region.clone());
        prop::collection::vec((region, target, 0u64..1_000), 0..40).prop_map(|v| {
            v.into_iter()
                .map(|(s, t, c)| AggregationRecord::new(s, t, c))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn regions_strictly_ascending(records in arb_records()) {
            let m = build_region_matrix(&records);
            prop_assert!(m.regions().windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(m.rows().len(), m.regions().len());
        }

        #[test]
        fn region_order_independent_of_input_order(records in arb_records()) {
            let mut reversed = records.clone();
            reversed.reverse();
            let a = build_region_matrix(&records);
            let b = build_region_matrix(&reversed);
            prop_assert_eq!(a.regions(), b.regions());
        }

        #[test]
        fn max_count_is_largest_cell(records in arb_records()) {
            let m = build_region_matrix(&records);
            let largest = m.rows().iter().flatten().copied().max().unwrap_or(0);
            prop_assert_eq!(m.max_count(), largest);
        }
    }
}
