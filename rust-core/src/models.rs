use chrono::{DateTime, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Label used for an absent target region when grouping routes.
pub const UNKNOWN_REGION: &str = "Unknown";

fn deserialize_opt_region<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(d)?;
    Ok(opt.filter(|s| !s.is_empty()))
}

/// Pre-summarized flight count between two regions over some time window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationRecord {
    pub source_region: String,
    #[serde(default, deserialize_with = "deserialize_opt_region")]
    pub target_region: Option<String>,
    pub flight_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_window: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

impl AggregationRecord {
    pub fn new(source: &str, target: Option<&str>, flight_count: u64) -> Self {
        Self {
            source_region: source.to_string(),
            target_region: target.filter(|t| !t.is_empty()).map(str::to_string),
            flight_count,
            time_window: None,
            year: None,
        }
    }

    /// Target region, or `"Unknown"` when absent.
    pub fn normalized_target(&self) -> &str {
        self.target_region.as_deref().unwrap_or(UNKNOWN_REGION)
    }

    /// `(source, normalized target)` grouping key.
    pub fn route_key(&self) -> (&str, &str) {
        (self.source_region.as_str(), self.normalized_target())
    }
}

/// The `{ "data": [...] }` wrapper every collection endpoint returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub callsign: String,
    pub source_region: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icao24: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Flight {
    /// Wall-clock time of the observation. Accepts RFC 3339 or a naive ISO
    /// timestamp with optional fractional seconds.
    pub fn time_of_day(&self) -> Option<NaiveTime> {
        let ts = self.timestamp.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
            return Some(dt.time());
        }
        NaiveDateTime::parse_from_str(ts, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
            .map(|dt| dt.time())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesAvailable {
    pub batch_regions: bool,
    pub batch_countries: bool,
    pub streaming_data: bool,
    pub insights: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemStatus {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    pub streaming_active: bool,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_interval: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_available: Option<FilesAvailable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insights {
    pub timestamp: String,
    #[serde(default)]
    pub data_sources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming_batches: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_flight_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_records: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_pairs_analyzed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_flights_processed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_and_empty_target_normalize_to_unknown() {
        let json = r#"{"data":[
            {"source_region":"EU","target_region":null,"flight_count":3},
            {"source_region":"EU","target_region":"","flight_count":4},
            {"source_region":"EU","flight_count":5,"year":"2023"}
        ]}"#;
        let env: Envelope<AggregationRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(env.data.len(), 3);
        for r in &env.data {
            assert_eq!(r.target_region, None);
            assert_eq!(r.route_key(), ("EU", "Unknown"));
        }
        assert_eq!(env.data[2].year.as_deref(), Some("2023"));
    }

    #[test]
    fn test_negative_flight_count_rejected() {
        let json = r#"{"source_region":"EU","target_region":"AS","flight_count":-1}"#;
        assert!(serde_json::from_str::<AggregationRecord>(json).is_err());
    }

    #[test]
    fn test_flight_time_of_day() {
        let mut f = Flight {
            callsign: "DLH4AB".to_string(),
            source_region: "EU".to_string(),
            timestamp: "2024-03-01T14:05:09Z".to_string(),
            icao24: None,
            latitude: None,
            longitude: None,
        };
        assert_eq!(f.time_of_day(), NaiveTime::from_hms_opt(14, 5, 9));

        f.timestamp = "2024-03-01T08:00:30.250".to_string();
        let formatted = f.time_of_day().map(|t| t.format("%H:%M:%S").to_string());
        assert_eq!(formatted.as_deref(), Some("08:00:30"));

        f.timestamp = "not a time".to_string();
        assert_eq!(f.time_of_day(), None);
    }

    #[test]
    fn test_status_optional_fields() {
        let json = r#"{"status":"ok","streaming_active":true,"timestamp":"2024-03-01T00:00:00"}"#;
        let s: SystemStatus = serde_json::from_str(json).unwrap();
        assert!(s.streaming_active);
        assert!(s.files_available.is_none());
    }
}
