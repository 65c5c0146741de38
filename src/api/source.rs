//! Data source abstraction and response envelopes.
//!
//! The [`DataSource`] trait is the seam between the loader and the backend:
//! the HTTP implementation talks to the dashboard API, tests plug in an
//! in-memory source.

use crate::domain::{CountyRecord, DashboardError, Result, Summary};
use crate::map::CountyBoundaries;
use serde::Deserialize;

/// Source of every dataset the dashboard loads.
///
/// Implementations must be shareable across loader threads.
pub trait DataSource: Send + Sync {
    /// Headline statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be reached or the payload is malformed.
    fn fetch_summary(&self) -> Result<Summary>;

    /// Merged EJI + AQI records.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be reached or the payload is malformed.
    fn fetch_counties(&self) -> Result<Vec<CountyRecord>>;

    /// Every county with EJI data.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be reached or the payload is malformed.
    fn fetch_eji_counties(&self) -> Result<Vec<CountyRecord>>;

    /// Hotspot counties, most severe first.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be reached or the payload is malformed.
    fn fetch_hotspots(&self) -> Result<Vec<CountyRecord>>;

    /// County boundary collection at `url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be fetched or parsed.
    fn fetch_boundaries(&self, url: &str) -> Result<CountyBoundaries>;
}

/// `{"success": true, "count": n, "data": [...]}`
#[derive(Debug, Deserialize)]
struct DataEnvelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    count: Option<usize>,
    data: Vec<CountyRecord>,
}

/// `{"success": true, "count": n, "hotspots": [...]}`
#[derive(Debug, Deserialize)]
struct HotspotEnvelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    count: Option<usize>,
    hotspots: Vec<CountyRecord>,
}

fn check_envelope(endpoint: &str, success: Option<bool>, count: Option<usize>, received: usize) -> Result<()> {
    if success == Some(false) {
        return Err(DashboardError::Decode(format!("{endpoint}: backend reported failure")));
    }
    if let Some(count) = count.filter(|&count| count != received) {
        tracing::warn!(endpoint, count, received, "envelope count does not match payload");
    }
    Ok(())
}

/// Decodes a `{data: [...]}` envelope.
///
/// # Errors
///
/// Returns `DashboardError::Decode` if the body does not match the envelope or
/// the backend flagged the response as unsuccessful.
pub fn decode_records(endpoint: &str, body: &[u8]) -> Result<Vec<CountyRecord>> {
    let envelope: DataEnvelope =
        serde_json::from_slice(body).map_err(|e| DashboardError::Decode(format!("{endpoint}: {e}")))?;
    check_envelope(endpoint, envelope.success, envelope.count, envelope.data.len())?;
    Ok(envelope.data)
}

/// Decodes a `{hotspots: [...]}` envelope.
///
/// # Errors
///
/// Returns `DashboardError::Decode` if the body does not match the envelope or
/// the backend flagged the response as unsuccessful.
pub fn decode_hotspots(endpoint: &str, body: &[u8]) -> Result<Vec<CountyRecord>> {
    let envelope: HotspotEnvelope =
        serde_json::from_slice(body).map_err(|e| DashboardError::Decode(format!("{endpoint}: {e}")))?;
    check_envelope(endpoint, envelope.success, envelope.count, envelope.hotspots.len())?;
    Ok(envelope.hotspots)
}

/// Decodes the bare summary object.
///
/// # Errors
///
/// Returns `DashboardError::Decode` if the body is not a summary.
pub fn decode_summary(endpoint: &str, body: &[u8]) -> Result<Summary> {
    serde_json::from_slice(body).map_err(|e| DashboardError::Decode(format!("{endpoint}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_data_envelope_with_nulls() {
        let body = br#"{
            "success": true,
            "count": 2,
            "data": [
                {"StateDesc": "Ohio", "COUNTY": "Lake", "FIPS": "39085", "RPL_EJI": 0.41,
                 "Median AQI": 44, "Good Days": 250, "Days with AQI": 0, "E_TOTPOP": 232603.0},
                {"StateDesc": "Texas", "COUNTY": "Loving", "RPL_EJI": null, "Median AQI": null}
            ]
        }"#;
        let records = decode_records("/api/data", body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].median_aqi, Some(44.0));
        assert_eq!(records[0].population, Some(232_603));
        assert_eq!(records[0].total_days(), 365);
        assert_eq!(records[1].eji_percentile, None);
        assert_eq!(records[1].display_median_aqi(), "N/A");
    }

    #[test]
    fn count_mismatch_is_tolerated() {
        let body = br#"{"success": true, "count": 5, "data": []}"#;
        assert!(decode_records("/api/data", body).unwrap().is_empty());
    }

    #[test]
    fn unsuccessful_envelope_is_an_error() {
        let body = br#"{"success": false, "data": []}"#;
        assert!(matches!(decode_records("/api/data", body), Err(DashboardError::Decode(_))));
    }

    #[test]
    fn hotspots_use_their_own_key() {
        let body = br#"{"success": true, "count": 1, "hotspots": [{"StateDesc": "A", "COUNTY": "B"}]}"#;
        assert_eq!(decode_hotspots("/api/hotspots", body).unwrap().len(), 1);
        assert!(decode_records("/api/hotspots", body).is_err());
    }

    #[test]
    fn summary_decodes_from_bare_object() {
        let body = br#"{"total_counties": 3143, "avg_eji": 0.5, "avg_median_aqi": 38.6,
                        "high_eji_counties": 629, "poor_air_quality_counties": 12, "high_risk_counties": 7}"#;
        let summary = decode_summary("/api/summary", body).unwrap();
        assert_eq!(summary.display_total(), "3,143");
        assert_eq!(summary.display_avg_eji(), "50.0%");
        assert_eq!(summary.high_eji_counties, Some(629));
    }
}
