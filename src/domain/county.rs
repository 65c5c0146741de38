//! County record and summary domain models.
//!
//! [`CountyRecord`] is the strongly typed form of one row delivered by the
//! backend. Every statistic is optional: the backend emits `null` for values it
//! does not have, and the display helpers render those as [`MISSING`] rather
//! than a misleading zero.
//!
//! # Example
//!
//! ```rust
//! use ejiview::domain::CountyRecord;
//!
//! let json = r#"{"COUNTY": "Fresno", "StateDesc": "California", "RPL_EJI": 0.912, "Median AQI": 61}"#;
//! let record: CountyRecord = serde_json::from_str(json).unwrap();
//!
//! assert_eq!(record.display_eji(), "91.2%");
//! assert_eq!(record.display_max_aqi(), "N/A");
//! assert_eq!(record.total_days(), 365);
//! ```

use serde::{Deserialize, Deserializer, Serialize};

/// Marker shown for any value the backend did not provide.
pub const MISSING: &str = "N/A";

/// Number of monitored days assumed when `Days with AQI` is absent.
pub const DEFAULT_MONITORED_DAYS: u32 = 365;

/// One county as delivered by the backend API.
///
/// Field names on the wire follow the backend's column names; the Rust names
/// are descriptive. `county` and `state` are never absent: a `null` name is
/// read as an empty string so search and sort can treat every record alike.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CountyRecord {
    /// State name (`StateDesc`).
    #[serde(rename = "StateDesc", default, deserialize_with = "nullable_string")]
    pub state: String,

    /// County name (`COUNTY`).
    #[serde(rename = "COUNTY", default, deserialize_with = "nullable_string")]
    pub county: String,

    /// Total population (`E_TOTPOP`).
    #[serde(rename = "E_TOTPOP", default, deserialize_with = "nullable_count")]
    pub population: Option<u64>,

    /// Five-digit county FIPS code joining the record to its boundary.
    #[serde(rename = "FIPS", default)]
    pub fips: Option<String>,

    /// EJI summed ranking score (`SPL_EJI`).
    #[serde(rename = "SPL_EJI", default)]
    pub eji_score: Option<f64>,

    /// EJI percentile rank in `[0, 1]` (`RPL_EJI`).
    #[serde(rename = "RPL_EJI", default)]
    pub eji_percentile: Option<f64>,

    /// Social vulnerability module score (`SPL_SVM`).
    #[serde(rename = "SPL_SVM", default)]
    pub social_vulnerability: Option<f64>,

    /// Environmental burden module score (`SPL_EBM`).
    #[serde(rename = "SPL_EBM", default)]
    pub environmental_burden: Option<f64>,

    /// Share of residents identifying as a racial or ethnic minority, in percent.
    #[serde(rename = "PCT_MINRTY", default)]
    pub pct_minority: Option<f64>,

    /// Share of residents below 200% of the poverty line, in percent.
    #[serde(rename = "PCT_POV200", default)]
    pub pct_poverty_200: Option<f64>,

    #[serde(rename = "Median AQI", default)]
    pub median_aqi: Option<f64>,

    #[serde(rename = "Max AQI", default)]
    pub max_aqi: Option<f64>,

    #[serde(rename = "90th Percentile AQI", default)]
    pub p90_aqi: Option<f64>,

    #[serde(rename = "Good Days", default, deserialize_with = "nullable_count")]
    pub good_days: Option<u64>,

    #[serde(rename = "Moderate Days", default, deserialize_with = "nullable_count")]
    pub moderate_days: Option<u64>,

    #[serde(
        rename = "Unhealthy for Sensitive Groups Days",
        default,
        deserialize_with = "nullable_count"
    )]
    pub unhealthy_sensitive_days: Option<u64>,

    #[serde(rename = "Unhealthy Days", default, deserialize_with = "nullable_count")]
    pub unhealthy_days: Option<u64>,

    /// Days with an AQI reading (`Days with AQI`).
    #[serde(rename = "Days with AQI", default, deserialize_with = "nullable_count")]
    pub days_with_aqi: Option<u64>,
}

impl CountyRecord {
    /// EJI percentile scaled to 0-100.
    #[must_use]
    pub fn eji_percent(&self) -> Option<f64> {
        self.eji_percentile.map(|eji| eji * 100.0)
    }

    /// Days with an AQI reading, defaulting to a full year when unknown.
    ///
    /// A reported zero is treated the same as a missing value.
    #[must_use]
    pub fn total_days(&self) -> u32 {
        self.days_with_aqi
            .filter(|&days| days > 0)
            .and_then(|days| u32::try_from(days).ok())
            .unwrap_or(DEFAULT_MONITORED_DAYS)
    }

    /// `"County, State"` label used in hover text and status lines.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}, {}", self.county, self.state)
    }

    #[must_use]
    pub fn display_eji(&self) -> String {
        self.eji_percent()
            .map_or_else(|| MISSING.to_string(), |pct| format!("{:.1}%", round1(pct)))
    }

    #[must_use]
    pub fn display_median_aqi(&self) -> String {
        display_optional(self.median_aqi)
    }

    #[must_use]
    pub fn display_max_aqi(&self) -> String {
        display_optional(self.max_aqi)
    }

    #[must_use]
    pub fn display_good_days(&self) -> String {
        self.good_days
            .map_or_else(|| MISSING.to_string(), |days| days.to_string())
    }

    /// `"good / total"` with the monitored-days default applied.
    #[must_use]
    pub fn display_good_days_ratio(&self) -> String {
        format!("{} / {}", self.display_good_days(), self.total_days())
    }

    #[must_use]
    pub fn display_population(&self) -> String {
        self.population
            .map_or_else(|| MISSING.to_string(), format_thousands)
    }

    #[must_use]
    pub fn display_minority(&self) -> String {
        self.pct_minority
            .map_or_else(|| MISSING.to_string(), |pct| format!("{:.1}%", round1(pct)))
    }

    #[must_use]
    pub fn display_poverty(&self) -> String {
        self.pct_poverty_200
            .map_or_else(|| MISSING.to_string(), |pct| format!("{:.1}%", round1(pct)))
    }
}

/// Headline statistics returned by `/api/summary`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_counties: u64,
    /// Mean EJI percentile in `[0, 1]`.
    pub avg_eji: f64,
    pub avg_median_aqi: f64,
    #[serde(default)]
    pub high_eji_counties: Option<u64>,
    #[serde(default)]
    pub poor_air_quality_counties: Option<u64>,
    pub high_risk_counties: u64,
}

impl Summary {
    #[must_use]
    pub fn display_total(&self) -> String {
        format_thousands(self.total_counties)
    }

    #[must_use]
    pub fn display_avg_eji(&self) -> String {
        format!("{:.1}%", round1(self.avg_eji * 100.0))
    }

    #[must_use]
    pub fn display_avg_aqi(&self) -> String {
        format!("{:.0}", self.avg_median_aqi.round())
    }

    #[must_use]
    pub fn display_high_risk(&self) -> String {
        format_thousands(self.high_risk_counties)
    }
}

/// Formats an integer with comma thousands separators (`1234567` → `"1,234,567"`).
#[must_use]
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Formats a number the way a plain numeric cell shows it: integral values
/// without a fractional part, everything else as-is.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        #[allow(clippy::cast_possible_truncation)]
        let integral = value as i64;
        integral.to_string()
    } else {
        value.to_string()
    }
}

/// Rounds to one decimal place.
#[must_use]
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn display_optional(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), format_number)
}

fn nullable_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Reads a count that may arrive as an integer, a float (`12.0`) or `null`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn nullable_count<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v.round() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_backend_row_with_nulls() {
        let json = r#"{
            "StateDesc": "Texas", "COUNTY": "Harris", "E_TOTPOP": 4731145.0,
            "FIPS": "48201", "RPL_EJI": 0.9541, "PCT_MINRTY": 71.23,
            "Median AQI": 58, "Max AQI": null, "Good Days": 120,
            "Days with AQI": 0
        }"#;
        let record: CountyRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.county, "Harris");
        assert_eq!(record.population, Some(4_731_145));
        assert_eq!(record.fips.as_deref(), Some("48201"));
        assert_eq!(record.max_aqi, None);
        assert_eq!(record.display_max_aqi(), MISSING);
        assert_eq!(record.display_median_aqi(), "58");
        assert_eq!(record.display_eji(), "95.4%");
        assert_eq!(record.display_population(), "4,731,145");
        assert_eq!(record.display_good_days_ratio(), "120 / 365");
    }

    #[test]
    fn null_names_become_empty_strings() {
        let record: CountyRecord =
            serde_json::from_str(r#"{"StateDesc": null, "COUNTY": null}"#).unwrap();
        assert_eq!(record.state, "");
        assert_eq!(record.county, "");
    }

    #[test]
    fn monitored_days_default_only_when_unknown() {
        let mut record = CountyRecord::default();
        assert_eq!(record.total_days(), DEFAULT_MONITORED_DAYS);
        record.days_with_aqi = Some(182);
        assert_eq!(record.total_days(), 182);
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(3_143), "3,143");
        assert_eq!(format_thousands(12_345_678), "12,345,678");
    }

    #[test]
    fn numbers_drop_integral_fraction() {
        assert_eq!(format_number(45.0), "45");
        assert_eq!(format_number(45.5), "45.5");
        assert_eq!(round1(63.449), 63.4);
        assert_eq!(round1(95.46), 95.5);
    }

    #[test]
    fn percentages_round_ties_up() {
        let record = CountyRecord {
            eji_percentile: Some(0.0625),
            pct_minority: Some(12.25),
            pct_poverty_200: Some(31.25),
            ..CountyRecord::default()
        };
        assert_eq!(record.display_eji(), "6.3%");
        assert_eq!(record.display_minority(), "12.3%");
        assert_eq!(record.display_poverty(), "31.3%");
        assert_eq!(CountyRecord::default().display_poverty(), MISSING);
    }

    #[test]
    fn summary_averages_round_ties_up() {
        let summary = Summary {
            total_counties: 2,
            avg_eji: 0.0625,
            avg_median_aqi: 38.5,
            high_eji_counties: None,
            poor_air_quality_counties: None,
            high_risk_counties: 0,
        };
        assert_eq!(summary.display_avg_aqi(), "39");
        assert_eq!(summary.display_avg_eji(), "6.3%");
        assert_eq!(Summary { avg_median_aqi: 40.5, ..summary }.display_avg_aqi(), "41");
    }

    #[test]
    fn summary_formatting() {
        let summary: Summary = serde_json::from_str(
            r#"{"total_counties": 3143, "avg_eji": 0.5012, "avg_median_aqi": 38.6,
                "high_risk_counties": 1204}"#,
        )
        .unwrap();

        assert_eq!(summary.display_total(), "3,143");
        assert_eq!(summary.display_avg_eji(), "50.1%");
        assert_eq!(summary.display_avg_aqi(), "39");
        assert_eq!(summary.display_high_risk(), "1,204");
        assert_eq!(summary.high_eji_counties, None);
    }
}
