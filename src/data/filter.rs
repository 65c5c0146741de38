//! Threshold filtering over county records.
//!
//! The two dashboard sliders constrain the EJI percentile and the median AQI.
//! Filtering is a pure function of its inputs: callers own any follow-up such
//! as resetting the current page.

use crate::domain::CountyRecord;
use serde::{Deserialize, Serialize};

/// Slider positions for the two threshold filters.
///
/// The EJI slider runs 0-100 and is compared against the percentile as a
/// fraction; the AQI threshold is a raw median AQI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Thresholds {
    /// EJI slider position (0-100).
    pub eji_slider: u8,
    /// Minimum median AQI.
    pub aqi: u32,
}

impl Thresholds {
    pub const EJI_STEP: i32 = 5;
    pub const AQI_STEP: i32 = 5;
    pub const EJI_MAX: u8 = 100;
    pub const AQI_MAX: u32 = 500;

    #[must_use]
    pub const fn new(eji_slider: u8, aqi: u32) -> Self {
        Self { eji_slider, aqi }
    }

    /// EJI threshold as a fraction in `[0, 1]`.
    #[must_use]
    pub fn eji_fraction(&self) -> f64 {
        f64::from(self.eji_slider) / 100.0
    }

    #[must_use]
    pub fn aqi_value(&self) -> f64 {
        f64::from(self.aqi)
    }

    /// Moves the EJI slider by `delta`, clamped to 0-100.
    ///
    /// Returns `true` if the position changed.
    pub fn adjust_eji(&mut self, delta: i32) -> bool {
        let next = (i32::from(self.eji_slider) + delta).clamp(0, i32::from(Self::EJI_MAX));
        let next = u8::try_from(next).unwrap_or(Self::EJI_MAX);
        let changed = next != self.eji_slider;
        self.eji_slider = next;
        changed
    }

    /// Moves the AQI threshold by `delta`, clamped to 0-500.
    ///
    /// Returns `true` if the value changed.
    pub fn adjust_aqi(&mut self, delta: i32) -> bool {
        let max = i64::from(Self::AQI_MAX);
        let next = (i64::from(self.aqi) + i64::from(delta)).clamp(0, max);
        let next = u32::try_from(next).unwrap_or(Self::AQI_MAX);
        let changed = next != self.aqi;
        self.aqi = next;
        changed
    }
}

/// Returns `true` if the record satisfies both thresholds.
///
/// A record missing either constrained value never passes.
#[must_use]
pub fn passes(record: &CountyRecord, eji_threshold: f64, aqi_threshold: f64) -> bool {
    let eji_ok = record.eji_percentile.is_some_and(|eji| eji >= eji_threshold);
    let aqi_ok = record.median_aqi.is_some_and(|aqi| aqi >= aqi_threshold);
    eji_ok && aqi_ok
}

/// Keeps records with `eji_percentile >= eji_threshold` and
/// `median_aqi >= aqi_threshold`, preserving source order.
///
/// # Parameters
///
/// * `source` - Records to filter
/// * `eji_threshold` - Minimum EJI percentile as a fraction
/// * `aqi_threshold` - Minimum median AQI
#[must_use]
pub fn apply_filters(source: &[CountyRecord], eji_threshold: f64, aqi_threshold: f64) -> Vec<CountyRecord> {
    let _span = tracing::debug_span!(
        "apply_filters",
        source_len = source.len(),
        eji_threshold,
        aqi_threshold
    )
    .entered();

    let filtered: Vec<CountyRecord> = source
        .iter()
        .filter(|record| passes(record, eji_threshold, aqi_threshold))
        .cloned()
        .collect();

    tracing::debug!(filtered_count = filtered.len(), "threshold filter applied");
    filtered
}

/// EJI-only variant used for the EJI map: the AQI threshold does not apply.
#[must_use]
pub fn apply_eji_filter(source: &[CountyRecord], eji_threshold: f64) -> Vec<CountyRecord> {
    source
        .iter()
        .filter(|record| record.eji_percentile.is_some_and(|eji| eji >= eji_threshold))
        .cloned()
        .collect()
}
