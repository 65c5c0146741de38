//! Map modes and their layer configuration.
//!
//! Every [`MapMode`] variant has its own handler that picks the records to
//! plot, computes one value per record, and supplies the colour scale, title
//! and legend text. The handlers are self-contained: nothing about a mode is
//! decided outside this file.
//!
//! | Mode | Records | Value | Colour scale |
//! |------|---------|-------|--------------|
//! | EJI | `ejiOnly` filtered by the EJI threshold | EJI percentile × 100 | yellow → red |
//! | AQI | threshold-filtered view | median AQI | green → red |
//! | Combined | threshold-filtered view | mean of EJI × 100 and AQI capped at 100 | `Reds` |

use crate::data::{apply_eji_filter, DataStore, Thresholds};
use crate::domain::county::round1;
use crate::domain::{CountyRecord, DashboardError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which metric the choropleth shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapMode {
    #[default]
    Eji,
    Aqi,
    Combined,
}

impl MapMode {
    /// Next mode in display order, wrapping around.
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::Eji => Self::Aqi,
            Self::Aqi => Self::Combined,
            Self::Combined => Self::Eji,
        }
    }

    /// Short label for the header and key hints.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Eji => "EJI",
            Self::Aqi => "AQI",
            Self::Combined => "Combined",
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Eji => "Environmental Justice Index (Percentile)",
            Self::Aqi => "Air Quality Index (Median AQI)",
            Self::Combined => "Combined Risk Score",
        }
    }

    #[must_use]
    pub const fn legend(self) -> &'static str {
        match self {
            Self::Eji => {
                "Red = Higher environmental justice concerns (worse). Yellow = Lower concerns (better). \
                 Showing ALL counties with EJI data."
            }
            Self::Aqi => {
                "Red = Worse air quality (higher AQI). Green = Better air quality (lower AQI). \
                 Only showing counties with AQI monitoring stations."
            }
            Self::Combined => {
                "Combined environmental justice and air quality risk. Only showing counties with both datasets."
            }
        }
    }

    #[must_use]
    pub fn colorscale(self) -> ColorScale {
        match self {
            Self::Eji => ColorScale::stops(&[
                (0.0, "rgb(255, 255, 204)"),
                (0.25, "rgb(255, 237, 160)"),
                (0.5, "rgb(254, 217, 118)"),
                (0.75, "rgb(253, 141, 60)"),
                (1.0, "rgb(227, 26, 28)"),
            ]),
            Self::Aqi => ColorScale::stops(&[
                (0.0, "rgb(144, 238, 144)"),
                (0.25, "rgb(255, 255, 153)"),
                (0.5, "rgb(255, 204, 102)"),
                (0.75, "rgb(255, 128, 0)"),
                (1.0, "rgb(204, 0, 0)"),
            ]),
            Self::Combined => ColorScale::Named("Reds".to_string()),
        }
    }

    /// Plotted value for `record`, or `None` when the record lacks an input.
    #[must_use]
    pub fn value(self, record: &CountyRecord) -> Option<f64> {
        match self {
            Self::Eji => record.eji_percentile.map(|eji| round1(eji * 100.0)),
            Self::Aqi => record.median_aqi,
            Self::Combined => {
                let eji = record.eji_percentile?;
                let aqi = record.median_aqi?;
                Some(round1((eji * 100.0 + aqi.min(100.0)) / 2.0))
            }
        }
    }

    /// Records this mode draws from.
    ///
    /// EJI mode covers every county with EJI data, so it reads the EJI-only
    /// dataset and ignores the AQI threshold. The other modes reuse the
    /// threshold-filtered view the table is built from.
    #[must_use]
    pub fn source(self, store: &DataStore, thresholds: &Thresholds) -> Vec<CountyRecord> {
        match self {
            Self::Eji => apply_eji_filter(store.eji_only(), thresholds.eji_fraction()),
            Self::Aqi | Self::Combined => store.filtered().to_vec(),
        }
    }

    /// Builds the full layer configuration for this mode.
    #[must_use]
    pub fn layer(self, store: &DataStore, thresholds: &Thresholds) -> MapLayer {
        MapLayer::from_records(self, self.source(store, thresholds))
    }
}

impl fmt::Display for MapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Eji => "eji",
            Self::Aqi => "aqi",
            Self::Combined => "combined",
        })
    }
}

impl FromStr for MapMode {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eji" => Ok(Self::Eji),
            "aqi" => Ok(Self::Aqi),
            "combined" => Ok(Self::Combined),
            other => Err(DashboardError::Config(format!(
                "unknown map mode '{other}' (expected eji, aqi or combined)"
            ))),
        }
    }
}

/// 24-bit colour.
pub type Rgb = (u8, u8, u8);

/// Colour scale handed to the map library: explicit stops or a library-named
/// scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorScale {
    /// `[[0, "rgb(...)"], ..., [1, "rgb(...)"]]`
    Stops(Vec<(f64, String)>),
    Named(String),
}

/// Approximation of the library's `Reds` scale for terminal previews.
const REDS_PREVIEW: [(f64, Rgb); 4] = [
    (0.0, (220, 220, 220)),
    (0.2, (245, 195, 157)),
    (0.4, (245, 160, 105)),
    (1.0, (178, 10, 28)),
];

impl ColorScale {
    fn stops(stops: &[(f64, &str)]) -> Self {
        Self::Stops(stops.iter().map(|(at, color)| (*at, (*color).to_string())).collect())
    }

    /// Stops as parsed colours. Named scales use a built-in approximation;
    /// unparseable stops are skipped.
    #[must_use]
    pub fn preview_stops(&self) -> Vec<(f64, Rgb)> {
        match self {
            Self::Stops(stops) => stops
                .iter()
                .filter_map(|(at, color)| parse_rgb(color).map(|rgb| (*at, rgb)))
                .collect(),
            Self::Named(_) => REDS_PREVIEW.to_vec(),
        }
    }

    /// Colour at position `t` in `[0, 1]`, linearly interpolated between stops.
    #[must_use]
    pub fn color_at(&self, t: f64) -> Rgb {
        let stops = self.preview_stops();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        let Some(&(_, first)) = stops.first() else {
            return (128, 128, 128);
        };
        let mut previous = (0.0, first);
        for &(at, color) in &stops {
            if t <= at {
                let span = at - previous.0;
                if span <= f64::EPSILON {
                    return color;
                }
                return lerp(previous.1, color, (t - previous.0) / span);
            }
            previous = (at, color);
        }
        previous.1
    }
}

fn lerp(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let channel = |a: u8, b: u8| {
        let value = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = value.round().clamp(0.0, 255.0) as u8;
        value
    };
    (channel(from.0, to.0), channel(from.1, to.1), channel(from.2, to.2))
}

/// Parses `"rgb(r, g, b)"`.
#[must_use]
pub fn parse_rgb(text: &str) -> Option<Rgb> {
    let inner = text.trim().strip_prefix("rgb(")?.strip_suffix(')')?;
    let mut parts = inner.split(',').map(|part| part.trim().parse::<u8>());
    let rgb = (parts.next()?.ok()?, parts.next()?.ok()?, parts.next()?.ok()?);
    if parts.next().is_some() {
        return None;
    }
    Some(rgb)
}

/// Everything needed to draw one map: records with their values plus the
/// mode's presentation settings.
///
/// `records` and `values` are parallel; records without a value for the mode
/// are dropped when the layer is built.
#[derive(Debug, Clone, PartialEq)]
pub struct MapLayer {
    pub mode: MapMode,
    pub records: Vec<CountyRecord>,
    pub values: Vec<f64>,
    pub colorscale: ColorScale,
    pub title: &'static str,
    pub legend: &'static str,
}

impl MapLayer {
    #[must_use]
    pub fn from_records(mode: MapMode, source: Vec<CountyRecord>) -> Self {
        let mut records = Vec::with_capacity(source.len());
        let mut values = Vec::with_capacity(source.len());
        for record in source {
            if let Some(value) = mode.value(&record) {
                records.push(record);
                values.push(value);
            }
        }

        tracing::debug!(mode = %mode, plotted = records.len(), "map layer built");

        Self {
            mode,
            records,
            values,
            colorscale: mode.colorscale(),
            title: mode.title(),
            legend: mode.legend(),
        }
    }

    /// Smallest and largest plotted value.
    #[must_use]
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values.iter().fold(None, |range, &value| match range {
            None => Some((value, value)),
            Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
