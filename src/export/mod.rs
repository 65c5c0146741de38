//! Map figure export.
//!
//! Writes the current choropleth [`Figure`] as Plotly-compatible JSON. Files
//! are written to a temporary sibling first and renamed into place, so a
//! reader never sees a half-written figure.
//!
//! # File Naming
//!
//! `ejiview-map-<mode>-<YYYYMMDD-HHMMSS.mmm>.json`, local time.

use crate::domain::{DashboardError, Result};
use crate::map::{Figure, MapMode};
use std::path::{Path, PathBuf};

/// File name for a figure of `mode` exported at `timestamp`.
#[must_use]
pub fn figure_file_name<Tz>(mode: MapMode, timestamp: &chrono::DateTime<Tz>) -> String
where
    Tz: chrono::TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "ejiview-map-{}-{}.json",
        mode.label().to_lowercase(),
        timestamp.format("%Y%m%d-%H%M%S%.3f")
    )
}

/// Writes `figure` into `dir`, creating the directory if needed.
///
/// # Returns
///
/// The path of the written file.
///
/// # Errors
///
/// - `DashboardError::Export` if the figure cannot be serialized
/// - `DashboardError::Io` if the directory cannot be created or the file
///   cannot be written or renamed
///
/// # Example
///
/// ```rust,no_run
/// use ejiview::export::export_figure;
/// use ejiview::map::{ChoroplethTrace, Figure, MapLayer, MapMode};
///
/// let layer = MapLayer::from_records(MapMode::Eji, vec![]);
/// let figure = Figure::new(&ChoroplethTrace::from_layer(&layer), "https://example.org/counties.json");
/// let path = export_figure(&figure, MapMode::Eji, std::path::Path::new("/tmp/ejiview"))?;
/// println!("wrote {}", path.display());
/// # Ok::<(), ejiview::DashboardError>(())
/// ```
pub fn export_figure(figure: &Figure, mode: MapMode, dir: &Path) -> Result<PathBuf> {
    let _span = tracing::debug_span!("export_figure", dir = %dir.display(), mode = mode.label()).entered();

    std::fs::create_dir_all(dir)?;

    let json = serde_json::to_string_pretty(figure)
        .map_err(|e| DashboardError::Export(format!("failed to serialize figure: {e}")))?;

    let path = dir.join(figure_file_name(mode, &chrono::Local::now()));
    let tmp_path = path.with_extension("json.tmp");

    tracing::trace!(tmp_path = %tmp_path.display(), "writing to temporary file");
    std::fs::write(&tmp_path, json)?;

    tracing::trace!("renaming temporary file to final location");
    if let Err(e) = std::fs::rename(&tmp_path, &path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    tracing::debug!(path = %path.display(), "figure written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CountyRecord;
    use crate::map::{ChoroplethTrace, MapLayer};
    use chrono::TimeZone;

    fn figure() -> Figure {
        let record = CountyRecord {
            county: "Harris".to_string(),
            state: "Texas".to_string(),
            fips: Some("48201".to_string()),
            eji_percentile: Some(0.92),
            ..CountyRecord::default()
        };
        let layer = MapLayer::from_records(MapMode::Eji, vec![record]);
        Figure::new(&ChoroplethTrace::from_layer(&layer), "https://example.org/counties.json")
    }

    #[test]
    fn file_name_includes_mode_and_timestamp() {
        let at = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            figure_file_name(MapMode::Combined, &at),
            "ejiview-map-combined-20240309-140507.000.json"
        );
    }

    #[test]
    fn writes_figure_and_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("exports");

        let path = export_figure(&figure(), MapMode::Eji, &target).unwrap();

        let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["data"][0]["type"], "choropleth");
        assert_eq!(written["data"][0]["locations"][0], "48201");
        assert_eq!(written["layout"]["geo"]["projection"]["type"], "albers usa");

        let leftovers: Vec<_> = std::fs::read_dir(&target)
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
