//! County boundary collection.
//!
//! Only the feature keys matter on this side: the map library draws the
//! shapes itself, and the dashboard just needs to know which plotted FIPS
//! codes have a boundary to join against.

use crate::domain::{DashboardError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    id: Option<Value>,
}

/// FIPS keys present in a county GeoJSON `FeatureCollection`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountyBoundaries {
    ids: HashSet<String>,
}

impl CountyBoundaries {
    /// Parses a `FeatureCollection` body, keeping each feature's `id`.
    ///
    /// Numeric ids are zero-padded to five digits. Features without an id are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Decode` if the body is not a feature collection.
    pub fn from_geojson(body: &str) -> Result<Self> {
        let collection: FeatureCollection = serde_json::from_str(body)
            .map_err(|e| DashboardError::Decode(format!("county boundaries: {e}")))?;
        Ok(Self::from_features(collection.features))
    }

    fn from_features(features: Vec<Feature>) -> Self {
        let ids = features
            .into_iter()
            .filter_map(|feature| match feature.id? {
                Value::String(id) => Some(id),
                Value::Number(n) => n.as_u64().map(|n| format!("{n:05}")),
                _ => None,
            })
            .collect();
        Self { ids }
    }

    #[must_use]
    pub fn contains(&self, fips: &str) -> bool {
        self.ids.contains(fips)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of `locations` with no matching boundary.
    #[must_use]
    pub fn count_unmatched(&self, locations: &[String]) -> usize {
        locations.iter().filter(|fips| !self.contains(fips)).count()
    }
}

impl FromIterator<String> for CountyBoundaries {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_feature_ids() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "id": "01001", "properties": {}, "geometry": null},
                {"type": "Feature", "id": 6037, "geometry": null},
                {"type": "Feature", "geometry": null}
            ]
        }"#;
        let boundaries = CountyBoundaries::from_geojson(body).unwrap();
        assert_eq!(boundaries.len(), 2);
        assert!(boundaries.contains("01001"));
        assert!(boundaries.contains("06037"));
    }

    #[test]
    fn counts_locations_without_boundary() {
        let boundaries: CountyBoundaries = ["17031".to_string()].into_iter().collect();
        let locations = vec!["17031".to_string(), "99999".to_string()];
        assert_eq!(boundaries.count_unmatched(&locations), 1);
    }

    #[test]
    fn rejects_non_collection() {
        assert!(matches!(
            CountyBoundaries::from_geojson("[1, 2]"),
            Err(DashboardError::Decode(_))
        ));
    }
}
