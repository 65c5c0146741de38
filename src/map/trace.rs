//! Choropleth trace and exported figure.
//!
//! A [`ChoroplethTrace`] is the boundary to the map library: parallel
//! `locations` (FIPS keys), `z` (values) and `text` (hover text) sequences plus
//! the colour scale and title. [`Figure`] wraps a trace with the layout the
//! dashboard uses, serialized in the library's JSON figure format.

use super::mode::{ColorScale, MapLayer, MapMode};
use crate::domain::county::format_number;
use crate::domain::CountyRecord;
use serde::{Deserialize, Serialize};

/// Hover text for one county, in the map library's HTML subset.
///
/// Optional sections are omitted when their value is missing. In AQI mode a
/// county without air-quality data is called out explicitly.
#[must_use]
pub fn hover_text(record: &CountyRecord, mode: MapMode) -> String {
    let mut text = format!(
        "<b>{}, {}</b><br>Population: {}<br>",
        record.county,
        record.state,
        record.display_population()
    );

    if record.eji_percentile.is_some() {
        text.push_str(&format!("EJI Percentile: {}<br>", record.display_eji()));
    }

    if let Some(aqi) = record.median_aqi {
        text.push_str(&format!(
            "Median AQI: {}<br>Good Days: {}<br>",
            format_number(aqi),
            record.display_good_days_ratio()
        ));
    } else if mode == MapMode::Aqi {
        text.push_str("<i>No AQI data available</i><br>");
    }

    if record.pct_minority.is_some() {
        text.push_str(&format!("% Minority: {}<br>", record.display_minority()));
    }
    if record.pct_poverty_200.is_some() {
        text.push_str(&format!("% Below 200% Poverty: {}", record.display_poverty()));
    }

    text
}

/// Choropleth trace: one entry per plotted county.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethTrace {
    pub locations: Vec<String>,
    pub z: Vec<f64>,
    pub text: Vec<String>,
    pub colorscale: ColorScale,
    pub title: String,
}

impl ChoroplethTrace {
    /// Builds the trace for `layer`. Records without a FIPS key cannot be
    /// joined to a boundary and are left out.
    #[must_use]
    pub fn from_layer(layer: &MapLayer) -> Self {
        let mut locations = Vec::with_capacity(layer.records.len());
        let mut z = Vec::with_capacity(layer.records.len());
        let mut text = Vec::with_capacity(layer.records.len());

        for (record, &value) in layer.records.iter().zip(&layer.values) {
            let Some(fips) = record.fips.as_deref().filter(|f| !f.is_empty()) else {
                continue;
            };
            locations.push(fips.to_string());
            z.push(value);
            text.push(hover_text(record, layer.mode));
        }

        let dropped = layer.records.len() - locations.len();
        if dropped > 0 {
            tracing::debug!(dropped, "records without FIPS key left off the map");
        }

        Self {
            locations,
            z,
            text,
            colorscale: layer.colorscale.clone(),
            title: layer.title.to_string(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

/// Library figure: `{"data": [trace], "layout": {...}}`.
#[derive(Debug, Clone, Serialize)]
pub struct Figure {
    pub data: Vec<FigureTrace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Serialize)]
pub struct FigureTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// URL of the county boundary collection.
    pub geojson: String,
    pub locations: Vec<String>,
    pub z: Vec<f64>,
    pub text: Vec<String>,
    pub hoverinfo: &'static str,
    pub colorscale: ColorScale,
    pub colorbar: ColorBar,
    pub marker: Marker,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorBar {
    pub title: TitleText,
    pub thickness: u32,
    pub len: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TitleText {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub line: MarkerLine,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkerLine {
    pub color: &'static str,
    pub width: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Layout {
    pub title: TitleText,
    pub geo: Geo,
    pub margin: Margin,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Geo {
    pub scope: &'static str,
    pub projection: Projection,
    pub showlakes: bool,
    pub lakecolor: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Projection {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Margin {
    pub t: u32,
    pub r: u32,
    pub b: u32,
    pub l: u32,
}

impl Figure {
    /// Wraps `trace` in the dashboard's US-counties layout.
    #[must_use]
    pub fn new(trace: &ChoroplethTrace, boundaries_url: &str) -> Self {
        Self {
            data: vec![FigureTrace {
                kind: "choropleth",
                geojson: boundaries_url.to_string(),
                locations: trace.locations.clone(),
                z: trace.z.clone(),
                text: trace.text.clone(),
                hoverinfo: "text",
                colorscale: trace.colorscale.clone(),
                colorbar: ColorBar {
                    title: TitleText {
                        text: trace.title.clone(),
                        side: Some("right"),
                    },
                    thickness: 20,
                    len: 0.7,
                },
                marker: Marker {
                    line: MarkerLine {
                        color: "white",
                        width: 0.5,
                    },
                },
            }],
            layout: Layout {
                title: TitleText {
                    text: format!("{} - US Counties", trace.title),
                    side: None,
                },
                geo: Geo {
                    scope: "usa",
                    projection: Projection { kind: "albers usa" },
                    showlakes: true,
                    lakecolor: "rgb(255, 255, 255)",
                },
                margin: Margin { t: 60, r: 0, b: 0, l: 0 },
                height: 600,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cook() -> CountyRecord {
        CountyRecord {
            county: "Cook".to_string(),
            state: "Illinois".to_string(),
            fips: Some("17031".to_string()),
            population: Some(5_150_233),
            eji_percentile: Some(0.874),
            median_aqi: Some(54.0),
            good_days: Some(120),
            days_with_aqi: None,
            pct_minority: Some(57.83),
            pct_poverty_200: Some(31.2),
            ..CountyRecord::default()
        }
    }

    #[test]
    fn hover_text_lists_available_fields() {
        let text = hover_text(&cook(), MapMode::Eji);
        assert_eq!(
            text,
            "<b>Cook, Illinois</b><br>Population: 5,150,233<br>EJI Percentile: 87.4%<br>\
             Median AQI: 54<br>Good Days: 120 / 365<br>% Minority: 57.8%<br>% Below 200% Poverty: 31.2%"
        );
    }

    #[test]
    fn hover_percentages_round_ties_up() {
        let record = CountyRecord {
            eji_percentile: Some(0.0625),
            pct_minority: Some(12.25),
            pct_poverty_200: None,
            ..cook()
        };
        let text = hover_text(&record, MapMode::Eji);
        assert!(text.contains("EJI Percentile: 6.3%<br>"));
        assert!(text.contains("% Minority: 12.3%<br>"));
        assert!(!text.contains("Poverty"));
    }

    #[test]
    fn aqi_mode_flags_missing_air_quality() {
        let record = CountyRecord {
            county: "Loving".to_string(),
            state: "Texas".to_string(),
            ..CountyRecord::default()
        };
        assert_eq!(
            hover_text(&record, MapMode::Aqi),
            "<b>Loving, Texas</b><br>Population: N/A<br><i>No AQI data available</i><br>"
        );
        assert!(!hover_text(&record, MapMode::Eji).contains("No AQI"));
    }

    #[test]
    fn trace_skips_records_without_fips() {
        let mut no_fips = cook();
        no_fips.fips = None;
        let layer = MapLayer::from_records(MapMode::Aqi, vec![cook(), no_fips]);
        assert_eq!(layer.records.len(), 2);

        let trace = ChoroplethTrace::from_layer(&layer);
        assert_eq!(trace.locations, vec!["17031"]);
        assert_eq!(trace.z, vec![54.0]);
        assert_eq!(trace.text.len(), 1);
    }

    #[test]
    fn figure_layout_matches_library_format() {
        let layer = MapLayer::from_records(MapMode::Eji, vec![cook()]);
        let trace = ChoroplethTrace::from_layer(&layer);
        let figure = Figure::new(&trace, "https://example.test/counties.json");
        let json = serde_json::to_value(&figure).unwrap();

        assert_eq!(json["data"][0]["type"], "choropleth");
        assert_eq!(json["data"][0]["geojson"], "https://example.test/counties.json");
        assert_eq!(json["data"][0]["colorbar"]["title"]["side"], "right");
        assert_eq!(
            json["layout"]["title"]["text"],
            "Environmental Justice Index (Percentile) - US Counties"
        );
        assert!(json["layout"]["title"].get("side").is_none());
        assert_eq!(json["layout"]["geo"]["projection"]["type"], "albers usa");
        assert_eq!(json["layout"]["geo"]["scope"], "usa");
    }
}
