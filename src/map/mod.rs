//! Choropleth map definition.
//!
//! The dashboard does not draw geography itself. It builds the layer a map
//! library needs (which counties, what value, which colours) and reports on it
//! in the map panel; the same layer can be exported as a library figure.

pub mod boundaries;
pub mod mode;
pub mod trace;

pub use boundaries::CountyBoundaries;
pub use mode::{ColorScale, MapLayer, MapMode, Rgb};
pub use trace::{hover_text, ChoroplethTrace, Figure};

/// Default source of county boundaries, keyed by FIPS.
pub const DEFAULT_BOUNDARIES_URL: &str =
    "https://raw.githubusercontent.com/plotly/datasets/master/geojson-counties-fips.json";
