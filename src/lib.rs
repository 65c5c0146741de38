//! ejiview: a terminal dashboard for county-level Environmental Justice Index
//! and air quality data.
//!
//! ejiview loads four datasets from an EJI/AQI backend and provides:
//! - A county table with threshold filters, text search, per-column sorting
//!   and pagination
//! - A hotspot table of the highest-burden counties
//! - A choropleth map definition (EJI, AQI or combined risk) that can be
//!   exported as Plotly-compatible JSON
//! - Background loading with per-dataset failure isolation

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal runtime (main.rs)                         │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Event handling                                   │
//! │  - Action dispatching                               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Data & Map    │   │ API Layer     │
//! │ (ui/)         │   │ (data/, map/) │   │ (api/)        │
//! │ - Rendering   │   │ - Filter/sort │   │ - HTTP source │
//! │ - Theming     │   │ - Search/page │   │ - Loader pool │
//! │ - Components  │   │ - Choropleth  │   │ - Messages    │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Platform paths (infrastructure/)                 │
//! │  - Figure export (export/)                          │
//! │  - Error types, county records (domain/)            │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - Rotating text log                                │
//! │  - File-based OTLP export                           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`api`]: Backend data source, load messages and background loader
//! - [`app`]: Application state machine with event/action model
//! - [`data`]: Dataset store, filtering, search, sorting and pagination
//! - [`domain`]: County records, summary and error types
//! - [`export`]: Atomic map figure export
//! - [`infrastructure`]: Platform paths
//! - [`map`]: Map modes, colour scales, boundaries and choropleth traces
//! - [`observability`]: Tracing subscriber with file output
//! - [`ui`]: Terminal rendering with theme support
//!
//! # Configuration
//!
//! Read from `--config <path>` or `<config dir>/ejiview/config.toml`:
//!
//! ```toml
//! api_base_url = "http://localhost:5000"
//! page_size = 100
//! hotspot_limit = 20
//! map_mode = "eji"
//! eji_threshold = 80
//! aqi_threshold = 0
//! theme_name = "catppuccin-latte"
//! trace_level = "debug"
//! export_dir = "~/maps"
//! ```
//!
//! Command-line flags override file values.
//!
//! # Initialization Flow
//!
//! 1. **Startup** (`main.rs`):
//!    - Parse flags, load and validate configuration
//!    - Initialize tracing
//!    - Create `AppState` with theme and settings via [`initialize`]
//!    - Handle [`Event::Reload`], which emits the four load actions
//!
//! 2. **Loading**:
//!    - Each load runs on its own thread against the HTTP source
//!    - Responses arrive on a channel and become [`Event::Loaded`]
//!    - Once counties and EJI data have settled the map render starts and
//!      fetches county boundaries
//!
//! 3. **Interaction**:
//!    - Keys become events; the handler mutates state and returns actions
//!    - The view model is recomputed and drawn after every state change
//!
//! # Example
//!
//! ```rust
//! use ejiview::{handle_event, initialize, Action, Config, Event};
//!
//! let config = Config {
//!     page_size: 50,
//!     eji_threshold: 90,
//!     ..Default::default()
//! };
//!
//! let mut state = initialize(&config)?;
//! let (_render, actions) = handle_event(&mut state, &Event::Reload)?;
//! assert!(actions.iter().all(|action| matches!(action, Action::Load(_))));
//! # Ok::<(), ejiview::DashboardError>(())
//! ```
//!
//! # Key Design Decisions
//!
//! ## Explicit State Container
//!
//! All loaded data and derived views live in one [`AppState`] owned by the UI
//! thread. Loader threads never touch it; they send responses back instead.
//!
//! ## Derived Views Recomputed Eagerly
//!
//! Every filter or search change recomputes the filtered view, the search view
//! and the active sort in one pass, so a stale search result is never shown.
//!
//! ## Immutable View Models
//!
//! Rendering works from a computed view model:
//! - Clear separation between state and display
//! - Windowing and highlight ranges are computed once per frame
//!
//! # Platform Support
//!
//! Any ANSI-capable terminal with 24-bit colour, on Linux, macOS or Windows.

pub mod api;
pub mod app;
pub mod data;
pub mod domain;
pub mod export;
pub mod infrastructure;
pub mod map;
pub mod observability;
pub mod ui;

pub use app::{handle_event, Action, AppState, Event, InputMode, SearchFocus, TableView};
pub use domain::{CountyRecord, DashboardError, Result, Summary};
pub use map::MapMode;
pub use ui::Theme;

use data::Thresholds;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Dashboard configuration.
///
/// Every field has a default, so a config file only needs the keys it
/// changes. Command-line flags are applied on top by the binary.
///
/// # Example
///
/// ```rust
/// use ejiview::{Config, MapMode};
///
/// let config: Config = toml::from_str("map_mode = \"aqi\"\npage_size = 25").unwrap();
/// assert_eq!(config.map_mode, MapMode::Aqi);
/// assert_eq!(config.page_size, 25);
/// assert_eq!(config.hotspot_limit, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend base URL; endpoints such as `/api/data` are appended.
    pub api_base_url: String,

    /// County boundary GeoJSON used for map renders and exported figures.
    pub boundaries_url: String,

    /// County table rows per page. Must be at least 1.
    pub page_size: usize,

    /// Rows in the hotspot table. Must be at least 1.
    pub hotspot_limit: usize,

    /// Initial map mode: `eji`, `aqi` or `combined`.
    pub map_mode: MapMode,

    /// Initial EJI slider position, 0-100.
    pub eji_threshold: u8,

    /// Initial minimum median AQI.
    pub aqi_threshold: u32,

    /// Built-in theme name to use.
    ///
    /// Options: `catppuccin-mocha`, `catppuccin-latte`, `catppuccin-frappe`,
    /// `catppuccin-macchiato`. Ignored if `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file.
    ///
    /// Takes precedence over `theme_name`. See [`ui::theme`] for format.
    pub theme_file: Option<String>,

    /// Tracing filter directive, e.g. `debug` or `ejiview::api=trace`.
    /// `RUST_LOG` takes precedence. Default: `"info"`
    pub trace_level: Option<String>,

    /// Where exported map figures go. Default: `<data dir>/exports`.
    pub export_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            boundaries_url: map::DEFAULT_BOUNDARIES_URL.to_string(),
            page_size: data::ITEMS_PER_PAGE,
            hotspot_limit: app::state::DEFAULT_HOTSPOT_LIMIT,
            map_mode: MapMode::Eji,
            eji_threshold: 0,
            aqi_threshold: 0,
            theme_name: None,
            theme_file: None,
            trace_level: None,
            export_dir: None,
        }
    }
}

impl Config {
    /// Parses a TOML config file.
    ///
    /// # Errors
    ///
    /// - `DashboardError::Io` if the file cannot be read
    /// - `DashboardError::Config` if it is not valid TOML or has wrongly typed
    ///   values
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| DashboardError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    /// Loads the configuration.
    ///
    /// An explicit path must exist. Without one, the platform config file is
    /// used when present, and defaults otherwise.
    ///
    /// # Errors
    ///
    /// See [`Config::from_file`].
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match infrastructure::default_config_path() {
            Some(path) if path.is_file() => Self::from_file(path),
            _ => Ok(Self::default()),
        }
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Config` for a zero page size, a zero hotspot
    /// limit, an EJI threshold above 100, or an AQI threshold above 500.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(DashboardError::Config("page_size must be at least 1".to_string()));
        }
        if self.hotspot_limit == 0 {
            return Err(DashboardError::Config("hotspot_limit must be at least 1".to_string()));
        }
        if self.eji_threshold > Thresholds::EJI_MAX {
            return Err(DashboardError::Config(format!(
                "eji_threshold must be between 0 and {}, got {}",
                Thresholds::EJI_MAX,
                self.eji_threshold
            )));
        }
        if self.aqi_threshold > Thresholds::AQI_MAX {
            return Err(DashboardError::Config(format!(
                "aqi_threshold must be between 0 and {}, got {}",
                Thresholds::AQI_MAX,
                self.aqi_threshold
            )));
        }
        if self.api_base_url.trim().is_empty() {
            return Err(DashboardError::Config("api_base_url must not be empty".to_string()));
        }
        Ok(())
    }

    /// Resolved export directory, with `~` expanded.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .as_deref()
            .map_or_else(infrastructure::default_export_dir, infrastructure::expand_tilde)
    }

    fn load_theme(&self) -> Theme {
        if let Some(theme_file) = &self.theme_file {
            return Theme::from_file(infrastructure::expand_tilde(theme_file)).unwrap_or_else(|e| {
                tracing::debug!(theme_file = %theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            });
        }
        self.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
            Theme::from_name(theme_name).unwrap_or_else(|| {
                tracing::debug!(theme_name = %theme_name, "unknown theme, using default");
                Theme::default()
            })
        })
    }
}

/// Creates the application state from a validated configuration.
///
/// The state starts with every dataset pending. Handle [`Event::Reload`] to
/// issue the initial loads.
///
/// # Errors
///
/// Returns `DashboardError::Config` if the configuration does not validate.
///
/// # Example
///
/// ```rust
/// use ejiview::{initialize, Config};
///
/// let state = initialize(&Config::default())?;
/// assert_eq!(state.page_size, 100);
/// # Ok::<(), ejiview::DashboardError>(())
/// ```
pub fn initialize(config: &Config) -> Result<AppState> {
    tracing::debug!(api_base_url = %config.api_base_url, "initializing dashboard state");
    config.validate()?;

    let mut state = AppState::new(config.load_theme());
    state.page_size = config.page_size;
    state.hotspot_limit = config.hotspot_limit;
    state.map_mode = config.map_mode;
    state.thresholds = Thresholds::new(config.eji_threshold, config.aqi_threshold);
    state.boundaries_url.clone_from(&config.boundaries_url);
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let cases = [
            Config { page_size: 0, ..Config::default() },
            Config { hotspot_limit: 0, ..Config::default() },
            Config { eji_threshold: 101, ..Config::default() },
            Config { aqi_threshold: 501, ..Config::default() },
        ];
        for config in cases {
            assert!(matches!(config.validate(), Err(DashboardError::Config(_))), "{config:?}");
        }
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let config = Config {
            theme_name: Some("solarized".to_string()),
            ..Config::default()
        };
        assert_eq!(config.load_theme().name, Theme::default().name);
    }

    #[test]
    fn initialize_applies_settings() {
        let config = Config {
            page_size: 25,
            hotspot_limit: 5,
            map_mode: MapMode::Combined,
            eji_threshold: 90,
            aqi_threshold: 40,
            ..Config::default()
        };
        let state = initialize(&config).unwrap();
        assert_eq!(state.page_size, 25);
        assert_eq!(state.hotspot_limit, 5);
        assert_eq!(state.map_mode, MapMode::Combined);
        assert_eq!(state.thresholds, Thresholds::new(90, 40));
    }

    #[test]
    fn explicit_export_dir_is_expanded() {
        let config = Config {
            export_dir: Some("/srv/maps".to_string()),
            ..Config::default()
        };
        assert_eq!(config.export_dir(), PathBuf::from("/srv/maps"));
    }
}
