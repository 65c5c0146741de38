//! Input, table and map state machine types.
//!
//! # State Machine
//!
//! The dashboard operates in one of two input modes:
//! - **Normal**: navigation, paging, sorting, thresholds, map mode
//! - **Search**: typing a query, or navigating the narrowed results
//!
//! [`TableView`] picks which table fills the lower half of the screen, and
//! [`MapStatus`] tracks the current map render.

/// Focus state within search mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFocus {
    /// Characters edit the query.
    Typing,

    /// The query is kept and keys navigate the results.
    Navigating,
}

/// Current input handling mode.
///
/// Controls which keybindings are active and the footer hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,

    Search(SearchFocus),
}

/// Table shown under the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableView {
    /// Filtered, searchable, sortable, paginated county table.
    #[default]
    Counties,

    /// Fixed top-N hotspot table.
    Hotspots,
}

impl TableView {
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Counties => Self::Hotspots,
            Self::Hotspots => Self::Counties,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Counties => "Counties",
            Self::Hotspots => "Hotspots",
        }
    }
}

/// Progress of the current map render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MapStatus {
    /// The county or EJI dataset has not settled yet.
    #[default]
    WaitingForData,

    /// Layer built, boundary collection requested.
    LoadingBoundaries,

    Ready,

    /// Boundary fetch failed, or the data behind the current mode did.
    Failed(String),
}
