//! View model types representing renderable UI state.
//!
//! View models are computed from `AppState` by `AppState::compute_viewmodel`
//! and consumed by the renderer. They hold display-ready strings, tones and
//! highlight ranges and no business logic, which keeps rendering a straight
//! walk over plain data and lets tests assert on what would be drawn.

use crate::map::Rgb;

/// Complete UI view model for one frame.
#[derive(Debug, Clone)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    pub summary: SummaryInfo,

    pub map: MapPanelInfo,

    pub filters: FilterBarInfo,

    /// Present while in search mode.
    pub search_bar: Option<SearchBarInfo>,

    /// Visible slice of the active table.
    pub table: TableInfo,

    /// Replaces the table when the active view has no rows.
    pub empty_state: Option<EmptyState>,

    /// County view only; hidden for the hotspot table.
    pub pagination: Option<PaginationInfo>,

    pub status: Option<StatusInfo>,

    pub footer: FooterInfo,
}

#[derive(Debug, Clone)]
pub struct HeaderInfo {
    pub title: String,
}

/// Headline statistics, or the reason they are missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryInfo {
    Loading,
    Unavailable,
    Loaded(Vec<SummaryStat>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryStat {
    pub label: &'static str,
    pub value: String,
}

/// Map panel contents.
#[derive(Debug, Clone)]
pub struct MapPanelInfo {
    pub title: String,
    pub body: MapPanelBody,
    pub legend: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapPanelBody {
    /// Either dataset is still loading.
    Waiting,
    /// Layer built; boundaries still loading.
    Loading { plotted: usize },
    Ready(MapStats),
    /// Boundaries or data failed to load.
    Error { heading: String, detail: String },
}

/// What the last completed render put on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapStats {
    pub plotted: usize,
    /// Plotted counties whose FIPS key has no boundary.
    pub unmatched: usize,
    pub range: Option<(f64, f64)>,
    /// Colour-scale swatches from low to high.
    pub swatches: Vec<Rgb>,
}

#[derive(Debug, Clone)]
pub struct FilterBarInfo {
    /// Slider position, 0-100.
    pub eji_slider: u8,
    pub aqi_threshold: u32,
    pub view_label: &'static str,
}

#[derive(Debug, Clone)]
pub struct SearchBarInfo {
    pub query: String,
    /// `true` while typing, `false` while navigating results.
    pub typing: bool,
}

/// Table headers plus the rows inside the visible window.
#[derive(Debug, Clone, Default)]
pub struct TableInfo {
    pub columns: Vec<ColumnHeader>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    pub label: String,
    pub width: usize,
    /// Shortcut key shown next to sortable columns.
    pub key: Option<char>,
    /// `Some(true)` ascending, `Some(false)` descending, on the active sort column.
    pub sort: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<Cell>,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub tone: CellTone,
    /// Character ranges to highlight for search matches, end exclusive.
    pub highlight_ranges: Vec<(usize, usize)>,
}

impl Cell {
    #[must_use]
    pub fn new(text: String, tone: CellTone) -> Self {
        Self {
            text,
            tone,
            highlight_ranges: Vec::new(),
        }
    }
}

/// Semantic color class of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellTone {
    Normal,
    /// County name in the hotspot table.
    Strong,
    /// A value the backend did not provide.
    Missing,
    Critical,
    High,
    PoorAir,
    ModerateAir,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationInfo {
    /// `"Showing 1-100 of 3,143 counties"`.
    pub caption: String,
    /// Rendered page buttons; empty when there is a single page.
    pub buttons: Vec<PageButton>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageButton {
    pub label: String,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub message: String,
    pub is_error: bool,
}

#[derive(Debug, Clone)]
pub struct FooterInfo {
    pub keybindings: String,
}

/// Empty state message, shown in place of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}
