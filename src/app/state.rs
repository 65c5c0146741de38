//! Application state management and view model computation.
//!
//! This module defines [`AppState`], the central state container for the
//! dashboard, along with the methods that keep its derived views consistent
//! and the view model computation that feeds the renderer. It is the single
//! source of truth for everything on screen.
//!
//! # Architecture
//!
//! `AppState` owns the [`DataStore`] (loaded datasets plus the filtered and
//! search views) and the control positions that derive those views:
//! thresholds, search text, sort memory and the current page. Every control
//! change runs the same pipeline so the views never drift apart:
//!
//! ```text
//! thresholds ──▶ filtered ──▶ search view ──▶ active sort ──▶ page 1
//! ```
//!
//! # Map Renders
//!
//! A render only starts once both the county and EJI datasets have settled.
//! Each render gets a fresh `render_id`; the boundary fetch it issues carries
//! that id, and a response for any older id is dropped.
//!
//! # Example
//!
//! ```rust
//! use ejiview::app::AppState;
//! use ejiview::ui::theme::Theme;
//!
//! let mut state = AppState::new(Theme::default());
//! state.apply_thresholds();
//! let viewmodel = state.compute_viewmodel(40, 120);
//! assert!(viewmodel.table.rows.is_empty());
//! ```

use super::actions::Action;
use super::modes::{InputMode, MapStatus, SearchFocus, TableView};
use crate::api::LoadRequest;
use crate::data::paginate::{clamp_page, page_controls, total_pages};
use crate::data::search::match_range;
use crate::data::{filter, paginate, search, DataStore, Dataset, LoadState, PageControl, SortState, TableColumn, Thresholds, ITEMS_PER_PAGE};
use crate::domain::{CountyRecord, MISSING};
use crate::map::{ChoroplethTrace, CountyBoundaries, Figure, MapMode, DEFAULT_BOUNDARIES_URL};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    Cell, CellTone, ColumnHeader, EmptyState, FilterBarInfo, FooterInfo, HeaderInfo, MapPanelBody, MapPanelInfo,
    MapStats, PageButton, PaginationInfo, SearchBarInfo, StatusInfo, SummaryInfo, SummaryStat, TableInfo, TableRow,
    UIViewModel,
};

/// Default number of rows in the hotspot table.
pub const DEFAULT_HOTSPOT_LIMIT: usize = 20;

/// Rows above the table: header, borders, summary, map panel, filter bar and
/// the column header line.
const TOP_CHROME_ROWS: usize = 10;

/// Rows below the table: pagination, status, border and footer.
const BOTTOM_CHROME_ROWS: usize = 6;

const SEARCH_BAR_ROWS: usize = 3;

/// Most colour-scale swatches in the map panel preview.
const MAP_SWATCHES: usize = 32;

/// Hotspot columns: label and width.
const HOTSPOT_COLUMNS: [(&str, usize); 7] = [
    ("County", 22),
    ("State", 16),
    ("Population", 12),
    ("EJI %ile", 10),
    ("Median AQI", 11),
    ("Good Days", 12),
    ("% Minority", 10),
];

/// Progress and result of the most recent map render.
#[derive(Debug, Clone, Default)]
pub struct MapRender {
    /// Id of the latest render; boundary responses for other ids are stale.
    pub render_id: u64,

    pub status: MapStatus,

    /// Trace of the latest render, kept for the panel and for export.
    pub trace: Option<ChoroplethTrace>,

    /// Plotted counties with no boundary, known once boundaries arrive.
    pub unmatched: usize,

    /// Boundary collection from the first successful fetch, reused by later
    /// renders.
    pub boundaries: Option<CountyBoundaries>,
}

/// Central application state container.
///
/// Mutated by the event handler in response to user input and load
/// responses. View models are computed on demand from state snapshots.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded datasets and the table's derived views.
    pub store: DataStore,

    pub thresholds: Thresholds,

    /// Per-column sort directions, kept for the whole session.
    pub sort: SortState,

    /// Current page of the county table, 1-indexed.
    pub page: usize,

    pub page_size: usize,

    /// Rows shown in the hotspot table.
    pub hotspot_limit: usize,

    /// Cursor position within the rows of the current page (or the hotspot
    /// table).
    pub selected_index: usize,

    pub input_mode: InputMode,

    /// Query being typed. The store holds the query its search view was
    /// computed for.
    pub search_query: String,

    pub table_view: TableView,

    pub map_mode: MapMode,

    pub map: MapRender,

    /// County boundary collection URL, passed to fetches and exported figures.
    pub boundaries_url: String,

    pub theme: Theme,

    /// Transient message for the status line.
    pub status: Option<StatusInfo>,
}

impl AppState {
    /// Creates an empty state with default settings.
    ///
    /// All datasets start pending; nothing is shown until loads complete.
    ///
    /// # Parameters
    ///
    /// * `theme` - Color scheme for UI rendering
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        Self {
            store: DataStore::new(),
            thresholds: Thresholds::default(),
            sort: SortState::default(),
            page: 1,
            page_size: ITEMS_PER_PAGE,
            hotspot_limit: DEFAULT_HOTSPOT_LIMIT,
            selected_index: 0,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            table_view: TableView::Counties,
            map_mode: MapMode::Eji,
            map: MapRender::default(),
            boundaries_url: DEFAULT_BOUNDARIES_URL.to_string(),
            theme,
            status: None,
        }
    }

    /// Recomputes the filtered view from the thresholds, then the search view
    /// and the active sort, and returns to page 1.
    ///
    /// # Tracing
    ///
    /// Creates a debug-level span with the record count and both thresholds.
    pub fn apply_thresholds(&mut self) {
        let _span = tracing::debug_span!(
            "apply_thresholds",
            total = self.store.all().len(),
            eji_slider = self.thresholds.eji_slider,
            aqi = self.thresholds.aqi
        )
        .entered();

        let mut rows = filter::apply_filters(
            self.store.all(),
            self.thresholds.eji_fraction(),
            self.thresholds.aqi_value(),
        );
        self.sort.reapply(&mut rows);
        self.store.set_filtered(rows);
        self.refresh_search();

        self.page = 1;
        self.selected_index = 0;

        tracing::debug!(filtered_count = self.store.filtered().len(), "thresholds applied");
    }

    /// Recomputes the search view from `search_query` and returns to page 1.
    ///
    /// An empty query removes the search view so the table shows the whole
    /// filtered view.
    pub fn apply_search(&mut self) {
        let _span = tracing::debug_span!("apply_search_query", query_len = self.search_query.len()).entered();

        self.refresh_search();
        self.page = 1;
        self.selected_index = 0;

        tracing::debug!(row_count = self.store.table_view().len(), "search view updated");
    }

    fn refresh_search(&mut self) {
        if self.search_query.is_empty() {
            self.store.clear_search();
            return;
        }
        let mut rows = search::apply_search(self.store.filtered(), &self.search_query);
        self.sort.reapply(&mut rows);
        self.store.set_search(&self.search_query, rows);
    }

    /// Sorts the table view by the column at `index`, flipping that column's
    /// direction.
    ///
    /// The whole backing view is sorted, not only the visible page. When a
    /// search view is shown the filtered view is re-sorted too, so leaving
    /// search keeps the order. The current page is kept.
    ///
    /// # Returns
    ///
    /// `false` if `index` is not a table column.
    pub fn sort_by_column(&mut self, index: usize) -> bool {
        if TableColumn::from_index(index).is_none() {
            return false;
        }

        let ascending = self.sort.sort(self.store.table_view_mut(), index);
        if self.store.search_view().is_some() {
            self.sort.reapply(self.store.filtered_mut());
        }
        self.selected_index = 0;

        tracing::debug!(column = index, ascending, "table sorted");
        true
    }

    /// Moves the EJI slider by `delta`. Returns `true` if it moved.
    pub fn adjust_eji(&mut self, delta: i32) -> bool {
        let changed = self.thresholds.adjust_eji(delta);
        if changed {
            self.apply_thresholds();
        }
        changed
    }

    /// Moves the AQI threshold by `delta`. Returns `true` if it moved.
    pub fn adjust_aqi(&mut self, delta: i32) -> bool {
        let changed = self.thresholds.adjust_aqi(delta);
        if changed {
            self.apply_thresholds();
        }
        changed
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        total_pages(self.store.table_view().len(), self.page_size)
    }

    /// Jumps to `page`, clamped to the valid range. Returns `true` if the page
    /// changed.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        let page = clamp_page(page, self.total_pages());
        if page == self.page {
            return false;
        }
        self.page = page;
        self.selected_index = 0;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        self.go_to_page(self.page.saturating_sub(1))
    }

    pub fn first_page(&mut self) -> bool {
        self.go_to_page(1)
    }

    pub fn last_page(&mut self) -> bool {
        self.go_to_page(self.total_pages())
    }

    /// Rows the cursor moves over: the current page, or the hotspot table.
    #[must_use]
    pub fn visible_rows(&self) -> &[CountyRecord] {
        match self.table_view {
            TableView::Counties => paginate(self.store.table_view(), self.page, self.page_size).rows,
            TableView::Hotspots => {
                let hotspots = self.store.hotspots();
                &hotspots[..hotspots.len().min(self.hotspot_limit)]
            }
        }
    }

    /// Moves the cursor down, wrapping to the top at the end.
    pub fn move_selection_down(&mut self) {
        let len = self.visible_rows().len();
        if len == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % len;
    }

    /// Moves the cursor up, wrapping to the bottom at the start.
    pub fn move_selection_up(&mut self) {
        let len = self.visible_rows().len();
        if len == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = len - 1;
        } else {
            self.selected_index = (self.selected_index - 1).min(len - 1);
        }
    }

    /// Switches between the county and hotspot tables.
    pub fn toggle_table_view(&mut self) {
        self.table_view = self.table_view.toggle();
        self.selected_index = 0;
    }

    /// Starts a new map render for the current mode and thresholds.
    ///
    /// # Render Steps
    ///
    /// 1. Wait while the county or EJI dataset is still loading
    /// 2. Take a fresh `render_id`, superseding any render in flight
    /// 3. Fail inline if the dataset behind the mode failed to load
    /// 4. Build the layer and trace
    /// 5. Reuse cached boundaries, or request them tagged with `render_id`
    ///
    /// # Returns
    ///
    /// The boundary load to dispatch, if one is needed.
    pub fn request_map_render(&mut self) -> Vec<Action> {
        let _span = tracing::debug_span!("request_map_render", mode = %self.map_mode).entered();

        if !(self.store.is_settled(Dataset::Counties) && self.store.is_settled(Dataset::EjiCounties)) {
            tracing::debug!("map render deferred until county and EJI data settle");
            self.map.status = MapStatus::WaitingForData;
            return vec![];
        }

        self.map.render_id += 1;
        self.map.unmatched = 0;

        let source = match self.map_mode {
            MapMode::Eji => Dataset::EjiCounties,
            MapMode::Aqi | MapMode::Combined => Dataset::Counties,
        };
        if let LoadState::Failed(message) = self.store.status(source) {
            self.map.trace = None;
            self.map.status = MapStatus::Failed(format!("Error loading map data: {message}"));
            return vec![];
        }

        let layer = self.map_mode.layer(&self.store, &self.thresholds);
        let trace = ChoroplethTrace::from_layer(&layer);
        tracing::debug!(render_id = self.map.render_id, plotted = trace.len(), "map layer ready");

        if let Some(boundaries) = &self.map.boundaries {
            self.map.unmatched = boundaries.count_unmatched(&trace.locations);
            self.map.trace = Some(trace);
            self.map.status = MapStatus::Ready;
            return vec![];
        }

        self.map.trace = Some(trace);
        self.map.status = MapStatus::LoadingBoundaries;
        vec![Action::Load(LoadRequest::boundaries(
            self.map.render_id,
            self.boundaries_url.clone(),
        ))]
    }

    /// Completes render `render_id` with the fetched boundaries.
    ///
    /// Returns `false`, changing nothing, if a newer render superseded it.
    pub fn finish_map_render(&mut self, render_id: u64, boundaries: CountyBoundaries) -> bool {
        if render_id != self.map.render_id {
            tracing::debug!(render_id, current = self.map.render_id, "stale boundary response ignored");
            return false;
        }

        self.map.unmatched = self
            .map
            .trace
            .as_ref()
            .map_or(0, |trace| boundaries.count_unmatched(&trace.locations));
        self.map.boundaries = Some(boundaries);
        self.map.status = MapStatus::Ready;
        true
    }

    /// Marks render `render_id` as failed. Stale failures are ignored.
    pub fn fail_map_render(&mut self, render_id: u64, message: &str) -> bool {
        if render_id != self.map.render_id {
            tracing::debug!(render_id, current = self.map.render_id, "stale boundary failure ignored");
            return false;
        }

        self.map.status = MapStatus::Failed(format!(
            "Could not load county boundaries ({message}). Data is still available in the tables below."
        ));
        true
    }

    /// Figure for the current map, or `None` while no layer has been built.
    #[must_use]
    pub fn map_figure(&self) -> Option<Figure> {
        self.map
            .trace
            .as_ref()
            .map(|trace| Figure::new(trace, &self.boundaries_url))
    }

    pub fn set_status(&mut self, message: impl Into<String>, is_error: bool) {
        self.status = Some(StatusInfo {
            message: message.into(),
            is_error,
        });
    }

    /// Computes a renderable UI view model from current state and terminal dimensions.
    ///
    /// # Parameters
    ///
    /// * `rows` - Terminal height in character cells
    /// * `cols` - Terminal width in character cells
    ///
    /// # Windowing Algorithm
    ///
    /// 1. Calculate available table rows after subtracting UI chrome
    /// 2. Center the window on the cursor
    /// 3. Shift the window back near the end so it stays full
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let visible = self.visible_rows();
        let available_rows = self.calculate_available_rows(rows).max(1);

        let mut visible_start = self.selected_index.saturating_sub(available_rows / 2);
        let visible_end = (visible_start + available_rows).min(visible.len());
        visible_start = visible_start.min(visible_end);

        let actual_count = visible_end - visible_start;
        if actual_count < available_rows && visible.len() >= available_rows {
            visible_start = visible_end.saturating_sub(available_rows);
        }

        let window = &visible[visible_start..visible_end];
        let table = match self.table_view {
            TableView::Counties => self.compute_county_table(window, visible_start),
            TableView::Hotspots => self.compute_hotspot_table(window, visible_start),
        };

        UIViewModel {
            header: self.compute_header(),
            summary: self.compute_summary(),
            map: self.compute_map_panel(cols),
            filters: FilterBarInfo {
                eji_slider: self.thresholds.eji_slider,
                aqi_threshold: self.thresholds.aqi,
                view_label: self.table_view.label(),
            },
            search_bar: self.compute_search_bar(),
            table,
            empty_state: if visible.is_empty() { Some(self.compute_empty_state()) } else { None },
            pagination: self.compute_pagination(),
            status: self.status.clone(),
            footer: self.compute_footer(),
        }
    }

    fn compute_county_table(&self, window: &[CountyRecord], offset: usize) -> TableInfo {
        let active = self.sort.active();
        let query = self.store.search_query().unwrap_or_default();

        let columns = TableColumn::ALL
            .iter()
            .map(|column| ColumnHeader {
                label: column.label().to_string(),
                width: column.width(),
                key: char::from_digit(u32::try_from(column.index() + 1).unwrap_or(0), 10),
                sort: active.and_then(|(index, ascending)| (index == column.index()).then_some(ascending)),
            })
            .collect();

        let rows = window
            .iter()
            .enumerate()
            .map(|(relative_idx, record)| {
                let cells = TableColumn::ALL
                    .iter()
                    .map(|&column| {
                        let text = column.cell(record);
                        let tone = if text == MISSING { CellTone::Missing } else { CellTone::Normal };
                        let searchable = matches!(column, TableColumn::County | TableColumn::State);
                        let highlight = if searchable { match_range(&text, query) } else { None };
                        fit_cell(text, column.width(), tone, highlight)
                    })
                    .collect();
                TableRow {
                    cells,
                    is_selected: offset + relative_idx == self.selected_index,
                }
            })
            .collect();

        TableInfo { columns, rows }
    }

    fn compute_hotspot_table(&self, window: &[CountyRecord], offset: usize) -> TableInfo {
        let columns = HOTSPOT_COLUMNS
            .iter()
            .map(|&(label, width)| ColumnHeader {
                label: label.to_string(),
                width,
                key: None,
                sort: None,
            })
            .collect();

        let rows = window
            .iter()
            .enumerate()
            .map(|(relative_idx, record)| {
                let eji_tone = match record.eji_percentile {
                    Some(eji) if eji > 0.9 => CellTone::Critical,
                    Some(_) => CellTone::High,
                    None => CellTone::Missing,
                };
                let aqi_tone = match record.median_aqi {
                    Some(aqi) if aqi > 60.0 => CellTone::PoorAir,
                    Some(_) => CellTone::ModerateAir,
                    None => CellTone::Missing,
                };
                let values = [
                    (record.county.clone(), CellTone::Strong),
                    (record.state.clone(), CellTone::Normal),
                    (record.display_population(), CellTone::Normal),
                    (record.display_eji(), eji_tone),
                    (record.display_median_aqi(), aqi_tone),
                    (record.display_good_days_ratio(), CellTone::Normal),
                    (record.display_minority(), CellTone::Normal),
                ];
                let cells = values
                    .into_iter()
                    .zip(HOTSPOT_COLUMNS)
                    .map(|((text, tone), (_, width))| {
                        let tone = if text == MISSING { CellTone::Missing } else { tone };
                        fit_cell(text, width, tone, None)
                    })
                    .collect();
                TableRow {
                    cells,
                    is_selected: offset + relative_idx == self.selected_index,
                }
            })
            .collect();

        TableInfo { columns, rows }
    }

    fn compute_header(&self) -> HeaderInfo {
        HeaderInfo {
            title: format!(" EJI & Air Quality Dashboard · {} map ", self.map_mode.label()),
        }
    }

    fn compute_summary(&self) -> SummaryInfo {
        if let Some(summary) = self.store.summary() {
            return SummaryInfo::Loaded(vec![
                SummaryStat {
                    label: "Counties",
                    value: summary.display_total(),
                },
                SummaryStat {
                    label: "Avg EJI",
                    value: summary.display_avg_eji(),
                },
                SummaryStat {
                    label: "Avg Median AQI",
                    value: summary.display_avg_aqi(),
                },
                SummaryStat {
                    label: "High-Risk Counties",
                    value: summary.display_high_risk(),
                },
            ]);
        }

        match self.store.status(Dataset::Summary) {
            LoadState::Failed(_) => SummaryInfo::Unavailable,
            LoadState::Pending | LoadState::Loaded => SummaryInfo::Loading,
        }
    }

    fn compute_map_panel(&self, cols: usize) -> MapPanelInfo {
        let plotted = self.map.trace.as_ref().map_or(0, ChoroplethTrace::len);

        let body = match &self.map.status {
            MapStatus::WaitingForData => MapPanelBody::Waiting,
            MapStatus::LoadingBoundaries => MapPanelBody::Loading { plotted },
            MapStatus::Ready => {
                let colorscale = self
                    .map
                    .trace
                    .as_ref()
                    .map_or_else(|| self.map_mode.colorscale(), |trace| trace.colorscale.clone());
                let swatch_count = (cols / 4).clamp(2, MAP_SWATCHES);
                let swatches = (0..swatch_count)
                    .map(|i| colorscale.color_at(i as f64 / (swatch_count - 1) as f64))
                    .collect();
                let range = self.map.trace.as_ref().and_then(|trace| {
                    trace.z.iter().fold(None, |range, &value| match range {
                        None => Some((value, value)),
                        Some((lo, hi)) => Some((f64::min(lo, value), f64::max(hi, value))),
                    })
                });
                MapPanelBody::Ready(MapStats {
                    plotted,
                    unmatched: self.map.unmatched,
                    range,
                    swatches,
                })
            }
            MapStatus::Failed(detail) => MapPanelBody::Error {
                heading: "Error Loading Map".to_string(),
                detail: detail.clone(),
            },
        };

        MapPanelInfo {
            title: self.map_mode.title().to_string(),
            body,
            legend: self.map_mode.legend().to_string(),
        }
    }

    fn compute_empty_state(&self) -> EmptyState {
        let dataset = match self.table_view {
            TableView::Counties => Dataset::Counties,
            TableView::Hotspots => Dataset::Hotspots,
        };

        match self.store.status(dataset) {
            LoadState::Pending => EmptyState {
                message: format!("Loading {}...", dataset.label()),
                subtitle: String::new(),
            },
            LoadState::Failed(message) => EmptyState {
                message: "No data available".to_string(),
                subtitle: message,
            },
            LoadState::Loaded => match self.table_view {
                TableView::Hotspots => EmptyState {
                    message: "No hotspots found matching criteria".to_string(),
                    subtitle: String::new(),
                },
                TableView::Counties => match self.store.search_query() {
                    Some(query) => EmptyState {
                        message: format!("No counties match \"{query}\""),
                        subtitle: "Press ESC to clear the search".to_string(),
                    },
                    None => EmptyState {
                        message: "No data matches current filters".to_string(),
                        subtitle: "Lower the thresholds with e / a".to_string(),
                    },
                },
            },
        }
    }

    fn compute_pagination(&self) -> Option<PaginationInfo> {
        if self.table_view != TableView::Counties {
            return None;
        }

        let page = paginate(self.store.table_view(), self.page, self.page_size);
        let caption = page.caption()?;

        let buttons = page_controls(page.page, page.total_pages)
            .into_iter()
            .map(|control| match control {
                PageControl::Previous(_) => PageButton {
                    label: "← Previous".to_string(),
                    is_current: false,
                },
                PageControl::Number { page, current } => PageButton {
                    label: page.to_string(),
                    is_current: current,
                },
                PageControl::Ellipsis => PageButton {
                    label: "...".to_string(),
                    is_current: false,
                },
                PageControl::Next(_) => PageButton {
                    label: "Next →".to_string(),
                    is_current: false,
                },
            })
            .collect();

        Some(PaginationInfo { caption, buttons })
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match (self.input_mode, self.table_view) {
            (InputMode::Search(SearchFocus::Typing), _) => {
                "ESC: exit search  Enter: browse results  Type to filter by county or state".to_string()
            }
            (InputMode::Search(SearchFocus::Navigating), _) => {
                "ESC: exit search  /: edit query  j/k: move  h/l: page  1-6: sort".to_string()
            }
            (InputMode::Normal, TableView::Counties) => {
                "j/k: move  h/l: page  1-6: sort  m: map  e/E a/A: thresholds  /: search  Tab: hotspots  x: export  R: reload  q: quit"
                    .to_string()
            }
            (InputMode::Normal, TableView::Hotspots) => {
                "j/k: move  m: map  e/E a/A: thresholds  Tab: counties  x: export  R: reload  q: quit".to_string()
            }
        };

        FooterInfo { keybindings }
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        match self.input_mode {
            InputMode::Search(focus) => Some(SearchBarInfo {
                query: self.search_query.clone(),
                typing: focus == SearchFocus::Typing,
            }),
            InputMode::Normal => None,
        }
    }

    const fn calculate_available_rows(&self, total_rows: usize) -> usize {
        let chrome = TOP_CHROME_ROWS + BOTTOM_CHROME_ROWS;
        match self.input_mode {
            InputMode::Normal => total_rows.saturating_sub(chrome),
            InputMode::Search(_) => total_rows.saturating_sub(chrome + SEARCH_BAR_ROWS),
        }
    }
}

/// Fits `text` into a column of `width` cells, leaving one cell of gap.
///
/// Over-long text is cut with an ellipsis; a highlight range is clipped to
/// what stays visible.
fn fit_cell(text: String, width: usize, tone: CellTone, highlight: Option<(usize, usize)>) -> Cell {
    let max_chars = width.saturating_sub(1);
    let char_count = text.chars().count();

    let (text, visible_chars) = if char_count > max_chars {
        let keep = max_chars.saturating_sub(1);
        let mut cut: String = text.chars().take(keep).collect();
        cut.push('…');
        (cut, keep)
    } else {
        (text, char_count)
    };

    let mut cell = Cell::new(text, tone);
    if let Some((start, end)) = highlight {
        let end = end.min(visible_chars);
        if start < end {
            cell.highlight_ranges.push((start, end));
        }
    }
    cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Summary;

    fn county(name: &str, state: &str, eji: Option<f64>, aqi: Option<f64>) -> CountyRecord {
        CountyRecord {
            county: name.to_string(),
            state: state.to_string(),
            fips: Some(format!("{:05}", name.len() * 1000 + state.len())),
            eji_percentile: eji,
            median_aqi: aqi,
            ..CountyRecord::default()
        }
    }

    fn loaded_state(records: Vec<CountyRecord>) -> AppState {
        let mut state = AppState::new(Theme::default());
        state.store.fill_eji_counties(records.clone());
        state.store.fill_counties(records);
        state.apply_thresholds();
        state
    }

    fn many(n: usize) -> Vec<CountyRecord> {
        (0..n)
            .map(|i| county(&format!("County {i:03}"), "Ohio", Some(0.5), Some(40.0)))
            .collect()
    }

    #[test]
    fn thresholds_filter_and_reset_page() {
        let mut state = loaded_state(vec![
            county("A", "X", Some(0.95), Some(70.0)),
            county("B", "X", Some(0.40), Some(30.0)),
            county("C", "X", Some(0.99), Some(65.0)),
        ]);
        assert_eq!(state.store.filtered().len(), 3);

        state.page = 2;
        for _ in 0..18 {
            state.adjust_eji(Thresholds::EJI_STEP);
        }
        assert_eq!(state.thresholds.eji_slider, 90);
        assert_eq!(state.page, 1);
        let names: Vec<_> = state.store.filtered().iter().map(|r| r.county.as_str()).collect();
        assert_eq!(names, ["A", "C"]);
    }

    #[test]
    fn sort_survives_threshold_change() {
        let mut state = loaded_state(vec![
            county("A", "X", Some(0.95), Some(70.0)),
            county("B", "X", Some(0.40), Some(30.0)),
            county("C", "X", Some(0.99), Some(65.0)),
        ]);
        state.sort_by_column(TableColumn::EjiPercentile.index());
        state.sort_by_column(TableColumn::EjiPercentile.index());
        assert_eq!(state.store.table_view()[0].county, "C");

        state.adjust_aqi(Thresholds::AQI_STEP * 10);
        let names: Vec<_> = state.store.table_view().iter().map(|r| r.county.as_str()).collect();
        assert_eq!(names, ["C", "A"]);
    }

    #[test]
    fn search_narrows_and_clears() {
        let mut state = loaded_state(vec![
            county("Cook", "Illinois", Some(0.5), Some(40.0)),
            county("Kings", "New York", Some(0.5), Some(40.0)),
        ]);
        state.search_query = "york".to_string();
        state.apply_search();
        assert_eq!(state.store.table_view().len(), 1);

        state.search_query.clear();
        state.apply_search();
        assert_eq!(state.store.table_view().len(), 2);
    }

    #[test]
    fn sorting_search_view_also_orders_filtered_view() {
        let mut state = loaded_state(vec![
            county("Bexar", "Texas", Some(0.5), Some(40.0)),
            county("Kings", "New York", Some(0.5), Some(40.0)),
            county("Albany", "New York", Some(0.5), Some(40.0)),
        ]);
        state.search_query = "new".to_string();
        state.apply_search();
        state.sort_by_column(TableColumn::County.index());

        assert_eq!(state.store.table_view()[0].county, "Albany");
        let names: Vec<_> = state.store.filtered().iter().map(|r| r.county.as_str()).collect();
        assert_eq!(names, ["Albany", "Bexar", "Kings"]);
    }

    #[test]
    fn paging_is_clamped() {
        let mut state = loaded_state(many(250));
        assert_eq!(state.total_pages(), 3);
        assert!(!state.previous_page());
        assert!(state.last_page());
        assert_eq!(state.page, 3);
        assert_eq!(state.visible_rows().len(), 50);
        assert!(!state.next_page());
        assert!(state.first_page());
        assert!(state.go_to_page(99));
        assert_eq!(state.page, 3);
    }

    #[test]
    fn cursor_wraps_within_page() {
        let mut state = loaded_state(many(3));
        state.move_selection_up();
        assert_eq!(state.selected_index, 2);
        state.move_selection_down();
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn map_waits_for_both_datasets() {
        let mut state = AppState::new(Theme::default());
        state.store.fill_counties(many(2));
        assert!(state.request_map_render().is_empty());
        assert_eq!(state.map.status, MapStatus::WaitingForData);

        state.store.fill_eji_counties(many(2));
        let actions = state.request_map_render();
        assert_eq!(actions.len(), 1);
        assert_eq!(state.map.status, MapStatus::LoadingBoundaries);
        assert_eq!(state.map.render_id, 1);
    }

    #[test]
    fn stale_boundaries_are_ignored() {
        let mut state = loaded_state(many(2));
        state.request_map_render();
        state.request_map_render();
        assert_eq!(state.map.render_id, 2);

        assert!(!state.finish_map_render(1, CountyBoundaries::default()));
        assert_eq!(state.map.status, MapStatus::LoadingBoundaries);
        assert!(!state.fail_map_render(1, "timeout"));

        assert!(state.finish_map_render(2, CountyBoundaries::default()));
        assert_eq!(state.map.status, MapStatus::Ready);
        assert_eq!(state.map.unmatched, 2);
    }

    #[test]
    fn cached_boundaries_skip_refetch() {
        let mut state = loaded_state(many(1));
        state.request_map_render();
        let fips = state.map.trace.as_ref().unwrap().locations.clone();
        state.finish_map_render(1, fips.into_iter().collect());

        state.map_mode = MapMode::Aqi;
        assert!(state.request_map_render().is_empty());
        assert_eq!(state.map.status, MapStatus::Ready);
        assert_eq!(state.map.unmatched, 0);
    }

    #[test]
    fn failed_source_dataset_fails_map_inline() {
        let mut state = AppState::new(Theme::default());
        state.store.fill_counties(many(2));
        state.store.mark_failed(Dataset::EjiCounties, "HTTP 500".to_string());

        assert!(state.request_map_render().is_empty());
        assert!(matches!(state.map.status, MapStatus::Failed(_)));
        assert!(state.map_figure().is_none());

        state.map_mode = MapMode::Aqi;
        assert_eq!(state.request_map_render().len(), 1);
        assert!(state.map_figure().is_some());
    }

    #[test]
    fn viewmodel_windows_around_cursor() {
        let mut state = loaded_state(many(100));
        state.selected_index = 99;
        let vm = state.compute_viewmodel(36, 120);
        let MapPanelBody::Waiting = vm.map.body else {
            panic!("map should wait for a render request");
        };

        let available = 36 - TOP_CHROME_ROWS - BOTTOM_CHROME_ROWS;
        assert_eq!(vm.table.rows.len(), available);
        assert!(vm.table.rows.last().unwrap().is_selected);
        assert_eq!(vm.pagination.unwrap().caption, "Showing 1-100 of 100 counties");
    }

    #[test]
    fn viewmodel_marks_sort_and_missing_values() {
        let mut state = loaded_state(vec![county("Cook", "Illinois", Some(0.5), Some(40.0))]);
        state.sort_by_column(2);

        let vm = state.compute_viewmodel(40, 120);
        assert_eq!(vm.table.columns[2].sort, Some(true));
        assert_eq!(vm.table.columns[0].sort, None);
        assert_eq!(vm.table.columns[5].key, Some('6'));
        assert_eq!(vm.table.rows[0].cells[4].tone, CellTone::Missing);
    }

    #[test]
    fn viewmodel_highlights_search_match() {
        let mut state = loaded_state(vec![county("Cook", "Illinois", Some(0.5), Some(40.0))]);
        state.search_query = "ook".to_string();
        state.apply_search();

        let vm = state.compute_viewmodel(40, 120);
        assert_eq!(vm.table.rows[0].cells[0].highlight_ranges, vec![(1, 4)]);
        assert!(vm.table.rows[0].cells[1].highlight_ranges.is_empty());
    }

    #[test]
    fn hotspot_table_is_capped_and_toned() {
        let mut state = AppState::new(Theme::default());
        state.hotspot_limit = 2;
        state.store.fill_hotspots(vec![
            county("A", "X", Some(0.95), Some(70.0)),
            county("B", "X", Some(0.85), Some(50.0)),
            county("C", "X", Some(0.99), Some(65.0)),
        ]);
        state.toggle_table_view();

        let vm = state.compute_viewmodel(40, 120);
        assert_eq!(vm.table.rows.len(), 2);
        assert!(vm.pagination.is_none());
        assert_eq!(vm.table.rows[0].cells[0].tone, CellTone::Strong);
        assert_eq!(vm.table.rows[0].cells[3].tone, CellTone::Critical);
        assert_eq!(vm.table.rows[0].cells[4].tone, CellTone::PoorAir);
        assert_eq!(vm.table.rows[1].cells[3].tone, CellTone::High);
        assert_eq!(vm.table.rows[1].cells[4].tone, CellTone::ModerateAir);
        assert_eq!(vm.table.rows[0].cells[5].text, "N/A / 365");
    }

    #[test]
    fn empty_states_follow_load_status() {
        let mut state = AppState::new(Theme::default());
        assert_eq!(state.compute_viewmodel(40, 120).empty_state.unwrap().message, "Loading county data...");

        state.store.mark_failed(Dataset::Counties, "HTTP 503".to_string());
        let empty = state.compute_viewmodel(40, 120).empty_state.unwrap();
        assert_eq!(empty.message, "No data available");
        assert_eq!(empty.subtitle, "HTTP 503");

        state.store.fill_counties(vec![county("B", "X", Some(0.4), Some(30.0))]);
        state.adjust_eji(50);
        assert_eq!(
            state.compute_viewmodel(40, 120).empty_state.unwrap().message,
            "No data matches current filters"
        );

        state.toggle_table_view();
        state.store.fill_hotspots(vec![]);
        assert_eq!(
            state.compute_viewmodel(40, 120).empty_state.unwrap().message,
            "No hotspots found matching criteria"
        );
    }

    #[test]
    fn summary_panel_states() {
        let mut state = AppState::new(Theme::default());
        assert_eq!(state.compute_viewmodel(40, 120).summary, SummaryInfo::Loading);

        state.store.mark_failed(Dataset::Summary, "down".to_string());
        assert_eq!(state.compute_viewmodel(40, 120).summary, SummaryInfo::Unavailable);

        state.store.fill_summary(Summary {
            total_counties: 3143,
            avg_eji: 0.5,
            avg_median_aqi: 38.6,
            high_risk_counties: 12,
            high_eji_counties: None,
            poor_air_quality_counties: None,
        });
        let SummaryInfo::Loaded(stats) = state.compute_viewmodel(40, 120).summary else {
            panic!("summary should be loaded");
        };
        assert_eq!(stats[0].value, "3,143");
    }

    #[test]
    fn fit_cell_truncates_by_chars() {
        let cell = fit_cell("Doña Ana County".to_string(), 8, CellTone::Normal, Some((2, 6)));
        assert_eq!(cell.text, "Doña A…");
        assert_eq!(cell.highlight_ranges, vec![(2, 6)]);

        let cell = fit_cell("Doña Ana County".to_string(), 5, CellTone::Normal, Some((5, 8)));
        assert!(cell.highlight_ranges.is_empty());
    }
}
