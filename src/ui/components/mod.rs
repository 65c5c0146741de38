//! Composable UI component renderers.
//!
//! Each component draws one part of the dashboard at a given row and returns
//! the next free row.
//!
//! # Components
//!
//! - [`header`]: Title bar with the active map mode
//! - [`summary`]: Headline statistics
//! - [`map_panel`]: Choropleth render status, colour scale and legend
//! - [`filters`]: Threshold controls and active table
//! - [`search`]: Search input box
//! - [`table`]: County or hotspot rows with sort indicators
//! - [`empty`]: Message shown in place of an empty table
//! - [`pagination`]: Page caption and buttons
//! - [`status`]: Transient status message
//! - [`footer`]: Key hints
//!
//! # Layout Modes
//!
//! - [`render_normal_mode`]: dashboard without the search bar
//! - [`render_search_mode`]: dashboard with the search bar above the table

mod empty;
mod filters;
mod footer;
mod header;
mod map_panel;
mod pagination;
mod search;
mod status;
mod summary;
mod table;

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{SearchBarInfo, UIViewModel};

use empty::render_empty_state;
use filters::render_filter_bar;
use footer::render_footer;
use header::render_header;
use map_panel::render_map_panel;
use pagination::render_pagination;
use search::render_search_bar;
use status::render_status;
use summary::render_summary;
use table::{render_table_headers, render_table_rows};

/// Renders a horizontal border line at the specified row.
///
/// # Returns
///
/// The next available row position (row + 1)
fn render_border(row: usize, color: &str, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::fg(color));
    print!("{}", "─".repeat(cols));
    print!("{}", Theme::reset());
    row + 1
}

/// Renders everything above the table.
///
/// ```text
/// [blank line]
/// [Header]
/// [Border]
/// [Summary]
/// [Map panel - 3 lines]
/// [Filter bar]
/// [Border]
/// ```
fn render_top(vm: &UIViewModel, theme: &Theme, cols: usize) -> usize {
    let mut current_row = 2;

    current_row = render_header(current_row, &vm.header, theme, cols);
    current_row = render_border(current_row, &theme.colors.border, cols);
    current_row = render_summary(current_row, &vm.summary, theme, cols);
    current_row = render_map_panel(current_row, &vm.map, theme, cols);
    current_row = render_filter_bar(current_row, &vm.filters, theme, cols);
    render_border(current_row, &theme.colors.border, cols)
}

/// Renders the table, or the empty state in its place.
fn render_table_area(row: usize, vm: &UIViewModel, theme: &Theme, cols: usize) -> usize {
    let current_row = render_table_headers(row, &vm.table.columns, theme, cols);
    match &vm.empty_state {
        Some(empty) => render_empty_state(current_row, empty, theme, cols),
        None => render_table_rows(current_row, &vm.table.rows, &vm.table.columns, theme, cols),
    }
}

/// Renders everything below the table, anchored to the bottom of the screen.
///
/// ```text
/// [Pagination]
/// [Status]
/// [Border]
/// [Footer]
/// [blank line]
/// ```
fn render_bottom(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let footer_start = rows.saturating_sub(1);
    let border_row = footer_start.saturating_sub(1);
    let status_row = border_row.saturating_sub(1);
    let pagination_row = status_row.saturating_sub(1);

    if let Some(pagination) = &vm.pagination {
        render_pagination(pagination_row, pagination, theme, cols);
    }
    render_status(status_row, vm.status.as_ref(), theme, cols);
    render_border(border_row, &theme.colors.border, cols);
    render_footer(footer_start, &vm.footer, theme, cols);
}

/// Renders the normal mode layout (no search bar).
///
/// # Line Accounting
///
/// Reserves 16 lines for chrome: 10 above the table rows (including the
/// column headers) and 6 below.
pub fn render_normal_mode(vm: &UIViewModel, theme: &Theme, cols: usize, rows: usize) {
    let current_row = render_top(vm, theme, cols);
    let _current_row = render_table_area(current_row, vm, theme, cols);
    render_bottom(vm, theme, cols, rows);
}

/// Renders the search mode layout, with the 3-line search box above the
/// table.
pub fn render_search_mode(vm: &UIViewModel, search: &SearchBarInfo, theme: &Theme, cols: usize, rows: usize) {
    let mut current_row = render_top(vm, theme, cols);
    current_row = render_search_bar(current_row, search, theme, cols);
    let _current_row = render_table_area(current_row, vm, theme, cols);
    render_bottom(vm, theme, cols, rows);
}
