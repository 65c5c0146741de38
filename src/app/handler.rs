//! Event handling and state transition logic.
//!
//! This module implements the core event handler that processes user input
//! and load responses, translating them into state changes and action
//! sequences. It is the primary control flow coordinator for the dashboard.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the terminal or a loader thread
//! 2. [`handle_event`] pattern-matches the event type
//! 3. State mutations occur via `AppState` methods
//! 4. Actions are collected and returned for execution
//!
//! # Event Types
//!
//! - **Navigation**: `KeyDown`, `KeyUp`, paging events
//! - **View controls**: `SortColumn`, `CycleMapMode`, `AdjustEji`, `AdjustAqi`, `ToggleTableView`
//! - **Search input**: `SearchMode`, `Char`, `Backspace`, `ExitSearch`, focus changes
//! - **Loads**: `Loaded` with a typed [`LoadResponse`], `Reload`
//! - **Export**: `ExportMap`, `ExportFinished`
//!
//! # Example
//!
//! ```rust
//! use ejiview::app::{handle_event, AppState, Event};
//! use ejiview::ui::theme::Theme;
//!
//! let mut state = AppState::new(Theme::default());
//! let (_render, actions) = handle_event(&mut state, &Event::Reload)?;
//! assert_eq!(actions.len(), 4);
//! # Ok::<(), ejiview::DashboardError>(())
//! ```

use super::modes::{InputMode, SearchFocus, TableView};
use crate::api::{LoadRequest, LoadResponse};
use crate::app::{Action, AppState};
use crate::data::Dataset;
use crate::domain::error::Result;
use crate::map::MapMode;
use std::path::PathBuf;

/// Events triggered by user input, load responses or finished exports.
///
/// Each event represents a discrete occurrence that may cause state changes
/// and action emissions. The event handler processes these sequentially,
/// ensuring deterministic state transitions.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Moves the row cursor down by one position (wraps to top).
    KeyDown,
    /// Moves the row cursor up by one position (wraps to bottom).
    KeyUp,

    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    /// Jumps to a 1-indexed page, clamped to the valid range.
    GoToPage(usize),

    /// Sorts the county table by a zero-based column, toggling its direction.
    SortColumn(usize),

    /// Advances EJI → AQI → Combined → EJI.
    CycleMapMode,
    SetMapMode(MapMode),

    /// Moves the EJI slider by the given number of points.
    AdjustEji(i32),
    /// Moves the AQI threshold by the given amount.
    AdjustAqi(i32),

    /// Enters search mode with typing focus.
    SearchMode,
    /// Focuses the search input field (from navigating mode).
    FocusSearchBar,
    /// Keeps the query and focuses the results (from typing mode).
    FocusResults,
    /// Exits search mode and clears the query.
    ExitSearch,
    /// Appends a character to the search query.
    Char(char),
    /// Removes the last character from the search query.
    Backspace,

    /// Switches between the county and hotspot tables.
    ToggleTableView,

    /// Exports the current map figure.
    ExportMap,

    /// Re-issues the four dataset loads. Also used for the initial load.
    Reload,

    Quit,

    /// Wraps a response from a loader thread.
    Loaded(LoadResponse),

    /// Reports where an export was written, or why it failed.
    ExportFinished(std::result::Result<PathBuf, String>),
}

impl Event {
    /// Short event name used as a span field.
    ///
    /// Load responses can carry thousands of records, so spans record this
    /// instead of the `Debug` form.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::KeyDown => "key_down",
            Self::KeyUp => "key_up",
            Self::NextPage => "next_page",
            Self::PreviousPage => "previous_page",
            Self::FirstPage => "first_page",
            Self::LastPage => "last_page",
            Self::GoToPage(_) => "go_to_page",
            Self::SortColumn(_) => "sort_column",
            Self::CycleMapMode => "cycle_map_mode",
            Self::SetMapMode(_) => "set_map_mode",
            Self::AdjustEji(_) => "adjust_eji",
            Self::AdjustAqi(_) => "adjust_aqi",
            Self::SearchMode => "search_mode",
            Self::FocusSearchBar => "focus_search_bar",
            Self::FocusResults => "focus_results",
            Self::ExitSearch => "exit_search",
            Self::Char(_) => "char",
            Self::Backspace => "backspace",
            Self::ToggleTableView => "toggle_table_view",
            Self::ExportMap => "export_map",
            Self::Reload => "reload",
            Self::Quit => "quit",
            Self::Loaded(_) => "loaded",
            Self::ExportFinished(_) => "export_finished",
        }
    }
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// # Parameters
///
/// * `state` - Mutable reference to application state
/// * `event` - Event to process
///
/// # Returns
///
/// Whether the screen needs a redraw, plus the actions to execute in order.
///
/// # Errors
///
/// Currently infallible; the `Result` leaves room for state transitions that
/// can fail without changing the call sites.
///
/// # Tracing
///
/// Each call creates a debug-level span with the event name.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = event.name()).entered();

    match event {
        Event::KeyDown => {
            state.move_selection_down();
            Ok((true, vec![]))
        }
        Event::KeyUp => {
            state.move_selection_up();
            Ok((true, vec![]))
        }
        Event::NextPage | Event::PreviousPage | Event::FirstPage | Event::LastPage | Event::GoToPage(_) => {
            if state.table_view != TableView::Counties {
                return Ok((false, vec![]));
            }
            let changed = match event {
                Event::NextPage => state.next_page(),
                Event::PreviousPage => state.previous_page(),
                Event::FirstPage => state.first_page(),
                Event::LastPage => state.last_page(),
                Event::GoToPage(page) => state.go_to_page(*page),
                _ => false,
            };
            tracing::debug!(page = state.page, changed, "page changed");
            Ok((changed, vec![]))
        }
        Event::SortColumn(column) => {
            if state.table_view != TableView::Counties {
                return Ok((false, vec![]));
            }
            Ok((state.sort_by_column(*column), vec![]))
        }
        Event::CycleMapMode => {
            state.map_mode = state.map_mode.cycle();
            tracing::debug!(mode = %state.map_mode, "map mode changed");
            Ok((true, state.request_map_render()))
        }
        Event::SetMapMode(mode) => {
            if state.map_mode == *mode {
                return Ok((false, vec![]));
            }
            state.map_mode = *mode;
            Ok((true, state.request_map_render()))
        }
        Event::AdjustEji(delta) => {
            if !state.adjust_eji(*delta) {
                return Ok((false, vec![]));
            }
            Ok((true, state.request_map_render()))
        }
        Event::AdjustAqi(delta) => {
            if !state.adjust_aqi(*delta) {
                return Ok((false, vec![]));
            }
            Ok((true, state.request_map_render()))
        }
        Event::SearchMode => {
            tracing::debug!("entering search mode");
            state.table_view = TableView::Counties;
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            Ok((true, vec![]))
        }
        Event::FocusSearchBar => {
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            Ok((true, vec![]))
        }
        Event::FocusResults => {
            if state.search_query.is_empty() {
                state.input_mode = InputMode::Normal;
                state.apply_search();
                return Ok((true, vec![]));
            }

            state.input_mode = InputMode::Search(SearchFocus::Navigating);
            Ok((true, vec![]))
        }
        Event::ExitSearch => {
            tracing::debug!(query = %state.search_query, "exiting search mode");
            state.input_mode = InputMode::Normal;
            state.search_query.clear();
            state.apply_search();
            Ok((true, vec![]))
        }
        Event::Char(c) => {
            if state.input_mode != InputMode::Search(SearchFocus::Typing) {
                return Ok((false, vec![]));
            }

            state.search_query.push(*c);
            tracing::trace!(query = %state.search_query, char = %c, "search query updated");
            state.apply_search();
            Ok((true, vec![]))
        }
        Event::Backspace => {
            if state.input_mode != InputMode::Search(SearchFocus::Typing) {
                return Ok((false, vec![]));
            }

            state.search_query.pop();
            state.apply_search();
            Ok((true, vec![]))
        }
        Event::ToggleTableView => {
            state.toggle_table_view();
            Ok((true, vec![]))
        }
        Event::ExportMap => {
            let Some(figure) = state.map_figure() else {
                state.set_status("Map is not ready to export yet", true);
                return Ok((true, vec![]));
            };
            tracing::debug!(locations = figure.data.first().map_or(0, |trace| trace.locations.len()), "exporting map figure");
            Ok((
                false,
                vec![Action::ExportFigure {
                    figure: Box::new(figure),
                    mode: state.map_mode,
                }],
            ))
        }
        Event::Reload => {
            tracing::info!("loading all datasets");
            state.store.mark_reloading();
            state.map.status = super::modes::MapStatus::WaitingForData;
            state.set_status("Loading data...", false);
            let actions = LoadRequest::all_datasets().into_iter().map(Action::Load).collect();
            Ok((true, actions))
        }
        Event::Quit => Ok((false, vec![Action::Quit])),
        Event::Loaded(response) => Ok(handle_load_response(state, response)),
        Event::ExportFinished(result) => {
            match result {
                Ok(path) => {
                    tracing::info!(path = %path.display(), "map figure exported");
                    state.set_status(format!("Map figure written to {}", path.display()), false);
                }
                Err(message) => {
                    tracing::warn!(error = %message, "map export failed");
                    state.set_status(format!("Export failed: {message}"), true);
                }
            }
            Ok((true, vec![]))
        }
    }
}

/// Stores a loaded dataset (or its failure) and starts a map render when the
/// map's inputs changed.
fn handle_load_response(state: &mut AppState, response: &LoadResponse) -> (bool, Vec<Action>) {
    match response {
        LoadResponse::SummaryLoaded { summary } => {
            state.store.fill_summary(summary.clone());
            (true, vec![])
        }
        LoadResponse::CountiesLoaded { records } => {
            state.store.fill_counties(records.clone());
            state.apply_thresholds();
            clear_loading_status(state);
            (true, state.request_map_render())
        }
        LoadResponse::EjiCountiesLoaded { records } => {
            state.store.fill_eji_counties(records.clone());
            (true, state.request_map_render())
        }
        LoadResponse::HotspotsLoaded { records } => {
            state.store.fill_hotspots(records.clone());
            (true, vec![])
        }
        LoadResponse::Failed { dataset, message } => {
            state.store.mark_failed(*dataset, message.clone());
            state.set_status(format!("Failed to load {}: {message}", dataset.label()), true);
            match dataset {
                Dataset::Counties => {
                    state.apply_thresholds();
                    (true, state.request_map_render())
                }
                Dataset::EjiCounties => (true, state.request_map_render()),
                Dataset::Summary | Dataset::Hotspots => (true, vec![]),
            }
        }
        LoadResponse::BoundariesLoaded { render_id, boundaries } => {
            let current = state.finish_map_render(*render_id, boundaries.clone());
            if current {
                tracing::debug!(render_id, boundary_count = boundaries.len(), "map render complete");
            }
            (current, vec![])
        }
        LoadResponse::BoundariesFailed { render_id, message } => {
            let current = state.fail_map_render(*render_id, message);
            if current {
                tracing::warn!(render_id, error = %message, "county boundaries failed to load");
            }
            (current, vec![])
        }
    }
}

fn clear_loading_status(state: &mut AppState) {
    if state.status.as_ref().is_some_and(|status| !status.is_error) {
        state.status = None;
    }
}
