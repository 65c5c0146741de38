//! Top-level rendering coordinator.
//!
//! Computes the view model from `AppState` and hands it to the layout for the
//! current input mode.
//!
//! # Example
//!
//! ```rust,no_run
//! use ejiview::app::AppState;
//! use ejiview::ui::{render, Theme};
//!
//! let state = AppState::new(Theme::default());
//! render(&state, 40, 120); // Renders to stdout
//! ```

use crate::app::AppState;
use crate::ui::components;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

/// Renders the dashboard to stdout.
///
/// # Parameters
///
/// * `state` - Current application state
/// * `rows` - Terminal height in rows
/// * `cols` - Terminal width in columns
///
/// # Output
///
/// Prints ANSI-styled output with `print!`. Does not clear the screen or
/// flush stdout; the caller owns the terminal.
pub fn render(state: &AppState, rows: usize, cols: usize) {
    let _span = tracing::trace_span!("render", rows, cols).entered();
    let viewmodel = state.compute_viewmodel(rows, cols);

    render_viewmodel(&viewmodel, &state.theme, rows, cols);
}

fn render_viewmodel(vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) {
    if let Some(search) = &vm.search_bar {
        components::render_search_mode(vm, search, theme, cols, rows);
    } else {
        components::render_normal_mode(vm, theme, cols, rows);
    }
}
