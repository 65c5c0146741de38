//! Filter bar component renderer.

use crate::ui::helpers::{position_cursor, text_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FilterBarInfo;

/// Width of the EJI slider track in cells.
const SLIDER_WIDTH: usize = 20;

/// Renders the threshold controls and the active table on one line.
///
/// ```text
///  EJI ≥ 0.90 [━━━━━━━━━━━━━━━━━━──]   AQI ≥ 50   Table: Counties
/// ```
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_filter_bar(row: usize, filters: &FilterBarInfo, theme: &Theme, cols: usize) -> usize {
    let filled = usize::from(filters.eji_slider) * SLIDER_WIDTH / 100;

    position_cursor(row, 1);

    let eji_label = format!(" EJI ≥ {:.2} ", f64::from(filters.eji_slider) / 100.0);
    print!("{}{eji_label}", Theme::fg(&theme.colors.text_normal));
    print!("{}[", Theme::fg(&theme.colors.border));
    print!("{}{}", Theme::fg(&theme.colors.accent), "━".repeat(filled));
    print!("{}{}", Theme::fg(&theme.colors.border), "─".repeat(SLIDER_WIDTH - filled));
    print!("]");

    let rest = format!("   AQI ≥ {}   Table: {}", filters.aqi_threshold, filters.view_label);
    print!("{}{rest}", Theme::fg(&theme.colors.text_normal));

    let used = text_width(&eji_label) + SLIDER_WIDTH + 2 + text_width(&rest);
    print!("{}", " ".repeat(cols.saturating_sub(used)));
    print!("{}", Theme::reset());
    row + 1
}
