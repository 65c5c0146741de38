//! Header component renderer.
//!
//! Renders the dashboard title bar with centered text, theme-aware colors,
//! and optional background styling.

use crate::ui::helpers::{position_cursor, text_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the header title bar at the specified row.
///
/// # Parameters
///
/// * `row` - Row position to render the header (1-indexed)
/// * `header` - Header information (title text)
/// * `theme` - Active color theme
/// * `cols` - Terminal width in columns
///
/// # Returns
///
/// The next available row position (row + 1)
///
/// # Layout
///
/// ```text
/// [left padding] TITLE [right padding]
/// ```
pub fn render_header(row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let title_len = text_width(&header.title);
    let padding = (cols.saturating_sub(title_len)) / 2;

    position_cursor(row, 1);
    print!("{}", Theme::bold());
    print!("{}", Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        print!("{}", Theme::bg(bg));
    }

    print!("{}", " ".repeat(padding));
    print!("{}", header.title);
    print!("{}", " ".repeat(cols.saturating_sub(padding + title_len)));

    print!("{}", Theme::reset());
    row + 1
}
