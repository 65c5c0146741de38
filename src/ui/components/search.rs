//! Search bar component renderer.
//!
//! Renders the search input box with a bordered frame and the query text.

use crate::ui::helpers::{clip, padding_for, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

/// Horizontal margin for the search box (spaces on left and right).
const SEARCH_BOX_MARGIN: usize = 5;

/// Renders the search input box at the specified row.
///
/// # Returns
///
/// The next available row position (row + 3, since the box uses 3 lines)
///
/// # Layout
///
/// ```text
/// [margin] ┌──────────────────────┐ [margin]
/// [margin] │ Search: cook▏        │ [margin]
/// [margin] └──────────────────────┘ [margin]
/// ```
///
/// The caret is shown while typing. While navigating results the border is
/// dimmed to show that keys go to the table.
pub fn render_search_bar(row: usize, search: &SearchBarInfo, theme: &Theme, cols: usize) -> usize {
    let box_width = cols.saturating_sub(SEARCH_BOX_MARGIN * 2);
    let inner_width = box_width.saturating_sub(2);
    let border_color = if search.typing {
        &theme.colors.search_bar_border
    } else {
        &theme.colors.border
    };

    position_cursor(row, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{}", Theme::fg(border_color));
    print!("┌{}┐", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    let caret = if search.typing { "▏" } else { "" };
    let search_text = clip(&format!(" Search: {}{caret}", search.query), inner_width);

    position_cursor(row + 1, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{}", Theme::fg(border_color));
    print!("│");
    print!("{}", Theme::fg(&theme.colors.text_normal));
    print!("{search_text}");
    print!("{}", padding_for(&search_text, inner_width));
    print!("{}", Theme::fg(border_color));
    print!("│");
    print!("{}", Theme::reset());

    position_cursor(row + 2, 1);
    print!("{}", " ".repeat(SEARCH_BOX_MARGIN));
    print!("{}", Theme::fg(border_color));
    print!("└{}┘", "─".repeat(inner_width));
    print!("{}", Theme::reset());

    row + 3
}
