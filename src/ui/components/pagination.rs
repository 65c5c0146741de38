//! Pagination bar component renderer.

use crate::ui::helpers::{position_cursor, text_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::PaginationInfo;

/// Renders the page caption and buttons on one line.
///
/// ```text
///  Showing 101-200 of 3,143 counties      ← Previous  1  [2]  3  4  5  ...  32  Next →
/// ```
///
/// The current page is bracketed and drawn in the accent color. Buttons that
/// would overflow the line are left off.
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_pagination(row: usize, pagination: &PaginationInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    let caption = format!(" {}", pagination.caption);
    print!("{}{caption}", Theme::fg(&theme.colors.text_dim));
    let mut used = text_width(&caption);

    if !pagination.buttons.is_empty() {
        print!("      ");
        used += 6;
    }

    for button in &pagination.buttons {
        let label = if button.is_current {
            format!("[{}]  ", button.label)
        } else {
            format!("{}  ", button.label)
        };
        let width = text_width(&label);
        if used + width > cols {
            break;
        }

        if button.is_current {
            print!("{}{}{label}{}", Theme::bold(), Theme::fg(&theme.colors.accent), Theme::reset());
        } else {
            print!("{}{label}", Theme::fg(&theme.colors.text_normal));
        }
        used += width;
    }

    print!("{}", " ".repeat(cols.saturating_sub(used)));
    print!("{}", Theme::reset());
    row + 1
}
