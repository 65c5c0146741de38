//! Footer component renderer.
//!
//! Renders the key hint bar, centered and dimmed.

use crate::ui::helpers::{clip, position_cursor, text_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;

/// Renders the footer help bar at the specified row.
///
/// Hints wider than the terminal are cut to fit.
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_footer(row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) -> usize {
    let help_text = clip(&footer.keybindings, cols);
    let text_len = text_width(&help_text);
    let padding = (cols.saturating_sub(text_len)) / 2;

    position_cursor(row, 1);
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{}", " ".repeat(padding));
    print!("{help_text}");
    print!("{}", " ".repeat(cols.saturating_sub(padding + text_len)));
    print!("{}", Theme::reset());
    row + 1
}
