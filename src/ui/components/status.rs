//! Status line component renderer.

use crate::ui::helpers::{clip, position_cursor, text_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::StatusInfo;

/// Renders the transient status message, or clears the line.
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_status(row: usize, status: Option<&StatusInfo>, theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);

    let used = match status {
        Some(status) => {
            let color = if status.is_error {
                &theme.colors.error_fg
            } else {
                &theme.colors.good_fg
            };
            let text = clip(&format!(" {}", status.message), cols);
            print!("{}{text}", Theme::fg(color));
            text_width(&text)
        }
        None => 0,
    };

    print!("{}", " ".repeat(cols.saturating_sub(used)));
    print!("{}", Theme::reset());
    row + 1
}
