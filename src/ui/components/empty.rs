//! Empty state component renderer.
//!
//! Shown in place of the table when the active view has no rows: still
//! loading, failed to load, or filtered down to nothing.

use crate::ui::helpers::{position_cursor, text_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;

/// Renders the empty state message starting two rows below `row`.
///
/// # Layout
///
/// ```text
/// [blank line]
/// [blank line]
/// [left padding] MESSAGE [right padding]
/// [left padding] subtitle [right padding]
/// ```
///
/// The message uses `empty_state_fg`, the subtitle `text_dim` with dim styling.
///
/// # Returns
///
/// The row after the subtitle.
pub fn render_empty_state(row: usize, empty: &EmptyState, theme: &Theme, cols: usize) -> usize {
    let message_row = row + 2;

    let msg_len = text_width(&empty.message);
    let msg_padding = (cols.saturating_sub(msg_len)) / 2;

    position_cursor(message_row, 1);
    print!("{}", Theme::fg(&theme.colors.empty_state_fg));
    print!("{}", " ".repeat(msg_padding));
    print!("{}", empty.message);
    print!("{}", " ".repeat(cols.saturating_sub(msg_padding + msg_len)));
    print!("{}", Theme::reset());

    let sub_len = text_width(&empty.subtitle);
    let sub_padding = (cols.saturating_sub(sub_len)) / 2;

    position_cursor(message_row + 1, 1);
    print!("{}", Theme::dim());
    print!("{}", Theme::fg(&theme.colors.text_dim));
    print!("{}", " ".repeat(sub_padding));
    print!("{}", empty.subtitle);
    print!("{}", " ".repeat(cols.saturating_sub(sub_padding + sub_len)));
    print!("{}", Theme::reset());

    message_row + 2
}
