//! Shared rendering utilities and helpers.
//!
//! Low-level helpers used across the UI components: cursor positioning,
//! search match highlighting with proper ANSI escape management, and
//! character-based padding so accented county names line up.
//!
//! # Features
//!
//! - **Match Highlighting**: Renders text with highlighted character ranges
//! - **Selection Awareness**: Restores row colors after each highlight
//! - **UTF-8 Safe**: Operates on character indices, not byte indices

use crate::ui::theme::Theme;
use crate::ui::viewmodel::CellTone;

/// Positions the cursor at a specific row and column.
///
/// Coordinates are 1-indexed (row 1 = first row, col 1 = first column).
pub fn position_cursor(row: usize, col: usize) {
    print!("\u{1b}[{row};{col}H");
}

/// Number of terminal cells `text` occupies, counting one per character.
#[must_use]
pub fn text_width(text: &str) -> usize {
    text.chars().count()
}

/// Cuts `text` to at most `width` characters.
#[must_use]
pub fn clip(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

/// Spaces needed after `text` to fill `width` cells.
#[must_use]
pub fn padding_for(text: &str, width: usize) -> String {
    " ".repeat(width.saturating_sub(text_width(text)))
}

/// Foreground color for a cell tone.
#[must_use]
pub fn tone_color(theme: &Theme, tone: CellTone) -> &str {
    match tone {
        CellTone::Normal | CellTone::Strong => &theme.colors.text_normal,
        CellTone::Missing => &theme.colors.text_dim,
        CellTone::Critical => &theme.colors.critical_fg,
        CellTone::High => &theme.colors.high_fg,
        CellTone::PoorAir => &theme.colors.poor_air_fg,
        CellTone::ModerateAir => &theme.colors.moderate_air_fg,
    }
}

/// Re-applies the base colors of a table row after a reset.
pub fn restore_row_colors(theme: &Theme, is_selected: bool) {
    if is_selected {
        print!("{}", Theme::fg(&theme.colors.selection_fg));
        print!("{}", Theme::bg(&theme.colors.selection_bg));
    } else {
        print!("{}", Theme::fg(&theme.colors.text_normal));
    }
}

/// Renders text with highlighted character ranges for search matches.
///
/// # Parameters
///
/// * `text` - The text to render
/// * `ranges` - Character index ranges to highlight `(start, end)`, end exclusive
/// * `theme` - Active color theme for highlight colors
/// * `is_selected` - Whether the row is selected; its colors are restored
///   after each highlighted section
///
/// Ranges past the end of `text` are clipped.
pub fn render_highlighted_text(text: &str, ranges: &[(usize, usize)], theme: &Theme, is_selected: bool) {
    if ranges.is_empty() {
        print!("{text}");
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.clamp(current_pos, chars.len());
        let end = end.clamp(start, chars.len());

        if start > current_pos {
            let normal_section: String = chars[current_pos..start].iter().collect();
            print!("{normal_section}");
        }

        print!("{}", Theme::fg(&theme.colors.match_highlight_fg));
        print!("{}", Theme::bg(&theme.colors.match_highlight_bg));
        let highlighted_section: String = chars[start..end].iter().collect();
        print!("{highlighted_section}");
        print!("{}", Theme::reset());
        restore_row_colors(theme, is_selected);

        current_pos = end;
    }

    if current_pos < chars.len() {
        let remaining: String = chars[current_pos..].iter().collect();
        print!("{remaining}");
    }
}
