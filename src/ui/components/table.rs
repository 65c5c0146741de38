//! Table component renderer.
//!
//! Renders the county or hotspot table: a header line with sort indicators and
//! shortcut keys, then one line per row with per-cell tones, search match
//! highlighting and a full-width selection bar.

use crate::ui::helpers::{self, padding_for, position_cursor, text_width};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{Cell, CellTone, ColumnHeader, TableRow};

/// Header text for a column: `"EJI %ile ▼ [3]"`.
fn header_label(column: &ColumnHeader) -> String {
    let mut label = column.label.clone();
    match column.sort {
        Some(true) => label.push_str(" ▲"),
        Some(false) => label.push_str(" ▼"),
        None => {}
    }
    if let Some(key) = column.key {
        label.push_str(&format!(" [{key}]"));
    }
    label
}

/// Renders the column headers at the specified row.
///
/// The active sort column is drawn in the accent color. Labels longer than the
/// column are cut.
///
/// # Returns
///
/// The next available row position (row + 1)
pub fn render_table_headers(row: usize, columns: &[ColumnHeader], theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    print!("{}", Theme::bold());

    let mut used = 0;
    for (column, width) in columns.iter().zip(drawn_widths(columns)) {
        let label = helpers::clip(&header_label(column), width.saturating_sub(1));
        let color = if column.sort.is_some() {
            &theme.colors.accent
        } else {
            &theme.colors.header_fg
        };
        print!("{}", Theme::fg(color));
        print!("{label}{}", padding_for(&label, width));
        used += width;
    }
    print!("{}", " ".repeat(cols.saturating_sub(used)));

    print!("{}", Theme::reset());
    row + 1
}

/// Column widths as drawn. A column widens, by up to six cells, to fit its
/// sort arrow and key hint.
fn drawn_widths(columns: &[ColumnHeader]) -> Vec<usize> {
    columns
        .iter()
        .map(|column| column.width.max(text_width(&header_label(column)) + 1).min(column.width + 6))
        .collect()
}

/// Renders all rows starting at the specified row.
///
/// # Returns
///
/// The next available row position (row + number of rows)
pub fn render_table_rows(row: usize, rows: &[TableRow], columns: &[ColumnHeader], theme: &Theme, cols: usize) -> usize {
    let widths = drawn_widths(columns);
    let mut current_row = row;
    for table_row in rows {
        current_row = render_table_row(current_row, table_row, &widths, theme, cols);
    }
    current_row
}

/// Renders a single row.
///
/// # Styling Precedence
///
/// 1. Selection colors (if `is_selected`), overriding cell tones
/// 2. Search match highlights
/// 3. Cell tone color
///
/// The row is padded to the terminal width so the selection bar spans it.
fn render_table_row(row: usize, table_row: &TableRow, widths: &[usize], theme: &Theme, cols: usize) -> usize {
    position_cursor(row, 1);
    helpers::restore_row_colors(theme, table_row.is_selected);

    let mut used = 0;
    for (cell, &width) in table_row.cells.iter().zip(widths) {
        render_cell(cell, width, theme, table_row.is_selected);
        used += width;
    }
    print!("{}", " ".repeat(cols.saturating_sub(used)));

    print!("{}", Theme::reset());
    row + 1
}

fn render_cell(cell: &Cell, width: usize, theme: &Theme, is_selected: bool) {
    if !is_selected {
        print!("{}", Theme::fg(helpers::tone_color(theme, cell.tone)));
    }
    if cell.tone == CellTone::Strong {
        print!("{}", Theme::bold());
    }

    helpers::render_highlighted_text(&cell.text, &cell.highlight_ranges, theme, is_selected);

    if cell.tone == CellTone::Strong {
        print!("{}", Theme::reset());
        helpers::restore_row_colors(theme, is_selected);
    }
    print!("{}", " ".repeat(width.saturating_sub(text_width(&cell.text))));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(label: &str, width: usize, key: Option<char>, sort: Option<bool>) -> ColumnHeader {
        ColumnHeader {
            label: label.to_string(),
            width,
            key,
            sort,
        }
    }

    #[test]
    fn header_label_shows_direction_and_key() {
        assert_eq!(header_label(&column("County", 26, Some('1'), None)), "County [1]");
        assert_eq!(header_label(&column("EJI %ile", 10, Some('3'), Some(false))), "EJI %ile ▼ [3]");
        assert_eq!(header_label(&column("State", 16, None, Some(true))), "State ▲");
    }

    #[test]
    fn drawn_width_grows_for_long_headers() {
        let widths = drawn_widths(&[
            column("County", 26, Some('1'), None),
            column("EJI %ile", 10, Some('3'), Some(true)),
        ]);
        assert_eq!(widths, vec![26, 15]);
    }
}
