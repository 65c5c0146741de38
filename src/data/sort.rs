//! Column sorting with per-column direction memory.
//!
//! Each column remembers its own direction for the whole session: the first
//! sort on a column is ascending and every repeat flips it. Cells are compared
//! by their displayed text. When both cells start with a number (`"51.2%"`,
//! `"12"`) they compare numerically, otherwise as case-insensitive text.
//! Numeric cells order before non-numeric ones, which keeps `N/A` cells together
//! at the end of an ascending sort.
//!
//! Sorting works on the full backing view rather than only the visible page,
//! and [`SortState::reapply`] restores the active order after the view is
//! recomputed.
//!
//! # Example
//!
//! ```rust
//! use ejiview::data::sort::SortState;
//!
//! let mut rows = vec![vec!["9".to_string()], vec!["10".to_string()], vec!["2".to_string()]];
//! let mut sort = SortState::default();
//!
//! assert!(sort.sort(&mut rows, 0));
//! let column: Vec<&str> = rows.iter().map(|r| r[0].as_str()).collect();
//! assert_eq!(column, ["2", "9", "10"]);
//! ```

use super::columns::TableColumn;
use crate::domain::CountyRecord;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// A row that can be projected into displayed cells by column index.
pub trait SortableRow {
    /// Display text of the cell at `column`; empty for an unknown column.
    fn cell(&self, column: usize) -> Cow<'_, str>;
}

impl SortableRow for CountyRecord {
    fn cell(&self, column: usize) -> Cow<'_, str> {
        TableColumn::from_index(column).map_or(Cow::Borrowed(""), |col| Cow::Owned(col.cell(self)))
    }
}

impl SortableRow for Vec<String> {
    fn cell(&self, column: usize) -> Cow<'_, str> {
        self.get(column).map_or(Cow::Borrowed(""), |s| Cow::Borrowed(s.as_str()))
    }
}

/// Parses the leading numeric prefix of `text`, like a lenient float parser
/// would: leading whitespace is skipped and trailing text is ignored.
///
/// Returns `None` when the text does not start with a number.
#[must_use]
pub fn parse_leading_number(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return Some(if bytes.first() == Some(&b'-') { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let int_start = end;
    while end < len && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < len && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < len && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Case-insensitive text order; on a case-only tie lowercase sorts first.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Ascending comparison of two displayed cells.
#[must_use]
pub fn compare_cells(a: &str, b: &str) -> Ordering {
    match (parse_leading_number(a), parse_leading_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => compare_text(a, b),
    }
}

/// Sorts `rows` by the cell at `column`.
///
/// Descending order is the exact reverse of the ascending order, ties
/// included.
pub fn sort_rows<R: SortableRow>(rows: &mut [R], column: usize, ascending: bool) {
    rows.sort_by(|a, b| compare_cells(&a.cell(column), &b.cell(column)));
    if !ascending {
        rows.reverse();
    }
}

/// Session-long sort memory: one direction per column plus the active sort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    /// `true` = last sort on this column was ascending.
    directions: BTreeMap<usize, bool>,
    active: Option<(usize, bool)>,
}

impl SortState {
    /// Flips the direction for `column` and makes it the active sort.
    ///
    /// Returns `true` for ascending. The first toggle of a column is ascending.
    pub fn toggle(&mut self, column: usize) -> bool {
        let ascending = !self.directions.get(&column).copied().unwrap_or(false);
        self.directions.insert(column, ascending);
        self.active = Some((column, ascending));
        ascending
    }

    /// Toggles `column` and sorts `rows` by it. Returns `true` for ascending.
    pub fn sort<R: SortableRow>(&mut self, rows: &mut [R], column: usize) -> bool {
        let _span = tracing::debug_span!("sort_rows", column, row_count = rows.len()).entered();

        let ascending = self.toggle(column);
        sort_rows(rows, column, ascending);

        tracing::debug!(ascending, "rows sorted");
        ascending
    }

    /// Re-sorts `rows` by the active column without changing any direction.
    pub fn reapply<R: SortableRow>(&self, rows: &mut [R]) {
        if let Some((column, ascending)) = self.active {
            sort_rows(rows, column, ascending);
        }
    }

    /// Last direction used for `column`, if it has ever been sorted.
    #[must_use]
    pub fn direction(&self, column: usize) -> Option<bool> {
        self.directions.get(&column).copied()
    }

    #[must_use]
    pub const fn active(&self) -> Option<(usize, bool)> {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(values: &[&str]) -> Vec<Vec<String>> {
        values.iter().map(|v| vec![(*v).to_string()]).collect()
    }

    fn column(rows: &[Vec<String>]) -> Vec<&str> {
        rows.iter().map(|r| r[0].as_str()).collect()
    }

    #[test]
    fn numeric_strings_sort_numerically() {
        let mut data = rows(&["9", "10", "2"]);
        sort_rows(&mut data, 0, true);
        assert_eq!(column(&data), ["2", "9", "10"]);
    }

    #[test]
    fn first_click_ascending_then_alternates() {
        let mut sort = SortState::default();
        let mut data = rows(&["b", "a", "c"]);

        assert!(sort.sort(&mut data, 0));
        assert_eq!(column(&data), ["a", "b", "c"]);

        assert!(!sort.sort(&mut data, 0));
        assert_eq!(column(&data), ["c", "b", "a"]);

        assert!(sort.sort(&mut data, 0));
        assert_eq!(sort.direction(0), Some(true));
        assert_eq!(sort.direction(1), None);
    }

    #[test]
    fn directions_are_tracked_per_column() {
        let mut sort = SortState::default();
        assert!(sort.toggle(2));
        assert!(sort.toggle(3));
        assert!(!sort.toggle(2));
        assert_eq!(sort.active(), Some((2, false)));
        assert_eq!(sort.direction(3), Some(true));
    }

    #[test]
    fn descending_is_exact_reverse_of_ascending_with_ties() {
        let mut data = vec![
            vec!["5".to_string(), "first".to_string()],
            vec!["1".to_string(), "x".to_string()],
            vec!["5".to_string(), "second".to_string()],
            vec!["N/A".to_string(), "y".to_string()],
        ];
        sort_rows(&mut data, 0, true);
        let ascending = data.clone();
        sort_rows(&mut data, 0, false);

        let mut reversed = ascending;
        reversed.reverse();
        assert_eq!(data, reversed);
    }

    #[test]
    fn displayed_percentages_and_missing_values() {
        let mut data = rows(&["N/A", "51.2%", "9.0%", "100.0%"]);
        sort_rows(&mut data, 0, true);
        assert_eq!(column(&data), ["9.0%", "51.2%", "100.0%", "N/A"]);
    }

    #[test]
    fn text_compares_case_insensitively() {
        let mut data = rows(&["banks", "Adams", "allen", "Baker"]);
        sort_rows(&mut data, 0, true);
        assert_eq!(column(&data), ["Adams", "allen", "Baker", "banks"]);
    }

    #[test]
    fn leading_number_parsing() {
        assert_eq!(parse_leading_number("51.2%"), Some(51.2));
        assert_eq!(parse_leading_number("  -3e2x"), Some(-300.0));
        assert_eq!(parse_leading_number("12 / 365"), Some(12.0));
        assert_eq!(parse_leading_number(".5"), Some(0.5));
        assert_eq!(parse_leading_number("7e"), Some(7.0));
        assert_eq!(parse_leading_number("N/A"), None);
        assert_eq!(parse_leading_number("."), None);
        assert_eq!(parse_leading_number("-"), None);
        assert_eq!(parse_leading_number(""), None);
    }

    #[test]
    fn reapply_keeps_active_order_without_toggling() {
        let mut sort = SortState::default();
        let mut data = rows(&["3", "1", "2"]);
        sort.sort(&mut data, 0);
        sort.sort(&mut data, 0);

        let mut fresh = rows(&["1", "3", "2"]);
        sort.reapply(&mut fresh);
        assert_eq!(column(&fresh), ["3", "2", "1"]);
        assert_eq!(sort.active(), Some((0, false)));
    }

    #[test]
    fn county_records_sort_by_displayed_column() {
        let mut records = vec![
            CountyRecord { county: "A".into(), eji_percentile: Some(0.95), ..CountyRecord::default() },
            CountyRecord { county: "B".into(), eji_percentile: None, ..CountyRecord::default() },
            CountyRecord { county: "C".into(), eji_percentile: Some(0.09), ..CountyRecord::default() },
        ];
        sort_rows(&mut records, TableColumn::EjiPercentile.index(), true);
        let names: Vec<&str> = records.iter().map(|r| r.county.as_str()).collect();
        assert_eq!(names, ["C", "A", "B"]);
    }
}
