//! Page slicing and page-button layout.
//!
//! Pages are 1-indexed. A view always has at least one page, so an empty view
//! yields a single empty page and the caller shows an empty state instead of a
//! table.
//!
//! # Page Buttons
//!
//! At most [`MAX_PAGE_BUTTONS`] numbered buttons are shown, centred on the
//! current page where possible. The first and last pages stay reachable through
//! extra buttons, separated by an ellipsis when there is a gap:
//!
//! ```text
//! page 1 of 10:   [1] 2 3 4 5 … 10  Next →
//! page 6 of 10:   ← Previous  1 … 4 5 [6] 7 8 … 10  Next →
//! page 10 of 10:  ← Previous  1 … 6 7 8 9 [10]
//! ```

/// Rows per page in the county table.
pub const ITEMS_PER_PAGE: usize = 100;

/// Maximum number of numbered page buttons.
pub const MAX_PAGE_BUTTONS: usize = 5;

/// One page of a view.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    /// Rows on this page.
    pub rows: &'a [T],
    /// Current page, 1-indexed.
    pub page: usize,
    /// Index of the first row on this page within the view.
    pub start_index: usize,
    /// One past the index of the last row on this page.
    pub end_index: usize,
    pub total_pages: usize,
    /// Length of the whole view.
    pub total_rows: usize,
}

impl<T> Page<'_, T> {
    /// `true` when the underlying view has no rows at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_rows == 0
    }

    /// `"Showing 101-200 of 250 counties"`, or `None` for an empty view.
    #[must_use]
    pub fn caption(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        Some(format!(
            "Showing {}-{} of {} counties",
            self.start_index + 1,
            self.end_index,
            crate::domain::county::format_thousands(self.total_rows as u64)
        ))
    }
}

/// Number of pages for a view of `len` rows, never less than one.
#[must_use]
pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size.max(1)).max(1)
}

/// Clamps `page` into `1..=total_pages`.
#[must_use]
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Slices `view` into the requested page.
///
/// Slice bounds are clipped to the view, so a page past the end yields an
/// empty slice rather than panicking.
///
/// # Parameters
///
/// * `view` - Full backing view (filtered or search-filtered)
/// * `page` - 1-indexed page number; `0` is treated as `1`
/// * `page_size` - Rows per page; `0` is treated as `1`
#[must_use]
pub fn paginate<T>(view: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let page = page.max(1);
    let len = view.len();

    let start_index = (page - 1).saturating_mul(page_size).min(len);
    let end_index = start_index.saturating_add(page_size).min(len);

    Page {
        rows: &view[start_index..end_index],
        page,
        start_index,
        end_index,
        total_pages: total_pages(len, page_size),
        total_rows: len,
    }
}

/// One element of the pagination bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageControl {
    /// Go to the given (previous) page.
    Previous(usize),
    /// Numbered button.
    Number { page: usize, current: bool },
    /// Gap between the window and the first/last button.
    Ellipsis,
    /// Go to the given (next) page.
    Next(usize),
}

/// First and last numbered page of the button window.
#[must_use]
pub fn button_window(page: usize, total_pages: usize) -> (usize, usize) {
    let total = total_pages.max(1);
    let page = clamp_page(page, total);

    let mut start = page.saturating_sub(2).max(1);
    let end = (start + MAX_PAGE_BUTTONS - 1).min(total);
    if end - start < MAX_PAGE_BUTTONS - 1 {
        start = (end + 1).saturating_sub(MAX_PAGE_BUTTONS).max(1);
    }
    (start, end)
}

/// Lays out the pagination bar. Empty when there is only one page.
#[must_use]
pub fn page_controls(page: usize, total_pages: usize) -> Vec<PageControl> {
    if total_pages <= 1 {
        return Vec::new();
    }

    let page = clamp_page(page, total_pages);
    let (start, end) = button_window(page, total_pages);
    let mut controls = Vec::with_capacity(MAX_PAGE_BUTTONS + 6);

    if page > 1 {
        controls.push(PageControl::Previous(page - 1));
    }

    if start > 1 {
        controls.push(PageControl::Number { page: 1, current: false });
        if start > 2 {
            controls.push(PageControl::Ellipsis);
        }
    }

    controls.extend((start..=end).map(|n| PageControl::Number { page: n, current: n == page }));

    if end < total_pages {
        if end < total_pages - 1 {
            controls.push(PageControl::Ellipsis);
        }
        controls.push(PageControl::Number { page: total_pages, current: false });
    }

    if page < total_pages {
        controls.push(PageControl::Next(page + 1));
    }

    controls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(controls: &[PageControl]) -> Vec<String> {
        controls
            .iter()
            .map(|c| match c {
                PageControl::Previous(_) => "<".to_string(),
                PageControl::Next(_) => ">".to_string(),
                PageControl::Ellipsis => "…".to_string(),
                PageControl::Number { page, current: true } => format!("[{page}]"),
                PageControl::Number { page, current: false } => page.to_string(),
            })
            .collect()
    }

    #[test]
    fn slices_pages_of_a_250_row_view() {
        let view: Vec<usize> = (0..250).collect();

        let first = paginate(&view, 1, ITEMS_PER_PAGE);
        assert_eq!(first.total_pages, 3);
        assert_eq!((first.start_index, first.end_index), (0, 100));
        assert_eq!(first.rows.len(), 100);

        let last = paginate(&view, 3, ITEMS_PER_PAGE);
        assert_eq!((last.start_index, last.end_index), (200, 250));
        assert_eq!(last.rows.first(), Some(&200));
        assert_eq!(last.caption().as_deref(), Some("Showing 201-250 of 250 counties"));
    }

    #[test]
    fn empty_view_has_one_empty_page() {
        let view: Vec<u8> = Vec::new();
        let page = paginate(&view, 1, ITEMS_PER_PAGE);
        assert_eq!(page.total_pages, 1);
        assert!(page.is_empty());
        assert!(page.rows.is_empty());
        assert_eq!(page.caption(), None);
        assert!(page_controls(1, page.total_pages).is_empty());
    }

    #[test]
    fn out_of_range_page_is_clipped() {
        let view = [1, 2, 3];
        let page = paginate(&view, 7, 2);
        assert!(page.rows.is_empty());
        assert_eq!(page.start_index, 3);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn caption_uses_thousands_separators() {
        let view: Vec<u16> = (0..3143).collect();
        let page = paginate(&view, 2, ITEMS_PER_PAGE);
        assert_eq!(page.caption().as_deref(), Some("Showing 101-200 of 3,143 counties"));
    }

    #[test]
    fn first_page_of_ten() {
        assert_eq!(numbers(&page_controls(1, 10)), ["[1]", "2", "3", "4", "5", "…", "10", ">"]);
    }

    #[test]
    fn last_page_of_ten() {
        assert_eq!(numbers(&page_controls(10, 10)), ["<", "1", "…", "6", "7", "8", "9", "[10]"]);
    }

    #[test]
    fn middle_page_has_both_gaps() {
        assert_eq!(
            numbers(&page_controls(6, 10)),
            ["<", "1", "…", "4", "5", "[6]", "7", "8", "…", "10", ">"]
        );
    }

    #[test]
    fn adjacent_first_page_has_no_ellipsis() {
        assert_eq!(numbers(&page_controls(4, 10)), ["<", "1", "2", "3", "[4]", "5", "6", "…", "10", ">"]);
    }

    #[test]
    fn window_is_never_wider_than_total() {
        assert_eq!(button_window(1, 3), (1, 3));
        assert_eq!(button_window(3, 3), (1, 3));
        assert_eq!(numbers(&page_controls(2, 3)), ["<", "1", "[2]", "3", ">"]);
        for total in 1..=12 {
            for page in 1..=total {
                let (start, end) = button_window(page, total);
                assert_eq!(end - start + 1, total.min(MAX_PAGE_BUTTONS));
                assert!((start..=end).contains(&page));
            }
        }
    }
}
