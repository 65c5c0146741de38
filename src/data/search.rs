//! Free-text search over the filtered view.
//!
//! Matching is a case-insensitive substring test against the county name or
//! the state name. Search never widens the view: it always narrows whatever
//! the threshold filter produced.

use crate::domain::CountyRecord;

/// Returns `true` if `query` occurs in the county or state name, ignoring case.
///
/// `query` must already be lowercased.
fn matches_lowered(record: &CountyRecord, query: &str) -> bool {
    record.county.to_lowercase().contains(query) || record.state.to_lowercase().contains(query)
}

/// Narrows `source` to records whose county or state contains `text`.
///
/// An empty `text` returns the input unchanged.
///
/// # Example
///
/// ```rust
/// use ejiview::data::search::apply_search;
/// use ejiview::domain::CountyRecord;
///
/// let rows = vec![
///     CountyRecord { county: "Cook".into(), state: "Illinois".into(), ..Default::default() },
///     CountyRecord { county: "Kings".into(), state: "New York".into(), ..Default::default() },
/// ];
///
/// assert_eq!(apply_search(&rows, "YORK").len(), 1);
/// assert_eq!(apply_search(&rows, "").len(), 2);
/// ```
#[must_use]
pub fn apply_search(source: &[CountyRecord], text: &str) -> Vec<CountyRecord> {
    if text.is_empty() {
        return source.to_vec();
    }

    let _span = tracing::debug_span!("apply_search", source_len = source.len(), query_len = text.len()).entered();

    let query = text.to_lowercase();
    let result: Vec<CountyRecord> = source
        .iter()
        .filter(|record| matches_lowered(record, &query))
        .cloned()
        .collect();

    tracing::debug!(match_count = result.len(), "search applied");
    result
}

/// Character range `(start, end)` of the first case-insensitive occurrence of
/// `query` in `text`, used for highlighting.
///
/// Indices are character positions in `text`, end exclusive.
#[must_use]
pub fn match_range(text: &str, query: &str) -> Option<(usize, usize)> {
    if query.is_empty() {
        return None;
    }

    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();

    let mut lowered = Vec::with_capacity(text.len());
    let mut owner = Vec::with_capacity(text.len());
    for (idx, ch) in text.chars().enumerate() {
        for lower in ch.to_lowercase() {
            lowered.push(lower);
            owner.push(idx);
        }
    }

    if needle.len() > lowered.len() {
        return None;
    }

    (0..=lowered.len() - needle.len())
        .find(|&start| lowered[start..start + needle.len()] == needle[..])
        .map(|start| (owner[start], owner[start + needle.len() - 1] + 1))
}
