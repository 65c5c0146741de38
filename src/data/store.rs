//! Dataset slots and derived views.
//!
//! [`DataStore`] owns everything the backend delivered plus the two derived
//! views the table is built from. Each dataset loads independently; a failed
//! load leaves its slot empty and records the failure so the UI can show "no
//! data" for that part while the rest keeps working.
//!
//! # Derived Views
//!
//! ```text
//! all ──apply_filters──▶ filtered (generation N) ──apply_search──▶ search view (tagged N)
//! ```
//!
//! Replacing the filtered view bumps its generation and drops the search view.
//! A search view is only served while its tag matches the current generation,
//! so a search computed against an older filter result can never leak into
//! the table.

use crate::domain::{CountyRecord, Summary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The independently loaded backend datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Dataset {
    Summary,
    /// Merged EJI + AQI records (`all`).
    Counties,
    /// Every county with EJI data, with or without air-quality monitoring.
    EjiCounties,
    Hotspots,
}

impl Dataset {
    pub const ALL: [Self; 4] = [Self::Summary, Self::Hotspots, Self::EjiCounties, Self::Counties];

    /// Backend path serving this dataset.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Summary => "/api/summary",
            Self::Counties => "/api/data",
            Self::EjiCounties => "/api/eji_data",
            Self::Hotspots => "/api/hotspots",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Counties => "county data",
            Self::EjiCounties => "EJI data",
            Self::Hotspots => "hotspots",
        }
    }
}

/// Load progress of one dataset slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Pending,
    Loaded,
    /// The load failed; the slot is empty.
    Failed(String),
}

impl LoadState {
    /// `true` once the load finished, successfully or not.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

#[derive(Debug, Clone)]
struct SearchView {
    generation: u64,
    query: String,
    rows: Vec<CountyRecord>,
}

/// Explicit container for loaded datasets and the table's derived views.
#[derive(Debug, Clone, Default)]
pub struct DataStore {
    all: Vec<CountyRecord>,
    eji_only: Vec<CountyRecord>,
    hotspots: Vec<CountyRecord>,
    summary: Option<Summary>,
    status: BTreeMap<Dataset, LoadState>,

    filtered: Vec<CountyRecord>,
    generation: u64,
    search: Option<SearchView>,
}

impl DataStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn all(&self) -> &[CountyRecord] {
        &self.all
    }

    #[must_use]
    pub fn eji_only(&self) -> &[CountyRecord] {
        &self.eji_only
    }

    #[must_use]
    pub fn hotspots(&self) -> &[CountyRecord] {
        &self.hotspots
    }

    #[must_use]
    pub const fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub fn status(&self, dataset: Dataset) -> LoadState {
        self.status.get(&dataset).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn is_settled(&self, dataset: Dataset) -> bool {
        self.status.get(&dataset).is_some_and(LoadState::is_settled)
    }

    /// Marks every slot pending again ahead of a reload. Loaded data stays
    /// visible until the replacement arrives.
    pub fn mark_reloading(&mut self) {
        for dataset in Dataset::ALL {
            self.status.insert(dataset, LoadState::Pending);
        }
    }

    pub fn fill_summary(&mut self, summary: Summary) {
        self.summary = Some(summary);
        self.status.insert(Dataset::Summary, LoadState::Loaded);
    }

    pub fn fill_counties(&mut self, records: Vec<CountyRecord>) {
        tracing::debug!(count = records.len(), "county data stored");
        self.all = records;
        self.status.insert(Dataset::Counties, LoadState::Loaded);
    }

    pub fn fill_eji_counties(&mut self, records: Vec<CountyRecord>) {
        tracing::debug!(count = records.len(), "EJI data stored");
        self.eji_only = records;
        self.status.insert(Dataset::EjiCounties, LoadState::Loaded);
    }

    pub fn fill_hotspots(&mut self, records: Vec<CountyRecord>) {
        self.hotspots = records;
        self.status.insert(Dataset::Hotspots, LoadState::Loaded);
    }

    /// Records a failed load and empties the slot.
    pub fn mark_failed(&mut self, dataset: Dataset, message: String) {
        tracing::warn!(dataset = dataset.label(), error = %message, "dataset load failed");
        match dataset {
            Dataset::Summary => self.summary = None,
            Dataset::Counties => self.all.clear(),
            Dataset::EjiCounties => self.eji_only.clear(),
            Dataset::Hotspots => self.hotspots.clear(),
        }
        self.status.insert(dataset, LoadState::Failed(message));
    }

    #[must_use]
    pub fn filtered(&self) -> &[CountyRecord] {
        &self.filtered
    }

    /// Mutable access for in-place sorting. Does not bump the generation.
    pub fn filtered_mut(&mut self) -> &mut [CountyRecord] {
        &mut self.filtered
    }

    /// Generation of the current filtered view.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Replaces the filtered view, invalidating any search view.
    pub fn set_filtered(&mut self, rows: Vec<CountyRecord>) {
        self.filtered = rows;
        self.generation += 1;
        self.search = None;
    }

    /// Stores a search result computed against the current filtered view.
    pub fn set_search(&mut self, query: &str, rows: Vec<CountyRecord>) {
        self.search = Some(SearchView {
            generation: self.generation,
            query: query.to_string(),
            rows,
        });
    }

    pub fn clear_search(&mut self) {
        self.search = None;
    }

    /// The search view, if one exists for the current filtered view.
    #[must_use]
    pub fn search_view(&self) -> Option<&[CountyRecord]> {
        self.search
            .as_ref()
            .filter(|view| view.generation == self.generation)
            .map(|view| view.rows.as_slice())
    }

    /// Query the current search view was computed for.
    #[must_use]
    pub fn search_query(&self) -> Option<&str> {
        self.search
            .as_ref()
            .filter(|view| view.generation == self.generation)
            .map(|view| view.query.as_str())
    }

    /// Rows the table pages through: the search view when one is current,
    /// otherwise the filtered view.
    #[must_use]
    pub fn table_view(&self) -> &[CountyRecord] {
        self.search_view().unwrap_or(&self.filtered)
    }

    /// Mutable access to the table view, for in-place sorting.
    pub fn table_view_mut(&mut self) -> &mut [CountyRecord] {
        let generation = self.generation;
        match self.search.as_mut() {
            Some(view) if view.generation == generation => &mut view.rows,
            _ => &mut self.filtered,
        }
    }
}
