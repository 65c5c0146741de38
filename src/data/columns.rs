//! Visible columns of the county table.
//!
//! Sorting compares what the user sees, so each column knows how to project a
//! record into its display text.

use crate::domain::CountyRecord;

/// Columns of the main county table, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TableColumn {
    County,
    State,
    EjiPercentile,
    MedianAqi,
    MaxAqi,
    GoodDays,
}

impl TableColumn {
    pub const ALL: [Self; 6] = [
        Self::County,
        Self::State,
        Self::EjiPercentile,
        Self::MedianAqi,
        Self::MaxAqi,
        Self::GoodDays,
    ];

    /// Column at a zero-based display position.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::County => "County",
            Self::State => "State",
            Self::EjiPercentile => "EJI %ile",
            Self::MedianAqi => "Median AQI",
            Self::MaxAqi => "Max AQI",
            Self::GoodDays => "Good Days",
        }
    }

    /// Display width in terminal cells.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::County => 26,
            Self::State => 18,
            Self::EjiPercentile => 10,
            Self::MedianAqi => 12,
            Self::MaxAqi => 9,
            Self::GoodDays => 10,
        }
    }

    /// Text shown in this column for `record`.
    #[must_use]
    pub fn cell(self, record: &CountyRecord) -> String {
        match self {
            Self::County => record.county.clone(),
            Self::State => record.state.clone(),
            Self::EjiPercentile => record.display_eji(),
            Self::MedianAqi => record.display_median_aqi(),
            Self::MaxAqi => record.display_max_aqi(),
            Self::GoodDays => record.display_good_days(),
        }
    }
}
