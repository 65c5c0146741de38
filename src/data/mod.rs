//! County data view engine.
//!
//! Everything here is pure and synchronous: given loaded records and the
//! current control positions it produces the rows the table and map show.
//!
//! - [`filter`]: threshold filtering (EJI percentile and median AQI)
//! - [`search`]: free-text narrowing of the filtered view
//! - [`sort`]: column sorting with per-column direction memory
//! - [`paginate`]: page slicing and page-button layout
//! - [`columns`]: the visible table columns
//! - [`store`]: dataset slots and derived views

pub mod columns;
pub mod filter;
pub mod paginate;
pub mod search;
pub mod sort;
pub mod store;

pub use columns::TableColumn;
pub use filter::{apply_eji_filter, apply_filters, Thresholds};
pub use paginate::{paginate, Page, PageControl, ITEMS_PER_PAGE};
pub use search::apply_search;
pub use sort::SortState;
pub use store::{DataStore, Dataset, LoadState};
