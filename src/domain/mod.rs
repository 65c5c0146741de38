//! Domain layer for the dashboard.
//!
//! This module contains the core record types and the crate error type,
//! independent of the backend transport, the terminal, or the map renderer.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`county`]: County record, summary statistics and display formatting
//!
//! # Examples
//!
//! ```
//! use ejiview::domain::{CountyRecord, Result};
//!
//! fn parse_row(json: &str) -> Result<CountyRecord> {
//!     serde_json::from_str(json)
//!         .map_err(|e| ejiview::DashboardError::Decode(e.to_string()))
//! }
//!
//! assert!(parse_row(r#"{"COUNTY": "Kern"}"#).is_ok());
//! ```

pub mod county;
pub mod error;

pub use county::{CountyRecord, Summary, MISSING};
pub use error::{DashboardError, Result};
