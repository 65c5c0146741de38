//! Error types for the dashboard.
//!
//! This module defines the centralized error type [`DashboardError`] and a type alias
//! [`Result`] used throughout the crate. Data-source failures are split by cause
//! (transport vs. payload) so load paths can log precisely what went wrong while
//! still degrading to an empty dataset slot.

use thiserror::Error;

/// The main error type for dashboard operations.
///
/// # Examples
///
/// ```
/// use ejiview::DashboardError;
///
/// fn validate_page_size(size: usize) -> Result<(), DashboardError> {
///     if size == 0 {
///         return Err(DashboardError::Config("page_size must be at least 1".to_string()));
///     }
///     Ok(())
/// }
///
/// assert!(validate_page_size(0).is_err());
/// ```
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The backend or boundary source could not be reached, or answered with a
    /// non-success status.
    #[error("Network error: {0}")]
    Network(String),

    /// A payload arrived but could not be decoded into the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme parsing failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// A background load could not be dispatched or its result was lost.
    #[error("Loader error: {0}")]
    Loader(String),

    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Writing the map figure failed.
    #[error("Export error: {0}")]
    Export(String),
}

/// A specialized `Result` type for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;
