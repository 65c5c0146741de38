//! Infrastructure layer for filesystem and environment interactions.
//!
//! Resolves where the dashboard keeps its files: the data directory (logs,
//! traces, exported figures) and the config file.

pub mod paths;

pub use paths::{default_config_path, default_export_dir, expand_tilde, get_data_dir, DATA_DIR_ENV};
