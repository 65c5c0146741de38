//! Platform path resolution.
//!
//! Data and config locations come from `dirs`, with `EJIVIEW_DATA_DIR` as an
//! override for the data directory. Paths read from configuration may start
//! with `~`.

use std::path::PathBuf;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "EJIVIEW_DATA_DIR";

const APP_DIR: &str = "ejiview";

/// Returns the directory for logs, traces and exports.
///
/// Resolution order:
/// 1. `$EJIVIEW_DATA_DIR` (tilde expanded) when set and non-empty
/// 2. `<platform data dir>/ejiview`, e.g. `~/.local/share/ejiview` on Linux
/// 3. `./.ejiview` when the platform has no data directory
#[must_use]
pub fn get_data_dir() -> PathBuf {
    data_dir_from(std::env::var(DATA_DIR_ENV).ok().as_deref())
}

fn data_dir_from(override_dir: Option<&str>) -> PathBuf {
    match override_dir.map(str::trim).filter(|dir| !dir.is_empty()) {
        Some(dir) => expand_tilde(dir),
        None => dirs::data_dir().map_or_else(|| PathBuf::from(".ejiview"), |dir| dir.join(APP_DIR)),
    }
}

/// Returns `<platform config dir>/ejiview/config.toml`, if the platform has a
/// config directory.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

/// Default destination for exported map figures: `<data dir>/exports`.
#[must_use]
pub fn default_export_dir() -> PathBuf {
    get_data_dir().join("exports")
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and all paths when the home directory is
/// unknown, are returned unchanged.
///
/// # Examples
///
/// ```
/// use ejiview::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/srv/eji"), PathBuf::from("/srv/eji"));
/// if let Some(home) = dirs::home_dir() {
///     assert_eq!(expand_tilde("~/exports"), home.join("exports"));
/// }
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path, home) {
        ("~", Some(home)) => home,
        (path, Some(home)) if path.starts_with("~/") => home.join(&path[2..]),
        (path, _) => PathBuf::from(path),
    }
}
