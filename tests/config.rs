//! Config file parsing and validation.

use ejiview::{initialize, Config, DashboardError, MapMode};
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn partial_file_keeps_defaults() {
    let file = write_config(
        r#"
api_base_url = "http://eji.internal:8080"
map_mode = "combined"
eji_threshold = 75
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.api_base_url, "http://eji.internal:8080");
    assert_eq!(config.map_mode, MapMode::Combined);
    assert_eq!(config.eji_threshold, 75);
    assert_eq!(config.page_size, 100);
    assert_eq!(config.hotspot_limit, 20);
    assert!(config.validate().is_ok());
}

#[test]
fn explicit_path_must_exist() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(matches!(Config::load(Some(&missing)), Err(DashboardError::Io(_))));
}

#[test]
fn malformed_file_is_a_config_error() {
    let file = write_config("page_size = \"many\"\n");
    assert!(matches!(Config::from_file(file.path()), Err(DashboardError::Config(_))));
}

#[test]
fn unknown_map_mode_is_rejected() {
    let file = write_config("map_mode = \"satellite\"\n");
    assert!(Config::from_file(file.path()).is_err());
}

#[test]
fn initialize_rejects_invalid_values() {
    let file = write_config("page_size = 0\n");
    let config = Config::from_file(file.path()).unwrap();
    assert!(matches!(initialize(&config), Err(DashboardError::Config(_))));

    let file = write_config("eji_threshold = 120\n");
    let config = Config::from_file(file.path()).unwrap();
    assert!(matches!(config.validate(), Err(DashboardError::Config(message)) if message.contains("eji_threshold")));
}
