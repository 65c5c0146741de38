//! Exporting the rendered map figure to disk.

use ejiview::api::LoadResponse;
use ejiview::export::export_figure;
use ejiview::map::CountyBoundaries;
use ejiview::{handle_event, initialize, Action, AppState, Config, CountyRecord, Event, MapMode};

fn ready_state() -> AppState {
    let mut state = initialize(&Config::default()).unwrap();
    handle_event(&mut state, &Event::Reload).unwrap();

    let records = vec![CountyRecord {
        county: "Fresno".to_string(),
        state: "California".to_string(),
        fips: Some("06019".to_string()),
        eji_percentile: Some(0.97),
        median_aqi: Some(71.0),
        ..CountyRecord::default()
    }];
    handle_event(&mut state, &Event::Loaded(LoadResponse::CountiesLoaded { records: records.clone() })).unwrap();
    let (_, actions) = handle_event(&mut state, &Event::Loaded(LoadResponse::EjiCountiesLoaded { records })).unwrap();

    let render_id = state.map.render_id;
    assert_eq!(actions.len(), 1);
    let boundaries = CountyBoundaries::from_geojson(r#"{"features":[{"id":"06019"}]}"#).unwrap();
    handle_event(&mut state, &Event::Loaded(LoadResponse::BoundariesLoaded { render_id, boundaries })).unwrap();
    state
}

#[test]
fn exported_figure_is_plotly_json() {
    let dir = tempfile::tempdir().unwrap();
    let mut state = ready_state();

    let (_, actions) = handle_event(&mut state, &Event::ExportMap).unwrap();
    let [Action::ExportFigure { figure, mode }] = actions.as_slice() else {
        panic!("expected an export action, got {actions:?}");
    };
    assert_eq!(*mode, MapMode::Eji);

    let path = export_figure(figure, *mode, dir.path()).unwrap();
    assert!(path.file_name().unwrap().to_string_lossy().starts_with("ejiview-map-eji-"));

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["data"][0]["locations"], serde_json::json!(["06019"]));
    assert_eq!(json["data"][0]["geojson"], state.boundaries_url.as_str());
    assert_eq!(json["layout"]["geo"]["scope"], "usa");

    handle_event(&mut state, &Event::ExportFinished(Ok(path.clone()))).unwrap();
    let status = state.status.as_ref().unwrap();
    assert!(!status.is_error);
    assert!(status.message.contains(&path.display().to_string()));
}

#[test]
fn export_before_map_is_ready_reports_error() {
    let mut state = initialize(&Config::default()).unwrap();
    let (render, actions) = handle_event(&mut state, &Event::ExportMap).unwrap();
    assert!(render);
    assert!(actions.is_empty());
    assert!(state.status.as_ref().is_some_and(|status| status.is_error));
}
