//! End-to-end flows through the public API with an in-memory data source.

use ejiview::api::{handle_request, DataSource, LoadRequest, LoadResponse};
use ejiview::app::MapStatus;
use ejiview::data::Dataset;
use ejiview::map::CountyBoundaries;
use ejiview::{handle_event, initialize, Action, AppState, Config, CountyRecord, DashboardError, Event, MapMode, Summary};

struct MemorySource {
    counties: Vec<CountyRecord>,
    fail_hotspots: bool,
    fail_boundaries: bool,
}

impl MemorySource {
    fn new() -> Self {
        Self {
            counties: vec![
                county("County 1", "00001", 0.95, 70.0),
                county("County 2", "00002", 0.40, 30.0),
                county("County 3", "00003", 0.99, 65.0),
            ],
            fail_hotspots: false,
            fail_boundaries: false,
        }
    }
}

fn county(name: &str, fips: &str, eji: f64, aqi: f64) -> CountyRecord {
    CountyRecord {
        county: name.to_string(),
        state: "Test".to_string(),
        fips: Some(fips.to_string()),
        eji_percentile: Some(eji),
        median_aqi: Some(aqi),
        ..CountyRecord::default()
    }
}

impl DataSource for MemorySource {
    fn fetch_summary(&self) -> ejiview::Result<Summary> {
        Ok(Summary {
            total_counties: 3,
            avg_eji: 0.78,
            avg_median_aqi: 55.0,
            high_eji_counties: Some(2),
            poor_air_quality_counties: Some(2),
            high_risk_counties: 2,
        })
    }

    fn fetch_counties(&self) -> ejiview::Result<Vec<CountyRecord>> {
        Ok(self.counties.clone())
    }

    fn fetch_eji_counties(&self) -> ejiview::Result<Vec<CountyRecord>> {
        Ok(self.counties.clone())
    }

    fn fetch_hotspots(&self) -> ejiview::Result<Vec<CountyRecord>> {
        if self.fail_hotspots {
            return Err(DashboardError::Network("connection refused".to_string()));
        }
        Ok(vec![self.counties[2].clone(), self.counties[0].clone()])
    }

    fn fetch_boundaries(&self, _url: &str) -> ejiview::Result<CountyBoundaries> {
        if self.fail_boundaries {
            return Err(DashboardError::Network("boundary host unreachable".to_string()));
        }
        CountyBoundaries::from_geojson(
            r#"{"type":"FeatureCollection","features":[{"id":"00001"},{"id":"00002"}]}"#,
        )
    }
}

/// Runs `event` and every load it triggers to completion, synchronously.
fn run(state: &mut AppState, source: &MemorySource, event: Event) -> Vec<Action> {
    let mut pending = vec![event];
    let mut other_actions = Vec::new();
    while let Some(event) = pending.pop() {
        let (_render, actions) = handle_event(state, &event).unwrap();
        for action in actions {
            match action {
                Action::Load(request) => pending.push(Event::Loaded(handle_request(source, request))),
                other => other_actions.push(other),
            }
        }
    }
    other_actions
}

/// Like [`run`], but requests matching `refuse` never start and are answered
/// with a failure instead.
fn run_refusing(
    state: &mut AppState,
    source: &MemorySource,
    event: Event,
    refuse: impl Fn(&LoadRequest) -> bool,
) {
    let mut pending = vec![event];
    while let Some(event) = pending.pop() {
        let (_render, actions) = handle_event(state, &event).unwrap();
        for action in actions {
            if let Action::Load(request) = action {
                let response = if refuse(&request) {
                    LoadResponse::failure(&request, "could not start load".to_string())
                } else {
                    handle_request(source, request)
                };
                pending.push(Event::Loaded(response));
            }
        }
    }
}

fn table_names(state: &AppState) -> Vec<String> {
    state.store.table_view().iter().map(|r| r.county.clone()).collect()
}

#[test]
fn startup_loads_everything_and_renders_map() {
    let source = MemorySource::new();
    let mut state = initialize(&Config::default()).unwrap();

    run(&mut state, &source, Event::Reload);

    assert!(state.store.summary().is_some());
    assert_eq!(state.store.filtered().len(), 3);
    assert_eq!(state.store.hotspots().len(), 2);
    assert_eq!(state.map.status, MapStatus::Ready);
    assert_eq!(state.map.unmatched, 1);
    assert!(state.status.is_none());
}

#[test]
fn threshold_filter_then_sort() {
    let source = MemorySource::new();
    let config = Config {
        eji_threshold: 90,
        ..Config::default()
    };
    let mut state = initialize(&config).unwrap();
    run(&mut state, &source, Event::Reload);

    assert_eq!(table_names(&state), ["County 1", "County 3"]);

    // First sort on a column is ascending, the second descending.
    run(&mut state, &source, Event::SortColumn(2));
    run(&mut state, &source, Event::SortColumn(2));
    assert_eq!(table_names(&state), ["County 3", "County 1"]);
}

#[test]
fn search_narrows_filtered_rows_and_survives_filter_change() {
    let source = MemorySource::new();
    let mut state = initialize(&Config::default()).unwrap();
    run(&mut state, &source, Event::Reload);

    run(&mut state, &source, Event::SearchMode);
    run(&mut state, &source, Event::Char('2'));
    assert_eq!(table_names(&state), ["County 2"]);

    run(&mut state, &source, Event::FocusResults);
    run(&mut state, &source, Event::AdjustEji(50));
    assert!(table_names(&state).is_empty());

    run(&mut state, &source, Event::ExitSearch);
    assert_eq!(table_names(&state), ["County 1", "County 3"]);
}

#[test]
fn hotspot_failure_leaves_other_tables_usable() {
    let source = MemorySource {
        fail_hotspots: true,
        ..MemorySource::new()
    };
    let mut state = initialize(&Config::default()).unwrap();
    run(&mut state, &source, Event::Reload);

    assert!(state.store.hotspots().is_empty());
    assert!(state.store.is_settled(Dataset::Hotspots));
    assert_eq!(state.store.filtered().len(), 3);
    assert_eq!(state.map.status, MapStatus::Ready);
    assert!(state.status.as_ref().is_some_and(|status| status.is_error));
}

#[test]
fn boundary_failure_is_shown_inline() {
    let source = MemorySource {
        fail_boundaries: true,
        ..MemorySource::new()
    };
    let mut state = initialize(&Config::default()).unwrap();
    run(&mut state, &source, Event::Reload);

    assert!(matches!(&state.map.status, MapStatus::Failed(message) if message.contains("boundary host unreachable")));
    assert_eq!(state.store.filtered().len(), 3);

    let viewmodel = state.compute_viewmodel(40, 120);
    assert_eq!(viewmodel.table.rows.len(), 3);
}

#[test]
fn map_mode_change_renders_again_and_exports() {
    let source = MemorySource::new();
    let mut state = initialize(&Config::default()).unwrap();
    run(&mut state, &source, Event::Reload);
    let first_render = state.map.render_id;

    run(&mut state, &source, Event::SetMapMode(MapMode::Aqi));
    assert!(state.map.render_id > first_render);
    assert_eq!(state.map.status, MapStatus::Ready);

    let actions = run(&mut state, &source, Event::ExportMap);
    match actions.as_slice() {
        [Action::ExportFigure { figure, mode }] => {
            assert_eq!(*mode, MapMode::Aqi);
            assert_eq!(figure.layout.title.text, "Air Quality Index (Median AQI) - US Counties");
        }
        other => panic!("expected one export, got {other:?}"),
    }
}

#[test]
fn loads_that_never_start_still_settle() {
    let source = MemorySource::new();
    let mut state = initialize(&Config::default()).unwrap();
    run_refusing(&mut state, &source, Event::Reload, |_| true);

    for dataset in Dataset::ALL {
        assert!(state.store.is_settled(dataset));
    }
    assert!(state.store.filtered().is_empty());
    assert!(matches!(state.map.status, MapStatus::Failed(_)));
    assert!(state.status.as_ref().is_some_and(|status| status.is_error));
}

#[test]
fn boundary_fetch_that_never_starts_fails_the_render() {
    let source = MemorySource::new();
    let mut state = initialize(&Config::default()).unwrap();
    run_refusing(&mut state, &source, Event::Reload, |request| {
        matches!(request, LoadRequest::Boundaries { .. })
    });

    assert!(matches!(&state.map.status, MapStatus::Failed(message) if message.contains("could not start load")));
    assert_eq!(state.store.filtered().len(), 3);
}
