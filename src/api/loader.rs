//! Background loader threads.
//!
//! Every [`LoadRequest`] runs on its own thread against a shared
//! [`DataSource`] and reports exactly one [`LoadResponse`] on the channel the
//! UI thread drains between input polls. Loads have no ordering dependency on
//! each other, so the four startup requests proceed concurrently.

use super::messages::{LoadRequest, LoadResponse};
use super::source::DataSource;
use crate::data::Dataset;
use crate::domain::{DashboardError, Result};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

/// Dispatches load requests onto background threads.
#[derive(Clone)]
pub struct Loader {
    source: Arc<dyn DataSource>,
    responses: Sender<LoadResponse>,
}

impl Loader {
    #[must_use]
    pub fn new(source: Arc<dyn DataSource>, responses: Sender<LoadResponse>) -> Self {
        Self { source, responses }
    }

    /// Runs `request` on a new thread.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Loader` if the thread cannot be spawned.
    pub fn dispatch(&self, request: LoadRequest) -> Result<()> {
        let source = Arc::clone(&self.source);
        let responses = self.responses.clone();
        let name = format!("load-{}", request.name());

        thread::Builder::new()
            .name(name)
            .spawn(move || {
                let response = handle_request(source.as_ref(), request);
                if responses.send(response).is_err() {
                    tracing::debug!("response channel closed, dropping load result");
                }
            })
            .map(|_| ())
            .map_err(|e| DashboardError::Loader(format!("failed to spawn loader thread: {e}")))
    }
}

/// Converts a fetch result into a response with consistent logging.
fn handle_result<T, F>(dataset: Dataset, result: Result<T>, on_success: F) -> LoadResponse
where
    F: FnOnce(T) -> LoadResponse,
{
    match result {
        Ok(value) => {
            tracing::debug!(dataset = dataset.label(), "load successful");
            on_success(value)
        }
        Err(e) => {
            tracing::error!(dataset = dataset.label(), error = %e, "load failed");
            LoadResponse::Failed {
                dataset,
                message: e.to_string(),
            }
        }
    }
}

/// Attaches the parent trace context carried by `request` to this thread.
///
/// Returns a context guard that must be held for the duration of the load.
fn attach_parent_trace_context(request: &LoadRequest) -> Option<opentelemetry::ContextGuard> {
    use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

    let trace_context = request.trace_context()?;

    let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
    let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

    let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());

    let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

    Some(otel_context.attach())
}

/// Performs one load against `source`.
///
/// Never fails: errors become `Failed` / `BoundariesFailed` responses so the
/// UI thread can empty the affected slot and keep going.
pub fn handle_request(source: &dyn DataSource, request: LoadRequest) -> LoadResponse {
    let _context_guard = attach_parent_trace_context(&request);

    let span = tracing::debug_span!("handle_load_request", request = request.name());
    let _guard = span.entered();

    match request {
        LoadRequest::Summary { .. } => handle_result(Dataset::Summary, source.fetch_summary(), |summary| {
            LoadResponse::SummaryLoaded { summary }
        }),

        LoadRequest::Counties { .. } => handle_result(Dataset::Counties, source.fetch_counties(), |records| {
            tracing::debug!(record_count = records.len(), "county data loaded");
            LoadResponse::CountiesLoaded { records }
        }),

        LoadRequest::EjiCounties { .. } => {
            handle_result(Dataset::EjiCounties, source.fetch_eji_counties(), |records| {
                tracing::debug!(record_count = records.len(), "EJI data loaded");
                LoadResponse::EjiCountiesLoaded { records }
            })
        }

        LoadRequest::Hotspots { .. } => handle_result(Dataset::Hotspots, source.fetch_hotspots(), |records| {
            LoadResponse::HotspotsLoaded { records }
        }),

        LoadRequest::Boundaries { render_id, url, .. } => match source.fetch_boundaries(&url) {
            Ok(boundaries) => {
                tracing::debug!(render_id, feature_count = boundaries.len(), "county boundaries loaded");
                LoadResponse::BoundariesLoaded { render_id, boundaries }
            }
            Err(e) => {
                tracing::error!(render_id, error = %e, "county boundaries failed to load");
                LoadResponse::BoundariesFailed {
                    render_id,
                    message: e.to_string(),
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CountyRecord, Summary};
    use crate::map::CountyBoundaries;
    use std::sync::mpsc;
    use std::time::Duration;

    struct FakeSource {
        fail_hotspots: bool,
    }

    fn county(name: &str) -> CountyRecord {
        CountyRecord {
            county: name.to_string(),
            ..CountyRecord::default()
        }
    }

    impl DataSource for FakeSource {
        fn fetch_summary(&self) -> Result<Summary> {
            Ok(Summary {
                total_counties: 2,
                avg_eji: 0.5,
                avg_median_aqi: 40.0,
                high_eji_counties: None,
                poor_air_quality_counties: None,
                high_risk_counties: 1,
            })
        }

        fn fetch_counties(&self) -> Result<Vec<CountyRecord>> {
            Ok(vec![county("a"), county("b")])
        }

        fn fetch_eji_counties(&self) -> Result<Vec<CountyRecord>> {
            Ok(vec![county("a")])
        }

        fn fetch_hotspots(&self) -> Result<Vec<CountyRecord>> {
            if self.fail_hotspots {
                Err(DashboardError::Network("HTTP 500 Internal Server Error".to_string()))
            } else {
                Ok(vec![county("h")])
            }
        }

        fn fetch_boundaries(&self, url: &str) -> Result<CountyBoundaries> {
            if url.is_empty() {
                Err(DashboardError::Network("no url".to_string()))
            } else {
                Ok(["01001".to_string()].into_iter().collect())
            }
        }
    }

    #[test]
    fn failed_fetch_becomes_failed_response() {
        let source = FakeSource { fail_hotspots: true };
        let response = handle_request(&source, LoadRequest::hotspots());
        match response {
            LoadResponse::Failed { dataset, message } => {
                assert_eq!(dataset, Dataset::Hotspots);
                assert!(message.contains("HTTP 500"));
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn boundaries_response_keeps_render_id() {
        let source = FakeSource { fail_hotspots: false };
        let ok = handle_request(&source, LoadRequest::boundaries(7, "https://example.test".to_string()));
        assert!(matches!(ok, LoadResponse::BoundariesLoaded { render_id: 7, .. }));

        let failed = handle_request(&source, LoadRequest::boundaries(8, String::new()));
        assert!(matches!(failed, LoadResponse::BoundariesFailed { render_id: 8, .. }));
    }

    #[test]
    fn dispatch_delivers_one_response_per_request() {
        let (tx, rx) = mpsc::channel();
        let loader = Loader::new(Arc::new(FakeSource { fail_hotspots: true }), tx);

        for request in LoadRequest::all_datasets() {
            loader.dispatch(request).unwrap();
        }

        let mut loaded = 0;
        let mut failed = 0;
        for _ in 0..4 {
            match rx.recv_timeout(Duration::from_secs(5)).unwrap() {
                LoadResponse::Failed { .. } => failed += 1,
                _ => loaded += 1,
            }
        }
        assert_eq!((loaded, failed), (3, 1));
    }
}
