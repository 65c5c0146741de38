//! Loader message types for cross-thread communication.
//!
//! This module defines the request and response protocol between the UI thread
//! and the background threads that talk to the backend. It also implements
//! tracing context propagation across thread boundaries, so spans recorded
//! while a dataset loads join the span that requested it.

use crate::data::Dataset;
use crate::domain::{CountyRecord, Summary};
use crate::map::CountyBoundaries;
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-thread span propagation.
///
/// Captures the current trace and span IDs from OpenTelemetry to maintain
/// trace continuity when handing a request to a loader thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` if the current span context is invalid or not sampled,
    /// which is always the case when tracing is not initialized.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();

        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if span_context.is_valid() {
            let trace_id = format!("{:032x}", span_context.trace_id());
            let parent_span_id = format!("{:016x}", span_context.span_id());

            tracing::trace!(trace_id = %trace_id, parent_span_id = %parent_span_id, "capturing trace context");

            Some(Self {
                trace_id,
                parent_span_id,
            })
        } else {
            None
        }
    }
}

/// Generates builder methods for `LoadRequest` variants that attach the
/// current trace context.
macro_rules! load_request_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl LoadRequest {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " request with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

load_request_builders! {
    summary(Summary {}),
    counties(Counties {}),
    eji_counties(EjiCounties {}),
    hotspots(Hotspots {}),
    boundaries(Boundaries { render_id: u64, url: String }),
}

/// Requests sent from the UI thread to a loader thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadRequest {
    /// `GET /api/summary`
    Summary {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// `GET /api/data`
    Counties {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// `GET /api/eji_data`
    EjiCounties {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// `GET /api/hotspots`
    Hotspots {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Fetch the county boundary collection for one map render.
    Boundaries {
        /// Render this fetch belongs to; stale responses are dropped.
        render_id: u64,

        /// Boundary collection URL.
        url: String,

        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl LoadRequest {
    /// Request for a backend dataset.
    #[must_use]
    pub fn for_dataset(dataset: Dataset) -> Self {
        match dataset {
            Dataset::Summary => Self::summary(),
            Dataset::Counties => Self::counties(),
            Dataset::EjiCounties => Self::eji_counties(),
            Dataset::Hotspots => Self::hotspots(),
        }
    }

    /// The four startup loads.
    #[must_use]
    pub fn all_datasets() -> Vec<Self> {
        Dataset::ALL.into_iter().map(Self::for_dataset).collect()
    }

    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::Summary { trace_context }
            | Self::Counties { trace_context }
            | Self::EjiCounties { trace_context }
            | Self::Hotspots { trace_context }
            | Self::Boundaries { trace_context, .. } => trace_context.as_ref(),
        }
    }

    /// Short name used as a span field.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Summary { .. } => "summary",
            Self::Counties { .. } => "counties",
            Self::EjiCounties { .. } => "eji_counties",
            Self::Hotspots { .. } => "hotspots",
            Self::Boundaries { .. } => "boundaries",
        }
    }
}

/// Responses sent from a loader thread back to the UI thread.
///
/// Every request produces exactly one response, success or failure.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadResponse {
    SummaryLoaded { summary: Summary },

    CountiesLoaded { records: Vec<CountyRecord> },

    EjiCountiesLoaded { records: Vec<CountyRecord> },

    HotspotsLoaded { records: Vec<CountyRecord> },

    BoundariesLoaded {
        render_id: u64,
        boundaries: CountyBoundaries,
    },

    /// A dataset load failed.
    Failed {
        dataset: Dataset,
        /// Human-readable error message.
        message: String,
    },

    /// The boundary fetch for a render failed.
    BoundariesFailed { render_id: u64, message: String },
}

impl LoadResponse {
    /// Failure answering `request`, for requests that never reached a loader
    /// thread.
    #[must_use]
    pub fn failure(request: &LoadRequest, message: String) -> Self {
        let dataset = match request {
            LoadRequest::Boundaries { render_id, .. } => {
                return Self::BoundariesFailed {
                    render_id: *render_id,
                    message,
                }
            }
            LoadRequest::Summary { .. } => Dataset::Summary,
            LoadRequest::Counties { .. } => Dataset::Counties,
            LoadRequest::EjiCounties { .. } => Dataset::EjiCounties,
            LoadRequest::Hotspots { .. } => Dataset::Hotspots,
        };
        Self::Failed { dataset, message }
    }
}
