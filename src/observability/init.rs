//! Tracing initialization and subscriber setup.
//!
//! Builds the subscriber stack used by the binary: an [`EnvFilter`], a plain
//! text `fmt` layer writing to `ejiview.log`, and an OpenTelemetry layer
//! exporting spans to `ejiview-otlp.json`. Both files live in the data
//! directory because the dashboard owns the terminal.

use super::file_writer::RotatingFile;
use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use std::sync::Arc;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service and instrumentation scope name.
const SERVICE_NAME: &str = "ejiview";

/// Plain text log file name inside the data directory.
pub const LOG_FILE_NAME: &str = "ejiview.log";

/// OTLP JSON trace file name inside the data directory.
pub const TRACE_FILE_NAME: &str = "ejiview-otlp.json";

/// Resolves the filter directive: `RUST_LOG` first, then the configured
/// `trace_level`, then `info`.
fn build_filter(config: &Config) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = config.trace_level.as_deref().unwrap_or("info");
        EnvFilter::new(level)
    })
}

/// Initializes the tracing subscriber with file logging and OTLP export.
///
/// # Parameters
///
/// * `config` - Dashboard configuration; only `trace_level` is read
///
/// # File Location
///
/// `<data dir>/ejiview.log` and `<data dir>/ejiview-otlp.json`, where the data
/// directory comes from [`get_data_dir`](crate::infrastructure::get_data_dir)
/// (`EJIVIEW_DATA_DIR` overrides it).
///
/// # Initialization Behavior
///
/// - Creates the data directory if it doesn't exist
/// - Returns without installing anything if that fails
/// - Idempotent: only the first call installs a subscriber
///
/// # Example
///
/// ```rust,no_run
/// use ejiview::observability::init_tracing;
/// use ejiview::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
///
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let data_dir = crate::infrastructure::get_data_dir();
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new("service.name", SERVICE_NAME)]);
    let provider = tracer::create_tracer_provider(data_dir.join(TRACE_FILE_NAME), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let log_file = Arc::new(RotatingFile::new(data_dir.join(LOG_FILE_NAME)));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_names(true);

    let subscriber = tracing_subscriber::registry()
        .with(build_filter(config))
        .with(fmt_layer)
        .with(otel_layer);

    let _ = subscriber.try_init();
}
