//! OpenTelemetry-based observability with file-based output.
//!
//! The terminal belongs to the dashboard, so nothing is logged to stdout or
//! stderr. Events go to a plain text log and spans go to an OTLP JSON file,
//! both in the data directory.
//!
//! # Architecture
//!
//! ```text
//!                    ┌→ fmt layer → RotatingFile → ejiview.log
//! tracing macros → ──┤
//!                    └→ tracing-opentelemetry → FileSpanExporter → RotatingFile → ejiview-otlp.json
//! ```
//!
//! # Features
//!
//! - **Automatic Rotation**: Files rotate at 10MB with 3-backup retention
//! - **OTLP Format**: Standard OpenTelemetry Protocol JSON, one batch per line
//! - **Cross-Thread Spans**: Loader threads join the span that requested them
//!
//! # Configuration
//!
//! Trace level is controlled via:
//! 1. `RUST_LOG` environment variable (highest priority)
//! 2. `trace_level` in the config file or `--trace-level`
//! 3. Default: `"info"`
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup
//! - [`tracer`]: Tracer provider with file export
//! - [`span_formatter`]: OTLP JSON span serialization
//! - [`file_writer`]: Rotating file writer with size-based rotation

mod file_writer;
mod init;
mod span_formatter;
mod tracer;

pub use file_writer::RotatingFile;
pub use init::{init_tracing, LOG_FILE_NAME, TRACE_FILE_NAME};
pub use tracer::create_tracer_provider;
