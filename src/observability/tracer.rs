//! Span export to a rotating OTLP JSON file.
//!
//! There is no collector; every finished span lands in `ejiview-otlp.json`
//! next to the log, one OTLP document per line.

use super::file_writer::RotatingFile;
use super::span_formatter::SpanFormatter;
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

struct FileSpanExporter {
    writer: RotatingFile,
    formatter: SpanFormatter,
    closed: AtomicBool,
}

impl FileSpanExporter {
    fn new(file_path: PathBuf, resource: &Resource) -> Self {
        Self {
            writer: RotatingFile::new(file_path),
            formatter: SpanFormatter::new(resource),
            closed: AtomicBool::new(false),
        }
    }

    fn write_batch(&self, batch: &[SpanData]) -> ExportResult {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TraceError::from("trace file exporter closed"));
        }
        let line = self.formatter.format_batch(batch).to_string();
        self.writer
            .write_line(&line)
            .map_err(|e| TraceError::from(format!("{}: {e}", self.writer.path().display())))
    }
}

impl SpanExporter for FileSpanExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        let result = self.write_batch(&batch);
        Box::pin(std::future::ready(result))
    }

    fn shutdown(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    // Resource attributes are encoded once in `new`.
    fn set_resource(&mut self, _res: &Resource) {}
}

impl std::fmt::Debug for FileSpanExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSpanExporter")
            .field("path", &self.writer.path())
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

/// Provider whose spans are written to `file_path` as they end.
#[must_use]
pub fn create_tracer_provider(file_path: PathBuf, resource: Resource) -> TracerProvider {
    let exporter = FileSpanExporter::new(file_path, &resource);

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::{Tracer, TracerProvider as _};
    use opentelemetry::KeyValue;

    #[test]
    fn finished_spans_are_appended_as_otlp_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ejiview-otlp.json");
        let resource = Resource::new(vec![KeyValue::new("service.name", "ejiview")]);
        let provider = create_tracer_provider(path.clone(), resource);

        provider.tracer("ejiview").in_span("load_counties", |_| {});
        provider.tracer("ejiview").in_span("render_map", |_| {});

        let contents = std::fs::read_to_string(&path).unwrap();
        let names: Vec<String> = contents
            .lines()
            .map(|line| {
                let batch: serde_json::Value = serde_json::from_str(line).unwrap();
                batch["resourceSpans"][0]["scopeSpans"][0]["spans"][0]["name"]
                    .as_str()
                    .unwrap()
                    .to_string()
            })
            .collect();
        assert_eq!(names, ["load_counties", "render_map"]);
    }

    #[test]
    fn closed_exporter_rejects_batches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ejiview-otlp.json");
        let mut exporter = FileSpanExporter::new(path.clone(), &Resource::empty());

        assert!(exporter.write_batch(&[]).is_ok());
        exporter.shutdown();
        assert!(exporter.write_batch(&[]).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 1);
    }
}
