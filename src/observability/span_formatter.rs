//! OTLP JSON span formatter.
//!
//! Converts finished spans into the OTLP/JSON trace encoding, one
//! `resourceSpans` document per exported batch.
//!
//! ```json
//! {
//!   "resourceSpans": [{
//!     "resource": {"attributes": [{"key": "service.name", "value": {"stringValue": "ejiview"}}]},
//!     "scopeSpans": [{"scope": {"name": "ejiview"}, "spans": [...]}]
//!   }]
//! }
//! ```

use opentelemetry::trace::{Event, Link, SpanId, SpanKind, Status};
use opentelemetry::{Array, KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use opentelemetry_sdk::resource::Resource;
use serde_json::{json, Value as JsonValue};
use std::time::{Duration, SystemTime};

/// Instrumentation scope name written into every batch.
const SCOPE_NAME: &str = "ejiview";

/// Formats span batches against a fixed resource.
///
/// Resource attributes are encoded once at construction; every batch reuses
/// them.
pub struct SpanFormatter {
    resource_attributes: Vec<JsonValue>,
}

impl SpanFormatter {
    pub fn new(resource: &Resource) -> Self {
        let resource_attributes = resource
            .iter()
            .map(|(key, value)| attribute(key.as_str(), value))
            .collect();
        Self { resource_attributes }
    }

    /// Encodes `batch` as one OTLP JSON document.
    pub fn format_batch(&self, batch: &[SpanData]) -> JsonValue {
        let spans: Vec<JsonValue> = batch.iter().map(span_json).collect();
        json!({
            "resourceSpans": [{
                "resource": { "attributes": self.resource_attributes },
                "scopeSpans": [{
                    "scope": { "name": SCOPE_NAME },
                    "spans": spans
                }]
            }]
        })
    }
}

impl std::fmt::Debug for SpanFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanFormatter")
            .field("resource_attributes", &self.resource_attributes.len())
            .finish()
    }
}

fn span_json(span: &SpanData) -> JsonValue {
    let parent = if span.parent_span_id == SpanId::INVALID {
        String::new()
    } else {
        format!("{:016x}", span.parent_span_id)
    };
    let (code, message) = status(&span.status);

    json!({
        "traceId": format!("{:032x}", span.span_context.trace_id()),
        "spanId": format!("{:016x}", span.span_context.span_id()),
        "parentSpanId": parent,
        "name": span.name,
        "kind": kind_code(&span.span_kind),
        "startTimeUnixNano": unix_nanos(span.start_time),
        "endTimeUnixNano": unix_nanos(span.end_time),
        "attributes": attributes(&span.attributes),
        "events": span.events.iter().map(event_json).collect::<Vec<_>>(),
        "links": span.links.iter().map(link_json).collect::<Vec<_>>(),
        "status": { "code": code, "message": message },
    })
}

fn event_json(event: &Event) -> JsonValue {
    json!({
        "timeUnixNano": unix_nanos(event.timestamp),
        "name": event.name,
        "attributes": attributes(&event.attributes),
    })
}

fn link_json(link: &Link) -> JsonValue {
    json!({
        "traceId": format!("{:032x}", link.span_context.trace_id()),
        "spanId": format!("{:016x}", link.span_context.span_id()),
        "attributes": attributes(&link.attributes),
    })
}

fn attributes(pairs: &[KeyValue]) -> Vec<JsonValue> {
    pairs.iter().map(|kv| attribute(kv.key.as_str(), &kv.value)).collect()
}

fn attribute(key: &str, value: &Value) -> JsonValue {
    json!({ "key": key, "value": any_value(value) })
}

/// OTLP `AnyValue`. 64-bit integers are strings in the JSON encoding.
fn any_value(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => json!({ "boolValue": b }),
        Value::I64(i) => json!({ "intValue": i.to_string() }),
        Value::F64(f) => json!({ "doubleValue": f }),
        Value::String(s) => json!({ "stringValue": s.as_str() }),
        Value::Array(array) => {
            let values: Vec<JsonValue> = match array {
                Array::Bool(items) => items.iter().map(|b| json!({ "boolValue": b })).collect(),
                Array::I64(items) => items.iter().map(|i| json!({ "intValue": i.to_string() })).collect(),
                Array::F64(items) => items.iter().map(|f| json!({ "doubleValue": f })).collect(),
                Array::String(items) => items.iter().map(|s| json!({ "stringValue": s.as_str() })).collect(),
            };
            json!({ "arrayValue": { "values": values } })
        }
    }
}

const fn kind_code(kind: &SpanKind) -> u8 {
    match kind {
        SpanKind::Internal => 1,
        SpanKind::Server => 2,
        SpanKind::Client => 3,
        SpanKind::Producer => 4,
        SpanKind::Consumer => 5,
    }
}

fn status(status: &Status) -> (u8, String) {
    match status {
        Status::Unset => (0, String::new()),
        Status::Ok => (1, String::new()),
        Status::Error { description } => (2, description.to_string()),
    }
}

/// Nanoseconds since the Unix epoch as a decimal string.
fn unix_nanos(time: SystemTime) -> String {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_nanos()
        .to_string()
}
