use crate::record::{format_timestamp, LogRecord};
use crate::tracing_sink::{JSON_FIELDS, TARGET};
use chrono::Utc;
use std::collections::BTreeMap;
use std::io::Write;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that renders every event as one JSON line.
///
/// The line carries the upper-cased level, an ISO-8601 `timestamp`, the
/// event message as `msg` and all other event fields at top level. On
/// events emitted by [`crate::tracing_sink::TracingSink`] the JSON-text
/// fields `objects` and `err` are decoded back into structured values;
/// other events keep their fields as recorded.
pub struct JsonLayer<W> {
    make_writer: W,
}

impl<W> JsonLayer<W>
where
    W: for<'w> MakeWriter<'w> + 'static,
{
    pub fn new(make_writer: W) -> Self {
        Self { make_writer }
    }
}

impl JsonLayer<fn() -> std::io::Stdout> {
    pub fn stdout() -> Self {
        Self {
            make_writer: std::io::stdout,
        }
    }
}

impl<S, W> Layer<S> for JsonLayer<W>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = BTreeMap::new();
        let mut message: Option<String> = None;

        let mut visitor = FieldVisitor {
            fields: &mut fields,
            message: &mut message,
            decode_json: event.metadata().target() == TARGET,
        };
        event.record(&mut visitor);

        let record = LogRecord {
            level: event.metadata().level().to_string(),
            timestamp: Utc::now(),
            msg: message,
            fields,
        };

        let Ok(mut line) = serde_json::to_vec(&record) else {
            return;
        };
        line.push(b'\n');

        // Output failures stay inside the layer.
        let _ = self.make_writer.make_writer().write_all(&line);
    }
}

pub struct FieldVisitor<'a> {
    pub fields: &'a mut BTreeMap<String, serde_json::Value>,
    pub message: &'a mut Option<String>,
    /// Decode `objects`/`err` from JSON text. Only set for console events.
    pub decode_json: bool,
}

impl<'a> Visit for FieldVisitor<'a> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else if self.decode_json && JSON_FIELDS.contains(&field.name()) {
            let decoded = serde_json::from_str(value)
                .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
            self.fields.insert(field.name().to_string(), decoded);
        } else {
            self.fields.insert(field.name().to_string(), serde_json::Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), serde_json::Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.fields.insert(field.name().to_string(), serde_json::Value::String(format!("{:?}", value)));
        }
    }
}

/// Timer for the pretty transport printing the same ISO-8601 form as
/// the JSON output.
#[derive(Clone, Copy, Debug, Default)]
pub struct IsoTimestamp;

impl FormatTime for IsoTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", format_timestamp(&Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::ErrorValue;
    use crate::context::IdentityType;
    use crate::payload::MergingPayload;
    use crate::record::TIMESTAMP_FIELD;
    use crate::sink::LogSink;
    use crate::tracing_sink::TracingSink;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Buffer {
        type Writer = Buffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn lines(buffer: &Buffer) -> Vec<Value> {
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn tracing_sink_renders_payload_as_json_line() {
        let buffer = Buffer::default();
        let subscriber = Registry::default().with(JsonLayer::new(buffer.clone()));

        let payload = MergingPayload {
            objects: Some(vec![json!({"userId": 7})]),
            err: Some(ErrorValue::new("x")),
            tenant_id: Some("t1".into()),
            identity_type: Some(IdentityType::User),
            ..Default::default()
        };
        tracing::subscriber::with_default(subscriber, || {
            TracingSink.warn(&payload, "User logged in");
        });

        let out = lines(&buffer);
        assert_eq!(out.len(), 1);
        let line = &out[0];
        assert_eq!(line["level"], "WARN");
        assert_eq!(line["msg"], "User logged in");
        assert_eq!(line["objects"], json!([{"userId": 7}]));
        assert_eq!(line["err"], json!({"type": "Error", "message": "x"}));
        assert_eq!(line["tenantId"], "t1");
        assert_eq!(line["identityType"], "user");
        assert!(line.get("appId").is_none());
        assert!(line[TIMESTAMP_FIELD].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn plain_events_keep_their_fields() {
        let buffer = Buffer::default();
        let subscriber = Registry::default().with(JsonLayer::new(buffer.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(order_id = 123, retry = false, "order failed");
        });

        let out = lines(&buffer);
        assert_eq!(out[0]["level"], "ERROR");
        assert_eq!(out[0]["msg"], "order failed");
        assert_eq!(out[0]["order_id"], 123);
        assert_eq!(out[0]["retry"], false);
    }

    #[test]
    fn non_console_events_keep_string_fields() {
        let buffer = Buffer::default();
        let subscriber = Registry::default().with(JsonLayer::new(buffer.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(target: "app::db", err = "404", objects = "null", "lookup failed");
        });

        let out = lines(&buffer);
        assert_eq!(out[0]["msg"], "lookup failed");
        assert_eq!(out[0]["err"], json!("404"));
        assert_eq!(out[0]["objects"], json!("null"));
    }

    #[test]
    fn iso_timer_prints_utc_millis() {
        let mut out = String::new();
        IsoTimestamp.format_time(&mut Writer::new(&mut out)).unwrap();

        // e.g. 2024-05-01T12:00:00.123Z
        assert!(out.ends_with('Z'), "{out}");
        let (_, fraction) = out.trim_end_matches('Z').rsplit_once('.').unwrap();
        assert_eq!(fraction.len(), 3);
        assert!(chrono::DateTime::parse_from_rfc3339(&out).is_ok());
    }
}
