use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Fixed name of the timestamp member in machine-readable output.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// One line of machine-readable log output.
///
/// Serializes as `{"level": "INFO", "timestamp": "...", "msg": "...", ..fields}`
/// with payload fields flattened into the top-level object.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub level: String,
    #[serde(serialize_with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

/// ISO-8601 in UTC with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn iso_millis<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_timestamp(ts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn serializes_flat_with_iso_timestamp() {
        let mut fields = BTreeMap::new();
        fields.insert("tenantId".to_string(), json!("t1"));
        let record = LogRecord {
            level: "INFO".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            msg: Some("hello".to_string()),
            fields,
        };

        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "level": "INFO",
                "timestamp": "2024-05-01T12:00:00.000Z",
                "msg": "hello",
                "tenantId": "t1",
            })
        );
    }
}
