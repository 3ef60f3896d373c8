use crate::payload::MergingPayload;
use crate::sink::LogSink;
use tracing::Level;

/// Target used for every event emitted by [`TracingSink`].
pub const TARGET: &str = "console";

/// Payload fields that are emitted as JSON text and decoded again by
/// [`crate::layer::JsonLayer`].
pub(crate) const JSON_FIELDS: [&str; 2] = ["objects", "err"];

/// [`LogSink`] that forwards records as `tracing` events.
///
/// Every payload field becomes an event field of the same (camelCase)
/// name; absent fields are not recorded. `objects` and `err` are recorded
/// as JSON text.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

macro_rules! emit {
    ($level:expr, $payload:expr, $objects:expr, $err:expr, $message:expr) => {
        tracing::event!(
            target: TARGET,
            $level,
            objects = $objects,
            err = $err,
            tenantId = $payload.tenant_id.as_deref(),
            appId = $payload.app_id.as_deref(),
            identityId = $payload.identity_id.as_deref(),
            identityType = $payload.identity_type.map(|t| t.as_str()),
            correlationId = $payload.correlation_id.as_deref(),
            "{}",
            $message
        )
    };
}

impl LogSink for TracingSink {
    fn log(&self, level: Level, payload: &MergingPayload, message: &str) {
        let objects = payload
            .objects
            .as_ref()
            .and_then(|o| serde_json::to_string(o).ok());
        let err = payload
            .err
            .as_ref()
            .and_then(|e| serde_json::to_string(e).ok());
        let objects = objects.as_deref();
        let err = err.as_deref();

        match level {
            Level::TRACE => emit!(Level::TRACE, payload, objects, err, message),
            Level::DEBUG => emit!(Level::DEBUG, payload, objects, err, message),
            Level::INFO => emit!(Level::INFO, payload, objects, err, message),
            Level::WARN => emit!(Level::WARN, payload, objects, err, message),
            _ => emit!(Level::ERROR, payload, objects, err, message),
        }
    }
}
