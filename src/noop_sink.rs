use crate::payload::MergingPayload;
use crate::sink::LogSink;
use tracing::Level;

/// A sink that simply drops all records.
///
/// Useful for measuring the overhead of classification and assembly
/// without any output, and for tests that don't care about delivery.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn log(&self, _level: Level, _payload: &MergingPayload, _message: &str) {}
}
