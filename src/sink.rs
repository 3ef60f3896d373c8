use crate::payload::MergingPayload;
use tracing::Level;

/// Leveled logger that receives assembled console calls.
///
/// Implementations are responsible for rendering or forwarding the record
/// (tracing events, in-memory capture, etc). The adapter calls these
/// methods synchronously from the logging call site and does not look at
/// any outcome, so implementations should not block for long.
pub trait LogSink: Send + Sync {
    /// Deliver one record at the given level.
    ///
    /// **Parameters**
    /// - `level`: target level, one of `TRACE`, `DEBUG`, `INFO`, `WARN`, `ERROR`.
    /// - `payload`: structured side of the record.
    /// - `message`: space-joined text fragments, possibly empty.
    fn log(&self, level: Level, payload: &MergingPayload, message: &str);

    fn trace(&self, payload: &MergingPayload, message: &str) {
        self.log(Level::TRACE, payload, message);
    }

    fn debug(&self, payload: &MergingPayload, message: &str) {
        self.log(Level::DEBUG, payload, message);
    }

    fn info(&self, payload: &MergingPayload, message: &str) {
        self.log(Level::INFO, payload, message);
    }

    fn warn(&self, payload: &MergingPayload, message: &str) {
        self.log(Level::WARN, payload, message);
    }

    fn error(&self, payload: &MergingPayload, message: &str) {
        self.log(Level::ERROR, payload, message);
    }
}
