use crate::payload::MergingPayload;
use crate::sink::LogSink;
use std::sync::{Mutex, MutexGuard};
use tracing::Level;

/// One record delivered to a [`MemorySink`].
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedLog {
    pub level: Level,
    pub payload: MergingPayload,
    pub message: String,
}

/// Sink that keeps every record in memory, in delivery order.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<CapturedLog>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<CapturedLog>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.records.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of everything captured so far.
    pub fn records(&self) -> Vec<CapturedLog> {
        self.lock().clone()
    }

    /// Drain captured records.
    pub fn take(&self) -> Vec<CapturedLog> {
        std::mem::take(&mut *self.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl LogSink for MemorySink {
    fn log(&self, level: Level, payload: &MergingPayload, message: &str) {
        self.lock().push(CapturedLog {
            level,
            payload: payload.clone(),
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provided_methods_map_to_levels() {
        let sink = MemorySink::new();
        let payload = MergingPayload::default();
        sink.trace(&payload, "t");
        sink.warn(&payload, "w");
        sink.error(&payload, "e");

        let levels: Vec<Level> = sink.records().iter().map(|r| r.level).collect();
        assert_eq!(levels, vec![Level::TRACE, Level::WARN, Level::ERROR]);
        assert_eq!(sink.take().len(), 3);
        assert!(sink.is_empty());
    }
}
