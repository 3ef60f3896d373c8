use crate::argument::{ErrorValue, LogArgument};
use crate::assemble::assemble;
use crate::context::{ContextSnapshot, ContextStore, TaskContextStore};
use crate::payload::MergingPayload;
use crate::sink::LogSink;
use std::sync::Arc;
use tracing::Level;

/// The six console-style entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    Log,
    Info,
    Warn,
    Error,
    Trace,
    Debug,
}

impl EntryPoint {
    pub const ALL: [EntryPoint; 6] = [
        EntryPoint::Log,
        EntryPoint::Info,
        EntryPoint::Warn,
        EntryPoint::Error,
        EntryPoint::Trace,
        EntryPoint::Debug,
    ];

    /// Level of the leveled-logger call this entry point maps to.
    pub fn level(&self) -> Level {
        match self {
            EntryPoint::Log | EntryPoint::Info => Level::INFO,
            EntryPoint::Warn => Level::WARN,
            EntryPoint::Error => Level::ERROR,
            EntryPoint::Trace => Level::TRACE,
            EntryPoint::Debug => Level::DEBUG,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EntryPoint::Log => "log",
            EntryPoint::Info => "info",
            EntryPoint::Warn => "warn",
            EntryPoint::Error => "error",
            EntryPoint::Trace => "trace",
            EntryPoint::Debug => "debug",
        }
    }
}

/// Turns console-style calls into structured records for a [`LogSink`].
///
/// Each call is classified and assembled into a [`MergingPayload`] and a
/// message, enriched with ambient context when enabled, and forwarded to
/// the sink at the level of its [`EntryPoint`]. Calls never fail: missing
/// context only leaves the corresponding fields unset.
pub struct ConsoleAdapter {
    sink: Arc<dyn LogSink>,
    store: Arc<dyn ContextStore>,
    include_context: bool,
}

impl ConsoleAdapter {
    /// Adapter over `sink`, reading context from [`TaskContextStore`].
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            store: Arc::new(TaskContextStore),
            include_context: true,
        }
    }

    pub fn with_context_store(mut self, store: Arc<dyn ContextStore>) -> Self {
        self.store = store;
        self
    }

    pub fn include_context(mut self, include: bool) -> Self {
        self.include_context = include;
        self
    }

    /// Build the payload and message for one call without logging it.
    pub fn params(&self, args: &[LogArgument]) -> (MergingPayload, String) {
        let snapshot = self
            .include_context
            .then(|| ContextSnapshot::capture(self.store.as_ref()));
        assemble(args, snapshot.as_ref())
    }

    /// Dispatch a call made through `entry`.
    pub fn dispatch(&self, entry: EntryPoint, args: &[LogArgument]) {
        let (mut payload, message) = self.params(args);
        if entry == EntryPoint::Trace && payload.err.is_none() {
            // Stand-in error so the record shows where trace was called from.
            payload.err = Some(ErrorValue::capture());
        }
        self.sink.log(entry.level(), &payload, &message);
    }

    pub fn log(&self, args: &[LogArgument]) {
        self.dispatch(EntryPoint::Log, args);
    }

    pub fn info(&self, args: &[LogArgument]) {
        self.dispatch(EntryPoint::Info, args);
    }

    pub fn warn(&self, args: &[LogArgument]) {
        self.dispatch(EntryPoint::Warn, args);
    }

    pub fn error(&self, args: &[LogArgument]) {
        self.dispatch(EntryPoint::Error, args);
    }

    pub fn trace(&self, args: &[LogArgument]) {
        self.dispatch(EntryPoint::Trace, args);
    }

    pub fn debug(&self, args: &[LogArgument]) {
        self.dispatch(EntryPoint::Debug, args);
    }
}

impl std::fmt::Debug for ConsoleAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleAdapter")
            .field("include_context", &self.include_context)
            .finish_non_exhaustive()
    }
}
