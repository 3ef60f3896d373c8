//! Process-wide console entry points.
//!
//! `log`, `info`, `warn`, `error`, `trace` and `debug` dispatch through a
//! global table of handlers. Until [`install`] is called the table holds
//! the built-in handlers, which print to stdout/stderr like a plain
//! console. [`install`] swaps in handlers backed by a [`ConsoleAdapter`];
//! [`restore`] puts the built-ins back.
//!
//! Reads of the table are lock-free. `install` and `restore` are meant to
//! be called once at startup and once at teardown; callers serialize them.

use crate::adapter::{ConsoleAdapter, EntryPoint};
use crate::argument::{ErrorValue, LogArgument};
use arc_swap::ArcSwap;
use serde_json::Value;
use std::io::{self, Write};
use std::sync::{Arc, OnceLock};

/// A console entry point implementation.
pub type Handler = Arc<dyn Fn(&[LogArgument]) + Send + Sync>;

/// One handler per entry point.
#[derive(Clone)]
pub struct EntryPoints {
    pub log: Handler,
    pub info: Handler,
    pub warn: Handler,
    pub error: Handler,
    pub trace: Handler,
    pub debug: Handler,
}

impl EntryPoints {
    /// Handlers forwarding every entry point to `adapter`.
    pub fn from_adapter(adapter: Arc<ConsoleAdapter>) -> Self {
        let handler = |entry: EntryPoint| -> Handler {
            let adapter = Arc::clone(&adapter);
            Arc::new(move |args: &[LogArgument]| adapter.dispatch(entry, args))
        };

        EntryPoints {
            log: handler(EntryPoint::Log),
            info: handler(EntryPoint::Info),
            warn: handler(EntryPoint::Warn),
            error: handler(EntryPoint::Error),
            trace: handler(EntryPoint::Trace),
            debug: handler(EntryPoint::Debug),
        }
    }

    fn built_in() -> Self {
        let handler = |entry: EntryPoint| -> Handler {
            Arc::new(move |args: &[LogArgument]| print_plain(entry, args))
        };

        EntryPoints {
            log: handler(EntryPoint::Log),
            info: handler(EntryPoint::Info),
            warn: handler(EntryPoint::Warn),
            error: handler(EntryPoint::Error),
            trace: handler(EntryPoint::Trace),
            debug: handler(EntryPoint::Debug),
        }
    }

    pub fn get(&self, entry: EntryPoint) -> &Handler {
        match entry {
            EntryPoint::Log => &self.log,
            EntryPoint::Info => &self.info,
            EntryPoint::Warn => &self.warn,
            EntryPoint::Error => &self.error,
            EntryPoint::Trace => &self.trace,
            EntryPoint::Debug => &self.debug,
        }
    }

    /// `true` when every handler is the very same closure in both tables.
    pub fn ptr_eq(&self, other: &EntryPoints) -> bool {
        EntryPoint::ALL
            .iter()
            .all(|&entry| Arc::ptr_eq(self.get(entry), other.get(entry)))
    }
}

impl std::fmt::Debug for EntryPoints {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryPoints").finish_non_exhaustive()
    }
}

// Captured once, on first use of the console.
fn built_ins() -> &'static Arc<EntryPoints> {
    static BUILT_INS: OnceLock<Arc<EntryPoints>> = OnceLock::new();
    BUILT_INS.get_or_init(|| Arc::new(EntryPoints::built_in()))
}

fn table() -> &'static ArcSwap<EntryPoints> {
    static TABLE: OnceLock<ArcSwap<EntryPoints>> = OnceLock::new();
    TABLE.get_or_init(|| ArcSwap::new(Arc::clone(built_ins())))
}

/// Route every console entry point through `adapter`.
pub fn install(adapter: Arc<ConsoleAdapter>) {
    table().store(Arc::new(EntryPoints::from_adapter(adapter)));
}

/// Reinstate the built-in entry points captured before any [`install`].
pub fn restore() {
    table().store(Arc::clone(built_ins()));
}

/// The built-in entry points.
pub fn built_in_entry_points() -> Arc<EntryPoints> {
    Arc::clone(built_ins())
}

/// Snapshot of the entry points currently in effect.
pub fn entry_points() -> Arc<EntryPoints> {
    table().load_full()
}

/// `true` while an adapter is installed.
pub fn is_installed() -> bool {
    !Arc::ptr_eq(&table().load(), built_ins())
}

pub fn call(entry: EntryPoint, args: &[LogArgument]) {
    let current = table().load();
    (current.get(entry))(args)
}

pub fn log(args: &[LogArgument]) {
    call(EntryPoint::Log, args)
}

pub fn info(args: &[LogArgument]) {
    call(EntryPoint::Info, args)
}

pub fn warn(args: &[LogArgument]) {
    call(EntryPoint::Warn, args)
}

pub fn error(args: &[LogArgument]) {
    call(EntryPoint::Error, args)
}

pub fn trace(args: &[LogArgument]) {
    call(EntryPoint::Trace, args)
}

pub fn debug(args: &[LogArgument]) {
    call(EntryPoint::Debug, args)
}

/// Render arguments the way a plain console does: strings verbatim,
/// everything else as JSON, errors as `Type: message` plus stack.
pub fn format_plain(args: &[LogArgument]) -> String {
    args.iter()
        .map(|arg| match arg {
            LogArgument::Value(Value::String(s)) => s.clone(),
            LogArgument::Value(v) => v.to_string(),
            LogArgument::Error(e) => format_error(e),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_error(e: &ErrorValue) -> String {
    match &e.stack {
        Some(stack) => format!("{}\n{}", e, stack),
        None => e.to_string(),
    }
}

fn print_plain(entry: EntryPoint, args: &[LogArgument]) {
    let mut line = format_plain(args);
    if entry == EntryPoint::Trace {
        let stack = ErrorValue::capture();
        line = format!("Trace: {}\n{}", line, stack.stack.unwrap_or_default());
    }

    // Nothing useful can be done if the console itself is gone.
    let _ = match entry {
        EntryPoint::Log | EntryPoint::Info | EntryPoint::Debug => {
            writeln!(io::stdout().lock(), "{}", line)
        }
        EntryPoint::Warn | EntryPoint::Error | EntryPoint::Trace => {
            writeln!(io::stderr().lock(), "{}", line)
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __console_call {
    ($entry:ident $(, $arg:expr)* $(,)?) => {
        $crate::console::$entry(&[$($crate::LogArgument::from($arg)),*])
    };
}

/// `console.log`-style call: `console_log!("user", json!({"id": 7}))`.
#[macro_export]
macro_rules! console_log {
    ($($arg:expr),* $(,)?) => { $crate::__console_call!(log $(, $arg)*) };
}

#[macro_export]
macro_rules! console_info {
    ($($arg:expr),* $(,)?) => { $crate::__console_call!(info $(, $arg)*) };
}

#[macro_export]
macro_rules! console_warn {
    ($($arg:expr),* $(,)?) => { $crate::__console_call!(warn $(, $arg)*) };
}

#[macro_export]
macro_rules! console_error {
    ($($arg:expr),* $(,)?) => { $crate::__console_call!(error $(, $arg)*) };
}

#[macro_export]
macro_rules! console_trace {
    ($($arg:expr),* $(,)?) => { $crate::__console_call!(trace $(, $arg)*) };
}

#[macro_export]
macro_rules! console_debug {
    ($($arg:expr),* $(,)?) => { $crate::__console_call!(debug $(, $arg)*) };
}
