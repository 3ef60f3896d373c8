pub mod argument;
pub mod classify;
pub mod context;
pub mod payload;
pub mod assemble;

pub mod sink;
pub mod tracing_sink;
pub mod memory_sink;
pub mod noop_sink;

pub mod adapter;
pub mod console;

pub mod record;
pub mod layer;
pub mod env;
pub mod config;
pub mod init;

pub use adapter::{ConsoleAdapter, EntryPoint};
pub use argument::{ErrorValue, LogArgument};
pub use payload::MergingPayload;
