use crate::adapter::ConsoleAdapter;
use crate::config::{ConfigError, LoggerConfig};
use crate::console;
use crate::layer::{IsoTimestamp, JsonLayer};
use crate::tracing_sink::TracingSink;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

/// Failure while installing the global logger.
#[derive(thiserror::Error, Debug)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("global tracing subscriber already set: {0}")]
    AlreadySet(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Initialize the global `tracing` subscriber from a [`LoggerConfig`].
///
/// **Effects**
///
/// Installs a [`Registry`] filtered at `config.level` as the global
/// default subscriber. With `config.pretty` events are printed as
/// single human-readable lines with ISO-8601 timestamps; otherwise every
/// event is written to stdout as one JSON line by [`JsonLayer`].
pub fn init_logging_with_config(config: &LoggerConfig) -> Result<(), InitError> {
    // The two transports produce different subscriber types, so each
    // branch installs its own.
    if config.pretty {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_timer(IsoTimestamp);
        let subscriber = Registry::default().with(config.level).with(fmt_layer);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = Registry::default()
            .with(config.level)
            .with(JsonLayer::stdout());
        tracing::subscriber::set_global_default(subscriber)?;
    }

    tracing::debug!(level = %config.level, pretty = config.pretty, "logger initialized");
    Ok(())
}

/// Initialize logging from the process environment.
///
/// Equivalent to [`init_logging_with_config`] with
/// [`LoggerConfig::from_env`].
pub fn init_logging() -> Result<LoggerConfig, InitError> {
    let config = LoggerConfig::from_env()?;
    init_logging_with_config(&config)?;
    Ok(config)
}

/// Initialize logging and route the console entry points through it.
///
/// **Returns**
/// - the installed [`ConsoleAdapter`], forwarding to [`TracingSink`] and
///   reading ambient context from the task-local store when
///   `config.include_context` is set.
///
/// Call [`console::restore`] to put the built-in entry points back.
pub fn init_console(config: &LoggerConfig) -> Result<Arc<ConsoleAdapter>, InitError> {
    init_logging_with_config(config)?;

    let adapter = Arc::new(
        ConsoleAdapter::new(Arc::new(TracingSink)).include_context(config.include_context),
    );
    console::install(Arc::clone(&adapter));
    Ok(adapter)
}
