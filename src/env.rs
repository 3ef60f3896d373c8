//! Environment variable names read by [`crate::config::LoggerConfig::from_env`].
//!
//! These are purely helpers; the adapter and sinks themselves never touch
//! the environment.

/// Minimum level: `trace`, `debug`, `info`, `warn`, `error`, `off` or `silent`.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Deployment environment; `development`, `dev` or `local` select the
/// pretty transport.
pub const APP_ENV: &str = "APP_ENV";

/// Whether ambient request context is attached to console records.
pub const LOG_CONTEXT_ENV: &str = "LOG_CONTEXT";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
