use crate::env::{APP_ENV, LOG_CONTEXT_ENV, LOG_LEVEL_ENV};
use std::str::FromStr;
use tracing_subscriber::filter::LevelFilter;

const DEV_ENVIRONMENTS: [&str; 3] = ["development", "dev", "local"];

/// Configuration of the process-wide logger.
///
/// **Fields**
/// - `level`: minimum level that reaches the output.
/// - `pretty`: human-readable single-line output instead of JSON lines.
///   Meant for development environments only.
/// - `include_context`: attach ambient request context (tenant, app,
///   identity, correlation ID) to console records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggerConfig {
    pub level: LevelFilter,
    pub pretty: bool,
    pub include_context: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::INFO,
            pretty: false,
            include_context: true,
        }
    }
}

/// Invalid logger configuration value.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid log level {0:?}")]
    InvalidLevel(String),

    #[error("invalid boolean {value:?} for {key}")]
    InvalidBool { key: &'static str, value: String },
}

impl LoggerConfig {
    /// Read configuration from the process environment.
    ///
    /// See [`crate::env`] for the variables consulted. Unset variables keep
    /// their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            config.level = parse_level(&level)?;
        }
        if let Some(env) = lookup(APP_ENV) {
            config.pretty = is_dev(&env);
        }
        if let Some(flag) = lookup(LOG_CONTEXT_ENV) {
            config.include_context = parse_bool(LOG_CONTEXT_ENV, &flag)?;
        }

        Ok(config)
    }
}

/// Parse a level name, case-insensitively. `silent` is an alias for `off`.
pub fn parse_level(value: &str) -> Result<LevelFilter, ConfigError> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("silent") {
        return Ok(LevelFilter::OFF);
    }
    LevelFilter::from_str(trimmed).map_err(|_| ConfigError::InvalidLevel(value.to_string()))
}

fn is_dev(env: &str) -> bool {
    let env = env.trim();
    DEV_ENVIRONMENTS.iter().any(|dev| env.eq_ignore_ascii_case(dev))
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: value.to_string(),
        }),
    }
}
