//! Structured logging setup.
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the binary (or to any application embedding the router). This module offers
//! the subscriber the `tokenroute` binary uses: an [`EnvFilter`] plus a JSON or
//! pretty `fmt` layer, written to stderr so command output on stdout stays
//! machine readable.
//!
//! ## Environment Variables
//!
//! | Variable                            | Default | Meaning                              |
//! |-------------------------------------|---------|--------------------------------------|
//! | `TOKENROUTE_LOG_LEVEL`              | `warn`  | trace / debug / info / warn / error  |
//! | `TOKENROUTE_LOG_FORMAT`             | `pretty`| `json` or `pretty`                   |
//! | `TOKENROUTE_LOG_TARGET_FILTER`      | unset   | extra comma-separated directives     |
//! | `TOKENROUTE_LOG_INCLUDE_LOCATION`   | `false` | add file:line to every event         |
//!
//! `RUST_LOG`, when set, takes precedence over the level.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for shipping to a collector, pretty for a terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Logging configuration, readable from the `[log]` table of the config file
/// and from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// trace/debug/info/warn/error
    pub level: String,
    pub format: LogFormat,
    /// Additional `EnvFilter` directives, comma separated
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Defaults overridden by `TOKENROUTE_LOG_*` variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from `TOKENROUTE_LOG_*` variables that are set.
    pub fn apply_env(&mut self) {
        if let Ok(level) = env::var("TOKENROUTE_LOG_LEVEL") {
            self.level = level;
        }
        if let Ok(format) = env::var("TOKENROUTE_LOG_FORMAT") {
            self.format = LogFormat::parse(&format);
        }
        if let Ok(filter) = env::var("TOKENROUTE_LOG_TARGET_FILTER") {
            self.target_filter = Some(filter);
        }
        if let Some(include) = env::var("TOKENROUTE_LOG_INCLUDE_LOCATION")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.include_location = include;
        }
    }

    /// The configured level, falling back to `WARN` for unknown names.
    #[must_use]
    pub fn level(&self) -> Level {
        match self.level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    }

    /// Build the filter: `RUST_LOG` if set, else the level, plus target directives.
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        let mut env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));

        if let Some(target_filter) = &self.target_filter {
            for filter in target_filter.split(',').map(str::trim) {
                if filter.is_empty() {
                    continue;
                }
                match filter.parse() {
                    Ok(directive) => env_filter = env_filter.add_directive(directive),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {filter}"),
                }
            }
        }
        env_filter
    }
}

/// Install the global subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
///
/// # Example
///
/// ```no_run
/// use tokenroute::logging::{init_logging_with_config, LogConfig};
///
/// init_logging_with_config(&LogConfig::from_env()).expect("Failed to initialize logging");
/// ```
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("invalid"), LogFormat::Pretty); // Default
    }

    #[test]
    fn test_level_fallback() {
        let mut config = LogConfig::default();
        assert_eq!(config.level(), Level::WARN);
        config.level = "DEBUG".to_string();
        assert_eq!(config.level(), Level::DEBUG);
        config.level = "loud".to_string();
        assert_eq!(config.level(), Level::WARN);
    }

    #[test]
    fn test_deserialize_partial_table() {
        let config: LogConfig = toml::from_str("level = \"info\"\nformat = \"json\"\n").unwrap();
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.include_location);
        assert!(toml::from_str::<LogConfig>("colour = true\n").is_err());
    }

    #[test]
    fn test_env_filter_skips_bad_directives() {
        let config = LogConfig {
            target_filter: Some("tokenroute=debug, ,[bad".to_string()),
            ..LogConfig::default()
        };
        assert!(config.env_filter().to_string().contains("tokenroute=debug"));
    }
}
