//! Structured logging set-up
//!
//! Diagnostics go to stderr through `tracing`; stdout carries only the
//! progress and result lines printed by the CLI. Configuration comes from the
//! environment:
//!
//! | Variable | Values | Default |
//! |----------|--------|---------|
//! | `SCAFFOLD_LOG_LEVEL` | `trace` `debug` `info` `warn` `error` | `warn` |
//! | `SCAFFOLD_LOG_FORMAT` | `compact` `pretty` `json` | `compact` |
//! | `SCAFFOLD_LOG_TARGET_FILTER` | comma-separated `EnvFilter` directives | none |
//! | `SCAFFOLD_LOG_INCLUDE_LOCATION` | `true` / `false` | `false` |
//!
//! `RUST_LOG`, when set, replaces the level.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line human-readable output
    Compact,
    /// Multi-line human-readable output
    Pretty,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Extra filter directives (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line in each event
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            format: LogFormat::Compact,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_level: lookup("SCAFFOLD_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: lookup("SCAFFOLD_LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or(defaults.format),
            target_filter: lookup("SCAFFOLD_LOG_TARGET_FILTER").filter(|s| !s.trim().is_empty()),
            include_location: lookup("SCAFFOLD_LOG_INCLUDE_LOCATION")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.include_location),
        }
    }

    /// Raise the level to at least `debug`, as for `--verbose`.
    pub fn verbose(mut self) -> Self {
        if matches!(self.level(), Level::WARN | Level::ERROR | Level::INFO) {
            self.log_level = "debug".to_string();
        }
        self
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        }
    }

    fn env_filter(&self) -> Result<EnvFilter> {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));
        if let Some(targets) = &self.target_filter {
            for directive in targets.split(',').map(str::trim).filter(|d| !d.is_empty()) {
                let directive = directive
                    .parse()
                    .with_context(|| format!("invalid log filter directive '{directive}'"))?;
                filter = filter.add_directive(directive);
            }
        }
        Ok(filter)
    }
}

/// Install the global subscriber.
///
/// Only the first call in a process installs anything; later calls return
/// `Ok(())` and leave the existing subscriber in place.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
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
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    let installed = tracing_subscriber::registry()
        .with(config.env_filter()?)
        .with(fmt_layer)
        .try_init();
    if installed.is_err() {
        tracing::debug!("global subscriber already installed");
    }
    Ok(())
}
