//! Logging and tracing configuration
//!
//! Centralized tracing setup for hosts embedding the simulator. The
//! library itself only emits `tracing` events; initializing a subscriber
//! is the host's choice, and this builder covers the common cases: pretty
//! console output for development, JSON for machine consumption, and an
//! optional daily-rolling log file.

use std::io;
use tracing::Level;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Subscriber configuration builder
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level used when no environment filter overrides it
    pub level: Level,
    /// Emit JSON lines instead of human-readable output
    pub json_format: bool,
    /// Directory for a daily-rolling log file, if file logging is wanted
    pub log_directory: Option<String>,
    /// File name prefix for the rolling log file
    pub log_file_prefix: String,
    /// ANSI colors in console output
    pub enable_ansi: bool,
    /// Explicit `EnvFilter` directive overriding level and environment
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json_format: false,
            log_directory: None,
            log_file_prefix: "elevator-dispatch-simulator".to_string(),
            enable_ansi: true,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Start from the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log level
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Emit JSON lines
    pub fn with_json_format(mut self) -> Self {
        self.json_format = true;
        self
    }

    /// Also write a daily-rolling log file under `directory`
    pub fn with_file_logging(mut self, directory: impl Into<String>) -> Self {
        self.log_directory = Some(directory.into());
        self
    }

    /// Disable ANSI colors
    pub fn without_ansi(mut self) -> Self {
        self.enable_ansi = false;
        self
    }

    /// Use an explicit filter directive, e.g. `"debug,hyper=warn"`
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Install the global tracing subscriber
    ///
    /// Fails if a subscriber is already installed or the filter directive
    /// does not parse.
    pub fn init(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let env_filter = match &self.env_filter {
            Some(filter) => EnvFilter::try_new(filter)?,
            None => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.level.to_string())),
        };
        let registry = Registry::default().with(env_filter);

        match self.log_directory.as_deref() {
            Some(directory) => {
                let appender = rolling::daily(directory, &self.log_file_prefix);
                let (file_writer, file_guard) = non_blocking(appender);
                // The guard must outlive the program for buffered lines to
                // flush; the subscriber is global, so leak it.
                std::mem::forget(file_guard);

                let file_layer = fmt::layer().json().with_writer(file_writer);
                if self.json_format {
                    let console = fmt::layer().json().with_writer(io::stderr);
                    registry.with(file_layer).with(console).try_init()?;
                } else {
                    let console = fmt::layer()
                        .with_writer(io::stderr)
                        .with_ansi(self.enable_ansi);
                    registry.with(file_layer).with(console).try_init()?;
                }
            }
            None => {
                if self.json_format {
                    registry.with(fmt::layer().json().with_writer(io::stderr)).try_init()?;
                } else {
                    let console = fmt::layer()
                        .with_writer(io::stderr)
                        .with_ansi(self.enable_ansi);
                    registry.with(console).try_init()?;
                }
            }
        }
        Ok(())
    }

    /// Development preset: DEBUG level, pretty console output
    pub fn init_dev() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Self::new().with_level(Level::DEBUG).init()
    }

    /// Test preset: WARN level, no colors; ignores an already-installed
    /// subscriber so tests can call it repeatedly
    pub fn init_test() {
        let _ = Self::new().with_level(Level::WARN).without_ansi().init();
    }
}
