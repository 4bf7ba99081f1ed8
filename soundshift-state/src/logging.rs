//! Logging setup
//!
//! Library code only emits `tracing` events. An application installs a
//! subscriber once, either with an explicit [`LoggingMode`] or from the
//! `SOUNDSHIFT_LOG_MODE` environment variable.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// How log events are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoggingMode {
    /// No subscriber; the tray application runs like this
    #[default]
    Silent,
    /// Compact stderr lines at `info`
    Development,
    /// Pretty stderr output at `debug` with source locations
    Debug,
    /// One JSON object per event at `info`, for log collectors
    Json,
}

impl LoggingMode {
    /// Mode named by a `SOUNDSHIFT_LOG_MODE` value. Unknown names are silent.
    pub fn from_env_value(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => LoggingMode::Development,
            "debug" => LoggingMode::Debug,
            "json" => LoggingMode::Json,
            _ => LoggingMode::Silent,
        }
    }

    fn default_directive(self) -> &'static str {
        match self {
            LoggingMode::Debug => "debug",
            _ => "info",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    /// Usually means a global subscriber is already installed
    #[error("Failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Install the global subscriber for `mode`
///
/// The filter comes from `SOUNDSHIFT_LOG_LEVEL`, then `RUST_LOG`, then the
/// mode's default level.
///
/// ```rust,ignore
/// soundshift_state::logging::init_logging(LoggingMode::Development)?;
/// ```
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    let filter = env_filter(mode.default_directive());
    let installed = match mode {
        LoggingMode::Silent => return Ok(()),
        LoggingMode::Development => Registry::default()
            .with(fmt::layer().compact().with_target(false))
            .with(filter)
            .try_init(),
        LoggingMode::Debug => Registry::default()
            .with(fmt::layer().pretty().with_file(true).with_line_number(true))
            .with(filter)
            .try_init(),
        LoggingMode::Json => Registry::default()
            .with(fmt::layer().json().with_current_span(false))
            .with(filter)
            .try_init(),
    };

    installed.map_err(|e| LoggingError::Install(e.to_string()))
}

/// [`init_logging`] with the mode read from `SOUNDSHIFT_LOG_MODE`
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = std::env::var("SOUNDSHIFT_LOG_MODE")
        .map(|value| LoggingMode::from_env_value(&value))
        .unwrap_or_default();
    init_logging(mode)
}

fn env_filter(default_directive: &str) -> EnvFilter {
    let directive = std::env::var("SOUNDSHIFT_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_directive.to_string());
    EnvFilter::new(directive)
}
