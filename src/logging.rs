//! Logging setup for rexpense
//!
//! The library only emits `tracing` events; applications opt into output by
//! installing a subscriber with one of the functions below.

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable that overrides the level passed to [`init_logging`].
pub const LOG_ENV_VAR: &str = "REXPENSE_LOG";

/// Log levels, mapped onto the tracing level hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }

    /// Filter directive restricting output to this crate at this level.
    pub fn directive(self) -> String {
        format!("rexpense={}", self.to_tracing_level())
    }
}

/// Initialize logging with a specific log level.
///
/// Call once at the start of an application. Setting `REXPENSE_LOG`
/// (e.g. `REXPENSE_LOG=rexpense=trace`) takes precedence over `level`.
///
/// ```no_run
/// use rexpense::logging::{init_logging, LogLevel};
///
/// init_logging(LogLevel::Info);
/// tracing::info!("Ledger demo starting");
/// ```
pub fn init_logging(level: LogLevel) {
    let env_filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(level.directive()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter)
        .init();

    tracing::info!("rexpense logging initialized at level: {:?}", level);
}

/// Initialize logging with a custom filter string.
///
/// ```no_run
/// use rexpense::logging::init_logging_with_filter;
///
/// init_logging_with_filter("rexpense=info,rexpense::backend=trace");
/// ```
pub fn init_logging_with_filter(filter: &str) {
    let env_filter = EnvFilter::try_new(filter).unwrap_or_else(|_| {
        tracing::warn!("Invalid filter string: {}, using default (info)", filter);
        EnvFilter::new(LogLevel::Info.directive())
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(env_filter)
        .init();

    tracing::info!("rexpense logging initialized with custom filter: {}", filter);
}
