//! Tracing setup for Cinescope
//!
//! Provides dual output: console logs (user-controlled level) and full debug logs to disk.
//! Fallback substitutions are logged at warn level, so the console shows when the
//! remote API was bypassed while the file keeps every request and response.

use std::fs::{File, create_dir_all};
use std::path::{Path, PathBuf};

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::CinescopeError;

/// File name of the per-run debug log inside the logs directory.
pub const LOG_FILE_NAME: &str = "cinescope-last-run.log";

/// Initialize tracing with dual output: console (user level) + file (full debug)
///
/// # Arguments
/// * `console_level` - Log level for console output (what user sees)
/// * `logs_dir` - Directory to write debug logs (defaults to "./logs")
///
/// Writes complete debug logs to `logs/cinescope-last-run.log`, overwriting the
/// previous run. Returns the path of the log file.
///
/// # Errors
///
/// - `CinescopeError::Io` - Logs directory cannot be created or log file cannot be opened
/// - `CinescopeError::Tracing` - A global subscriber was already installed
pub fn init_tracing(
    console_level: Level,
    logs_dir: Option<&Path>,
) -> Result<PathBuf, CinescopeError> {
    let log_file_path = prepare_log_file_path(logs_dir)?;
    let log_file = File::create(&log_file_path)?;

    // Console layer - respects user's chosen log level
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level.to_string()));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    // File layer - always captures everything at TRACE level
    let file_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(log_file)
        .with_filter(EnvFilter::new("trace"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CinescopeError::Tracing {
            reason: e.to_string(),
        })?;

    tracing::info!(
        "Tracing initialized: console={}, debug_file={}",
        console_level,
        log_file_path.display()
    );

    Ok(log_file_path)
}

/// Creates the logs directory if needed and returns the log file path inside it.
///
/// # Errors
///
/// - `CinescopeError::Io` - Logs directory cannot be created
pub fn prepare_log_file_path(logs_dir: Option<&Path>) -> Result<PathBuf, CinescopeError> {
    let logs_path = logs_dir.unwrap_or_else(|| Path::new("logs"));
    create_dir_all(logs_path)?;
    Ok(logs_path.join(LOG_FILE_NAME))
}

/// CLI log levels for user control
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliLogLevel {
    /// Only error messages
    Error,
    /// Warning and error messages
    Warn,
    /// Informational, warning, and error messages
    Info,
    /// Debug, informational, warning, and error messages
    Debug,
    /// All messages including detailed tracing
    Trace,
}

impl CliLogLevel {
    /// Converts CLI log level to tracing Level enum.
    ///
    /// # Examples
    /// ```
    /// use cinescope_core::tracing_setup::CliLogLevel;
    ///
    /// let level = CliLogLevel::Info.as_tracing_level();
    /// assert_eq!(level, tracing::Level::INFO);
    /// ```
    pub fn as_tracing_level(self) -> Level {
        match self {
            CliLogLevel::Error => Level::ERROR,
            CliLogLevel::Warn => Level::WARN,
            CliLogLevel::Info => Level::INFO,
            CliLogLevel::Debug => Level::DEBUG,
            CliLogLevel::Trace => Level::TRACE,
        }
    }
}

impl std::str::FromStr for CliLogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(CliLogLevel::Error),
            "warn" => Ok(CliLogLevel::Warn),
            "info" => Ok(CliLogLevel::Info),
            "debug" => Ok(CliLogLevel::Debug),
            "trace" => Ok(CliLogLevel::Trace),
            _ => Err(format!("Invalid log level: {s}")),
        }
    }
}

impl std::fmt::Display for CliLogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliLogLevel::Error => write!(f, "error"),
            CliLogLevel::Warn => write!(f, "warn"),
            CliLogLevel::Info => write!(f, "info"),
            CliLogLevel::Debug => write!(f, "debug"),
            CliLogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!("WARN".parse::<CliLogLevel>(), Ok(CliLogLevel::Warn));
        assert_eq!("trace".parse::<CliLogLevel>(), Ok(CliLogLevel::Trace));
        assert!("verbose".parse::<CliLogLevel>().is_err());
        assert_eq!(CliLogLevel::Debug.to_string(), "debug");
        assert_eq!(CliLogLevel::Error.as_tracing_level(), Level::ERROR);
    }

    #[test]
    fn test_prepare_log_file_path_creates_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let logs_dir = temp_dir.path().join("nested").join("logs");

        let path = prepare_log_file_path(Some(&logs_dir)).unwrap();

        assert!(logs_dir.is_dir());
        assert_eq!(path, logs_dir.join(LOG_FILE_NAME));
    }
}
