//! Cinescope Core - Shared configuration, errors and tracing
//!
//! This crate holds the ambient pieces every Cinescope component needs:
//! the configuration object handed to the lookup client, the top-level
//! error type, and the tracing subscriber setup used by the CLI.

pub mod config;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::{ApiConfig, CinescopeConfig, SearchConfig};

/// Core errors from the ambient layers (configuration, logging, I/O).
///
/// Lookup failures never appear here; the search crate absorbs them into
/// typed outcomes.
#[derive(Debug, thiserror::Error)]
pub enum CinescopeError {
    #[error("Configuration error: {reason}")]
    Configuration { reason: String },

    #[error("Tracing setup error: {reason}")]
    Tracing { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CinescopeError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            CinescopeError::Configuration { reason } => {
                format!("Configuration problem: {reason}")
            }
            CinescopeError::Tracing { .. } => "Logging could not be initialized".to_string(),
            CinescopeError::Io(_) => "File system error occurred".to_string(),
        }
    }

    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        matches!(self, CinescopeError::Configuration { .. })
    }
}

pub type Result<T> = std::result::Result<T, CinescopeError>;
