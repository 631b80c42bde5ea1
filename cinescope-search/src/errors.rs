//! Error types for movie lookups.

use thiserror::Error;

/// Why a remote lookup did not produce usable data.
///
/// These never cross the client boundary as a failure while fallback is
/// enabled; they travel inside [`crate::DataSource::Fallback`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Request could not be sent or the connection failed.
    #[error("Transport error: {reason}")]
    Transport {
        /// The reason for the transport failure
        reason: String,
    },

    /// Server answered with a non-success HTTP status.
    #[error("HTTP status {status}")]
    HttpStatus {
        /// The HTTP status code
        status: u16,
    },

    /// Payload was not valid JSON or lacked required fields.
    #[error("Malformed response: {reason}")]
    Malformed {
        /// The reason the payload was rejected
        reason: String,
    },

    /// Remote reported a negative response (`"Response": "False"`).
    #[error("Remote rejected request: {message}")]
    Remote {
        /// Classified remote error
        kind: RemoteErrorKind,
        /// Message reported by the remote
        message: String,
    },
}

/// Classification of remote-reported errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Key missing, unknown or revoked.
    InvalidApiKey,
    /// No title matched the query or identifier.
    NotFound,
    /// Query too broad for the remote to answer.
    TooManyResults,
    /// Anything else.
    Other,
}

impl LookupError {
    /// Builds a remote error from the message the API returned.
    pub fn remote(message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| "API request failed".to_string());
        Self::Remote {
            kind: RemoteErrorKind::classify(&message),
            message,
        }
    }
}

impl RemoteErrorKind {
    /// Maps an OMDb error message onto a kind.
    ///
    /// OMDb reports errors as free text ("Invalid API key!", "Movie not found!",
    /// "Incorrect IMDb ID.", "Too many results."); this is the only place that text
    /// is inspected.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("api key") {
            RemoteErrorKind::InvalidApiKey
        } else if lower.contains("not found") || lower.contains("incorrect imdb id") {
            RemoteErrorKind::NotFound
        } else if lower.contains("too many results") {
            RemoteErrorKind::TooManyResults
        } else {
            RemoteErrorKind::Other
        }
    }
}
