//! Cinescope Search - Movie lookup and search-as-you-type suggestions
//!
//! Talks to an OMDb-compatible metadata API for free-text search, category
//! browsing and detail lookups. Remote failures are absorbed into typed
//! outcomes backed by a built-in fallback catalog, and a debounced
//! suggestion box keeps stale responses away from the UI.

#![deny(clippy::missing_errors_doc)]
#![deny(clippy::missing_panics_doc)]
#![warn(clippy::too_many_lines)]

pub mod browse;
pub mod client;
pub mod debounce;
pub mod errors;
pub mod fallback;
#[cfg(test)]
pub(crate) mod mock;
pub mod omdb;
pub mod outcome;
pub mod suggest;
pub mod types;

// Re-export main types
pub use browse::{BrowseError, BrowseView, CatalogBrowser, Listing, ListingOrigin};
pub use client::LookupClient;
pub use debounce::Debouncer;
pub use errors::{LookupError, RemoteErrorKind};
pub use fallback::FallbackCatalog;
pub use omdb::{HttpTransport, MetadataTransport};
pub use outcome::{DataSource, LookupOutcome};
pub use suggest::{SuggestionBox, SuggestionSource, SuggestionView};
pub use types::{Category, MovieDetails, MovieSummary, Rating, SearchPage};

/// Convenience type alias for Results with LookupError.
pub type Result<T> = std::result::Result<T, LookupError>;
