//! Catalog browsing orchestration.
//!
//! [`CatalogBrowser`] is what the presentation layer drives: category tabs,
//! explicit searches and detail selection. Results are tagged with a request
//! generation so a slow response that was overtaken by a newer request is
//! reported as [`BrowseView::Superseded`] instead of replacing the listing.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use thiserror::Error;

use crate::client::LookupClient;
use crate::errors::{LookupError, RemoteErrorKind};
use crate::outcome::{DataSource, LookupOutcome};
use crate::types::{Category, MovieDetails, MovieSummary, SearchPage};

/// User-facing failure categories for the error banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrowseError {
    #[error("invalid API key")]
    InvalidApiKey,

    #[error("no movies found")]
    NotFound,

    #[error("metadata service unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("{reason}")]
    Other { reason: String },
}

impl From<&LookupError> for BrowseError {
    fn from(error: &LookupError) -> Self {
        match error {
            LookupError::Remote {
                kind: RemoteErrorKind::InvalidApiKey,
                ..
            } => BrowseError::InvalidApiKey,
            LookupError::Remote {
                kind: RemoteErrorKind::NotFound,
                ..
            } => BrowseError::NotFound,
            LookupError::Transport { .. } | LookupError::HttpStatus { .. } => {
                BrowseError::Unavailable {
                    reason: error.to_string(),
                }
            }
            LookupError::Malformed { .. } => BrowseError::Other {
                reason: error.to_string(),
            },
            LookupError::Remote { message, .. } => BrowseError::Other {
                reason: message.clone(),
            },
        }
    }
}

impl BrowseError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            BrowseError::InvalidApiKey => {
                "Invalid API key. Please check your OMDB API key configuration.".to_string()
            }
            BrowseError::NotFound => "No movies found. Try a different search term.".to_string(),
            BrowseError::Unavailable { .. } => {
                "Failed to fetch movies. Please check your internet connection and API key."
                    .to_string()
            }
            BrowseError::Other { reason } => format!("Error: {reason}"),
        }
    }
}

/// What a listing was loaded for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingOrigin {
    Category(Category),
    Search(String),
}

/// A loaded list of movies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub origin: ListingOrigin,
    pub movies: Vec<MovieSummary>,
    pub total_results: u32,
    /// Set when the built-in catalog stands in for the remote; explains why.
    pub fallback_reason: Option<BrowseError>,
}

impl Listing {
    pub fn is_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }
}

/// Result of a browse request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseView<T> {
    Ready(T),
    Error(BrowseError),
    /// A newer request started before this one finished.
    Superseded,
}

impl<T> BrowseView<T> {
    pub fn ready(self) -> Option<T> {
        match self {
            BrowseView::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Drives category, search and detail requests for one UI session.
#[derive(Debug)]
pub struct CatalogBrowser {
    client: Arc<LookupClient>,
    list_generation: AtomicU64,
    detail_generation: AtomicU64,
    category: Mutex<Category>,
    last_origin: Mutex<Option<ListingOrigin>>,
    current: Mutex<Option<Listing>>,
}

impl CatalogBrowser {
    pub fn new(client: Arc<LookupClient>) -> Self {
        Self {
            client,
            list_generation: AtomicU64::new(0),
            detail_generation: AtomicU64::new(0),
            category: Mutex::new(Category::Trending),
            last_origin: Mutex::new(None),
            current: Mutex::new(None),
        }
    }

    /// Switches to a category tab and loads it.
    pub async fn show_category(&self, category: Category) -> BrowseView<Listing> {
        *self.category.lock() = category;
        self.load(ListingOrigin::Category(category)).await
    }

    /// Runs an explicit search. A blank query reloads the current category.
    pub async fn search(&self, query: &str) -> BrowseView<Listing> {
        let query = query.trim();
        if query.is_empty() {
            let category = *self.category.lock();
            return self.load(ListingOrigin::Category(category)).await;
        }
        self.load(ListingOrigin::Search(query.to_string())).await
    }

    /// Repeats the last list request (the banner's retry action).
    pub async fn retry(&self) -> BrowseView<Listing> {
        let origin = self.last_origin.lock().clone();
        match origin {
            Some(origin) => self.load(origin).await,
            None => {
                let category = *self.category.lock();
                self.load(ListingOrigin::Category(category)).await
            }
        }
    }

    /// Loads details for a selected movie.
    pub async fn select(&self, id: &str) -> BrowseView<MovieDetails> {
        let generation = self.detail_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let outcome = self.client.fetch_details(id).await;

        if self.detail_generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(id, "Dropping superseded details response");
            return BrowseView::Superseded;
        }

        match outcome {
            LookupOutcome::Ok { value, .. } => BrowseView::Ready(value),
            LookupOutcome::Failed { reason } => BrowseView::Error(BrowseError::from(&reason)),
        }
    }

    /// The most recent listing that was not superseded.
    pub fn current(&self) -> Option<Listing> {
        self.current.lock().clone()
    }

    pub fn category(&self) -> Category {
        *self.category.lock()
    }

    async fn load(&self, origin: ListingOrigin) -> BrowseView<Listing> {
        let generation = self.list_generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_origin.lock() = Some(origin.clone());

        let outcome = match &origin {
            ListingOrigin::Category(category) => {
                self.client.search_by_category(*category, 1).await
            }
            ListingOrigin::Search(query) => self.client.search_by_text(query, 1).await,
        };

        if self.list_generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(?origin, "Dropping superseded listing");
            return BrowseView::Superseded;
        }

        let view = listing_view(origin, outcome);
        if let BrowseView::Ready(listing) = &view {
            *self.current.lock() = Some(listing.clone());
        }
        view
    }
}

fn listing_view(origin: ListingOrigin, outcome: LookupOutcome<SearchPage>) -> BrowseView<Listing> {
    match outcome {
        LookupOutcome::Ok { value, source } => BrowseView::Ready(Listing {
            origin,
            movies: value.movies,
            total_results: value.total_results,
            fallback_reason: match source {
                DataSource::Live => None,
                DataSource::Fallback(reason) => Some(BrowseError::from(&reason)),
            },
        }),
        LookupOutcome::Failed { reason } => BrowseView::Error(BrowseError::from(&reason)),
    }
}
