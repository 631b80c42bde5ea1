//! Lookup client for the movie metadata API.
//!
//! Every operation returns a [`LookupOutcome`]. Remote failures (transport
//! errors, bad status, malformed bodies, negative responses) are replaced by
//! the fallback catalog and reported as `Ok` with [`crate::DataSource::Fallback`],
//! so callers keep rendering while still being able to tell the data apart.

use std::sync::Arc;

use cinescope_core::{ApiConfig, CinescopeConfig, SearchConfig};
use parking_lot::Mutex;
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_chacha::ChaCha8Rng;

use crate::errors::LookupError;
use crate::fallback::FallbackCatalog;
use crate::omdb::{self, HttpTransport, MetadataTransport, QueryParams};
use crate::outcome::LookupOutcome;
use crate::types::{Category, MovieDetails, MovieSummary, SearchPage};

/// Substitute query for [`Category::Trending`].
pub const TRENDING_QUERY: &str = "2023";
/// Substitute query for [`Category::TopRated`].
pub const TOP_RATED_QUERY: &str = "academy award";
/// Substitute query for [`Category::Upcoming`].
pub const UPCOMING_QUERY: &str = "2024";
/// Pool the [`Category::Popular`] query is drawn from.
pub const POPULAR_QUERIES: [&str; 5] = [
    "marvel",
    "star wars",
    "avengers",
    "jurassic",
    "harry potter",
];

/// Client for search, category browsing, suggestions and detail lookups.
#[derive(Debug)]
pub struct LookupClient {
    transport: Arc<dyn MetadataTransport>,
    api: ApiConfig,
    search: SearchConfig,
    fallback: FallbackCatalog,
    popular_rng: Mutex<ChaCha8Rng>,
}

impl LookupClient {
    /// Creates a client over an explicit transport with the built-in fallback catalog.
    pub fn new(config: &CinescopeConfig, transport: Arc<dyn MetadataTransport>) -> Self {
        let popular_rng = match config.search.popular_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };

        Self {
            transport,
            api: config.api.clone(),
            search: config.search.clone(),
            fallback: FallbackCatalog::builtin(),
            popular_rng: Mutex::new(popular_rng),
        }
    }

    /// Creates a client talking HTTP to the configured endpoint.
    ///
    /// # Errors
    /// - `LookupError::Transport` - HTTP client could not be constructed
    pub fn from_config(config: &CinescopeConfig) -> Result<Self, LookupError> {
        let transport = HttpTransport::new(&config.api)?;
        tracing::debug!(endpoint = transport.endpoint(), "Created HTTP lookup client");
        Ok(Self::new(config, Arc::new(transport)))
    }

    /// Replaces the fallback catalog.
    pub fn with_fallback(mut self, fallback: FallbackCatalog) -> Self {
        self.fallback = fallback;
        self
    }

    /// Free-text search. Pages start at 1; 0 is treated as 1.
    pub async fn search_by_text(&self, query: &str, page: u32) -> LookupOutcome<SearchPage> {
        let page = page.max(1);
        tracing::debug!(query, page, "Searching movies");

        let result = self.request_search(query, page).await;
        self.list_outcome("search", query, result)
    }

    /// Category browsing through substitute free-text queries.
    pub async fn search_by_category(
        &self,
        category: Category,
        page: u32,
    ) -> LookupOutcome<SearchPage> {
        let query = self.query_for_category(category);
        tracing::info!(%category, %query, "Fetching category");
        self.search_by_text(&query, page).await
    }

    /// Substitute query text for a category.
    ///
    /// `Popular` draws from [`POPULAR_QUERIES`], so repeated calls may differ
    /// unless `popular_seed` is configured.
    pub fn query_for_category(&self, category: Category) -> String {
        match category {
            Category::Trending => TRENDING_QUERY.to_string(),
            Category::TopRated => TOP_RATED_QUERY.to_string(),
            Category::Upcoming => UPCOMING_QUERY.to_string(),
            Category::Popular => {
                let mut rng = self.popular_rng.lock();
                POPULAR_QUERIES
                    .choose(&mut *rng)
                    .copied()
                    .unwrap_or(POPULAR_QUERIES[0])
                    .to_string()
            }
        }
    }

    /// Full detail record for one identifier, with the long plot.
    ///
    /// Unknown identifiers fall back to the catalog's default record.
    pub async fn fetch_details(&self, id: &str) -> LookupOutcome<MovieDetails> {
        tracing::debug!(id, "Fetching movie details");

        let params: QueryParams = vec![
            ("apikey", self.api.api_key.clone()),
            ("i", id.to_string()),
            ("plot", self.api.plot_length.to_string()),
        ];

        match self
            .transport
            .fetch(&params)
            .await
            .and_then(omdb::parse_details)
        {
            Ok(details) => {
                tracing::debug!(id, title = %details.summary.title, "Movie details fetched");
                LookupOutcome::live(details)
            }
            Err(reason) if self.search.fallback_enabled => match self.fallback.details_for(id) {
                Some(details) => {
                    tracing::warn!(
                        id,
                        error = %reason,
                        fallback_id = %details.summary.id,
                        "Details lookup failed, using fallback record"
                    );
                    LookupOutcome::fallback(details, reason)
                }
                None => {
                    tracing::error!(id, error = %reason, "Details lookup failed and fallback catalog has no records");
                    LookupOutcome::Failed { reason }
                }
            },
            Err(reason) => {
                tracing::warn!(id, error = %reason, "Details lookup failed");
                LookupOutcome::Failed { reason }
            }
        }
    }

    /// Search-as-you-type suggestions: page 1 of a text search, capped at
    /// `suggestion_limit` items.
    pub async fn fetch_suggestions(&self, query: &str) -> LookupOutcome<Vec<MovieSummary>> {
        tracing::debug!(query, "Fetching suggestions");

        let limit = self.search.suggestion_limit;
        let result = self.request_search(query, 1).await;
        self.list_outcome("suggestions", query, result)
            .map(|page| page.truncated(limit).movies)
    }

    async fn request_search(&self, query: &str, page: u32) -> Result<SearchPage, LookupError> {
        let params: QueryParams = vec![
            ("apikey", self.api.api_key.clone()),
            ("s", query.to_string()),
            ("page", page.to_string()),
            ("type", self.api.media_type_filter.to_string()),
        ];

        let body = self.transport.fetch(&params).await?;
        omdb::parse_search(body)
    }

    fn list_outcome(
        &self,
        operation: &'static str,
        query: &str,
        result: Result<SearchPage, LookupError>,
    ) -> LookupOutcome<SearchPage> {
        match result {
            Ok(page) => {
                tracing::debug!(
                    operation,
                    query,
                    count = page.movies.len(),
                    total = page.total_results,
                    "Lookup succeeded"
                );
                LookupOutcome::live(page)
            }
            Err(reason) if self.search.fallback_enabled => {
                tracing::warn!(operation, query, error = %reason, "Lookup failed, using fallback catalog");
                LookupOutcome::fallback(self.fallback.search_page(), reason)
            }
            Err(reason) => {
                tracing::warn!(operation, query, error = %reason, "Lookup failed");
                LookupOutcome::Failed { reason }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::errors::RemoteErrorKind;
    use crate::fallback::DEFAULT_DETAILS_ID;
    use crate::mock::{MockTransport, param, search_body};

    fn client_with(transport: &MockTransport) -> LookupClient {
        LookupClient::new(
            &CinescopeConfig::for_testing(),
            Arc::new(transport.clone()),
        )
    }

    fn transport_error() -> LookupError {
        LookupError::Transport {
            reason: "connection refused".to_string(),
        }
    }

    #[tokio::test]
    async fn test_search_returns_remote_items_unmodified() {
        let transport = MockTransport::responding(search_body(&[
            ("tt0372784", "Batman Begins", "2005"),
            ("tt0468569", "The Dark Knight", "2008"),
            ("tt1877830", "The Batman", "2022"),
        ]));
        let client = client_with(&transport);

        let outcome = client.search_by_text("batman", 1).await;

        assert!(outcome.is_live());
        let page = outcome.into_value().unwrap();
        assert_eq!(page.movies.len(), 3);
        assert_eq!(page.movies[0].id, "tt0372784");
        assert_eq!(page.movies[0].title, "Batman Begins");
        assert_eq!(page.movies[0].poster_url, "https://img.example/tt0372784.jpg");
        assert_eq!(page.movies[2].title, "The Batman");
        assert_eq!(page.movies[2].year, "2022");
    }

    #[tokio::test]
    async fn test_search_sends_expected_parameters() {
        let transport = MockTransport::responding(search_body(&[]));
        let client = client_with(&transport);

        client.search_by_text("star wars", 3).await;
        client.search_by_text("alien", 0).await;

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(param(&calls[0], "apikey"), Some("test-key"));
        assert_eq!(param(&calls[0], "s"), Some("star wars"));
        assert_eq!(param(&calls[0], "page"), Some("3"));
        assert_eq!(param(&calls[0], "type"), Some("movie"));
        assert_eq!(param(&calls[0], "i"), None);
        assert_eq!(param(&calls[1], "page"), Some("1"));
    }

    #[tokio::test]
    async fn test_transport_failure_returns_fallback_as_ok() {
        let transport = MockTransport::failing(transport_error());
        let client = client_with(&transport);

        let outcome = client.search_by_text("batman", 1).await;

        assert!(outcome.is_ok());
        assert!(outcome.is_fallback());
        assert_eq!(outcome.error(), Some(&transport_error()));
        let page = outcome.into_value().unwrap();
        assert_eq!(page.movies.len(), 8);
        assert_eq!(page.movies, FallbackCatalog::builtin().movies());
    }

    #[tokio::test]
    async fn test_negative_response_returns_fallback() {
        let transport =
            MockTransport::responding(json!({"Response": "False", "Error": "Invalid API key!"}));
        let client = client_with(&transport);

        let outcome = client.search_by_category(Category::Trending, 1).await;

        assert!(outcome.is_fallback());
        assert!(matches!(
            outcome.error(),
            Some(LookupError::Remote {
                kind: RemoteErrorKind::InvalidApiKey,
                ..
            })
        ));
        assert_eq!(outcome.value().map(|p| p.movies.len()), Some(8));
    }

    #[tokio::test]
    async fn test_disabled_fallback_reports_failure() {
        let transport = MockTransport::failing(LookupError::HttpStatus { status: 503 });
        let mut config = CinescopeConfig::for_testing();
        config.search.fallback_enabled = false;
        let client = LookupClient::new(&config, Arc::new(transport));

        let outcome = client.search_by_text("batman", 1).await;
        assert_eq!(
            outcome,
            LookupOutcome::Failed {
                reason: LookupError::HttpStatus { status: 503 }
            }
        );

        let details = client.fetch_details("tt0068646").await;
        assert!(!details.is_ok());
    }

    #[tokio::test]
    async fn test_category_queries() {
        let transport = MockTransport::responding(search_body(&[]));
        let client = client_with(&transport);

        for _ in 0..3 {
            assert_eq!(client.query_for_category(Category::Trending), "2023");
        }
        assert_eq!(client.query_for_category(Category::TopRated), "academy award");
        assert_eq!(client.query_for_category(Category::Upcoming), "2024");
        for _ in 0..20 {
            let query = client.query_for_category(Category::Popular);
            assert!(POPULAR_QUERIES.contains(&query.as_str()));
        }

        client.search_by_category(Category::Upcoming, 2).await;
        let calls = transport.calls();
        assert_eq!(param(&calls[0], "s"), Some("2024"));
        assert_eq!(param(&calls[0], "page"), Some("2"));
    }

    #[test]
    fn test_popular_pick_is_reproducible_with_seed() {
        let transport = MockTransport::responding(search_body(&[]));
        let first = client_with(&transport);
        let second = client_with(&transport);

        let picks_a: Vec<String> = (0..10)
            .map(|_| first.query_for_category(Category::Popular))
            .collect();
        let picks_b: Vec<String> = (0..10)
            .map(|_| second.query_for_category(Category::Popular))
            .collect();

        assert_eq!(picks_a, picks_b);
    }

    #[tokio::test]
    async fn test_suggestions_capped_at_limit() {
        let entries: Vec<(String, String)> = (0..10)
            .map(|i| (format!("tt{i:07}"), format!("Movie {i}")))
            .collect();
        let refs: Vec<(&str, &str, &str)> = entries
            .iter()
            .map(|(id, title)| (id.as_str(), title.as_str(), "2001"))
            .collect();
        let transport = MockTransport::responding(search_body(&refs));
        let client = client_with(&transport);

        let outcome = client.fetch_suggestions("movie").await;

        let suggestions = outcome.into_value().unwrap();
        assert_eq!(suggestions.len(), 8);
        assert_eq!(suggestions[0].id, "tt0000000");
        assert_eq!(suggestions[7].id, "tt0000007");
        assert_eq!(param(&transport.calls()[0], "page"), Some("1"));
    }

    #[tokio::test]
    async fn test_details_live_and_parameters() {
        let transport = MockTransport::responding(json!({
            "Title": "Heat", "Year": "1995", "imdbID": "tt0113277", "Type": "movie",
            "Poster": "N/A", "Plot": "Full plot.", "Response": "True"
        }));
        let client = client_with(&transport);

        let outcome = client.fetch_details("tt0113277").await;

        let details = outcome.into_value().unwrap();
        assert_eq!(details.summary.title, "Heat");
        assert_eq!(details.plot, "Full plot.");

        let calls = transport.calls();
        assert_eq!(param(&calls[0], "i"), Some("tt0113277"));
        assert_eq!(param(&calls[0], "plot"), Some("full"));
        assert_eq!(param(&calls[0], "s"), None);
    }

    #[tokio::test]
    async fn test_details_fallback_prefers_requested_record() {
        let transport = MockTransport::failing(transport_error());
        let client = client_with(&transport);

        let godfather = client.fetch_details("tt0068646").await;
        assert!(godfather.is_fallback());
        assert_eq!(godfather.value().unwrap().summary.title, "The Godfather");

        let unknown = client.fetch_details("tt7654321").await;
        assert!(unknown.is_fallback());
        assert_eq!(unknown.value().unwrap().summary.id, DEFAULT_DETAILS_ID);
    }

    #[tokio::test]
    async fn test_custom_fallback_catalog() {
        let transport = MockTransport::failing(transport_error());
        let catalog = FallbackCatalog::new(
            vec![crate::mock::movie("tt0000001", "Only One")],
            Vec::new(),
            "tt0000001",
        );
        let client = client_with(&transport).with_fallback(catalog);

        let page = client.search_by_text("x", 1).await.into_value().unwrap();
        assert_eq!(page.movies.len(), 1);

        let details = client.fetch_details("tt0000001").await;
        assert!(matches!(details, LookupOutcome::Failed { .. }));
    }

    proptest! {
        #[test]
        fn unknown_ids_yield_populated_details(id in "tt[0-9]{7}") {
            let transport = MockTransport::responding(
                json!({"Response": "False", "Error": "Incorrect IMDb ID."}),
            );
            let client = client_with(&transport);

            let outcome = tokio_test::block_on(client.fetch_details(&id));

            prop_assert!(outcome.is_fallback());
            let details = outcome.into_value().unwrap();
            prop_assert!(details.summary.id == id || details.summary.id == DEFAULT_DETAILS_ID);
            prop_assert!(!details.plot.is_empty());
            prop_assert!(!details.summary.title.is_empty());
            prop_assert_eq!(details.ratings.len(), 3);
        }
    }
}
