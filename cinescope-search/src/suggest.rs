//! Debounced search-as-you-type suggestions.
//!
//! [`SuggestionBox`] owns the state behind a search input: the current
//! query, the debounce timer, and the suggestion list shown under the input.
//! The presentation layer feeds it keystrokes and renders the
//! [`SuggestionView`] snapshots published on a `watch` channel.
//!
//! Every state change bumps a generation counter. A suggestion response is
//! applied only if no change happened while it was in flight, so a slow
//! response can never overwrite newer state.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use cinescope_core::SearchConfig;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::client::LookupClient;
use crate::debounce::Debouncer;
use crate::types::MovieSummary;

/// Anything that can answer a suggestion query.
#[async_trait]
pub trait SuggestionSource: Send + Sync + fmt::Debug {
    /// Suggestions for `query`. Failures are expected to be absorbed by the source.
    async fn suggestions(&self, query: &str) -> Vec<MovieSummary>;
}

#[async_trait]
impl SuggestionSource for LookupClient {
    async fn suggestions(&self, query: &str) -> Vec<MovieSummary> {
        self.fetch_suggestions(query)
            .await
            .into_value()
            .unwrap_or_default()
    }
}

/// What the search input should currently display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionView {
    pub query: String,
    pub suggestions: Vec<MovieSummary>,
    pub loading: bool,
}

#[derive(Debug, Default)]
struct InputState {
    query: String,
    generation: u64,
    disposed: bool,
}

#[derive(Debug)]
struct Shared {
    state: Mutex<InputState>,
    view: watch::Sender<SuggestionView>,
}

impl Shared {
    /// Records a state change and returns the new generation.
    fn advance(&self, query: Option<&str>) -> u64 {
        let mut state = self.state.lock();
        if let Some(query) = query {
            state.query = query.to_string();
        }
        state.generation += 1;
        state.generation
    }

    /// Query to look up when the timer fires, or None if the timer is stale.
    fn query_at_fire_time(&self, generation: u64) -> Option<String> {
        let state = self.state.lock();
        (!state.disposed && state.generation == generation).then(|| state.query.clone())
    }

    fn apply(&self, generation: u64, query: &str, suggestions: Vec<MovieSummary>) -> bool {
        let state = self.state.lock();
        if state.disposed || state.generation != generation {
            tracing::debug!(
                query,
                issued = generation,
                current = state.generation,
                "Discarding stale suggestions"
            );
            return false;
        }

        tracing::debug!(query, count = suggestions.len(), "Showing suggestions");
        self.view.send_modify(|view| {
            view.suggestions = suggestions;
            view.loading = false;
        });
        true
    }

    fn reset_view(&self, query: &str) {
        self.view.send_modify(|view| {
            view.query = query.to_string();
            view.suggestions.clear();
            view.loading = false;
        });
    }
}

/// State and debounce timer of one search input.
///
/// Dropping the box cancels any pending timer and discards responses that
/// are still in flight.
#[derive(Debug)]
pub struct SuggestionBox {
    source: Arc<dyn SuggestionSource>,
    debouncer: Debouncer,
    short_query_threshold: usize,
    shared: Arc<Shared>,
}

impl SuggestionBox {
    pub fn new(source: Arc<dyn SuggestionSource>, config: &SearchConfig) -> Self {
        let (view, _) = watch::channel(SuggestionView::default());
        Self {
            source,
            debouncer: Debouncer::new(config.debounce_delay),
            short_query_threshold: config.short_query_threshold,
            shared: Arc::new(Shared {
                state: Mutex::new(InputState::default()),
                view,
            }),
        }
    }

    /// Handles one keystroke.
    ///
    /// Short queries clear the suggestions immediately. Longer ones restart
    /// the quiet period; when it elapses the lookup uses whatever the query
    /// is at that moment.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn on_query_change(&mut self, query: &str) {
        let generation = self.shared.advance(Some(query));

        if query.chars().count() <= self.short_query_threshold {
            self.debouncer.cancel();
            self.shared.reset_view(query);
            return;
        }

        self.shared.view.send_modify(|view| {
            view.query = query.to_string();
            view.loading = true;
        });

        let shared = Arc::clone(&self.shared);
        let source = Arc::clone(&self.source);
        self.debouncer.schedule(async move {
            let Some(query) = shared.query_at_fire_time(generation) else {
                return;
            };
            let suggestions = source.suggestions(&query).await;
            shared.apply(generation, &query, suggestions);
        });
    }

    /// Submits the current query for a full search.
    ///
    /// Returns the trimmed query, or None if it is blank. Suggestions are
    /// closed and any in-flight suggestion response is discarded.
    pub fn submit(&mut self) -> Option<String> {
        let query = self.shared.state.lock().query.trim().to_string();
        if query.is_empty() {
            return None;
        }

        self.shared.advance(None);
        self.debouncer.cancel();
        self.shared.view.send_modify(|view| {
            view.suggestions.clear();
            view.loading = false;
        });
        Some(query)
    }

    /// Picks a displayed suggestion by id and resets the input.
    pub fn select(&mut self, id: &str) -> Option<MovieSummary> {
        let chosen = self
            .shared
            .view
            .borrow()
            .suggestions
            .iter()
            .find(|movie| movie.id == id)
            .cloned()?;

        self.clear();
        Some(chosen)
    }

    /// Empties the input and the suggestion list.
    pub fn clear(&mut self) {
        self.shared.advance(Some(""));
        self.debouncer.cancel();
        self.shared.reset_view("");
    }

    /// Tears the box down; later responses are ignored.
    pub fn dispose(&mut self) {
        {
            let mut state = self.shared.state.lock();
            state.disposed = true;
            state.generation += 1;
        }
        self.debouncer.cancel();
    }

    pub fn subscribe(&self) -> watch::Receiver<SuggestionView> {
        self.shared.view.subscribe()
    }

    pub fn snapshot(&self) -> SuggestionView {
        self.shared.view.borrow().clone()
    }

    /// True while a lookup is scheduled but has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }
}

impl Drop for SuggestionBox {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cinescope_core::CinescopeConfig;
    use serde_json::json;

    use super::*;
    use crate::mock::{MockSuggestionSource, MockTransport, search_body};

    fn suggestion_box(source: &Arc<MockSuggestionSource>) -> SuggestionBox {
        let source: Arc<dyn SuggestionSource> = source.clone();
        SuggestionBox::new(source, &SearchConfig::default())
    }

    fn titles(view: &SuggestionView) -> Vec<String> {
        view.suggestions.iter().map(|m| m.title.clone()).collect()
    }

    async fn pause(millis: u64) {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_queries_never_fetch() {
        let source = Arc::new(MockSuggestionSource::new());
        let mut input = suggestion_box(&source);

        input.on_query_change("b");
        input.on_query_change("ba");
        input.on_query_change("é!");
        pause(1000).await;

        assert!(source.queries().is_empty());
        let view = input.snapshot();
        assert_eq!(view.query, "é!");
        assert!(view.suggestions.is_empty());
        assert!(!view.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_typing_issues_single_fetch_with_latest_query() {
        let source = Arc::new(MockSuggestionSource::new());
        let mut input = suggestion_box(&source);

        for query in ["bat", "batm", "batma", "batman"] {
            input.on_query_change(query);
            pause(100).await;
        }
        assert!(source.queries().is_empty());
        assert!(input.snapshot().loading);

        pause(300).await;

        assert_eq!(source.queries(), vec!["batman".to_string()]);
        let view = input.snapshot();
        assert!(!view.loading);
        assert_eq!(titles(&view), vec!["batman one", "batman two"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_fetch_per_quiet_period() {
        let source = Arc::new(MockSuggestionSource::new());
        let mut input = suggestion_box(&source);

        input.on_query_change("alien");
        pause(400).await;
        input.on_query_change("aliens");
        pause(400).await;

        assert_eq!(source.queries(), vec!["alien", "aliens"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_response_never_overwrites_newer_query() {
        let source =
            Arc::new(MockSuggestionSource::new().with_latency("batman", Duration::from_secs(1)));
        let mut input = suggestion_box(&source);

        input.on_query_change("batman");
        pause(350).await;
        input.on_query_change("batmobile");
        pause(350).await;

        assert_eq!(titles(&input.snapshot()), vec!["batmobile one", "batmobile two"]);

        pause(1000).await;

        assert_eq!(source.queries(), vec!["batman", "batmobile"]);
        assert_eq!(titles(&input.snapshot()), vec!["batmobile one", "batmobile two"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shrinking_below_threshold_clears() {
        let source = Arc::new(MockSuggestionSource::new());
        let mut input = suggestion_box(&source);

        input.on_query_change("heat");
        pause(400).await;
        assert_eq!(input.snapshot().suggestions.len(), 2);

        input.on_query_change("he");
        let view = input.snapshot();
        assert!(view.suggestions.is_empty());
        assert!(!view.loading);
        assert!(!input.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_timer() {
        let source = Arc::new(MockSuggestionSource::new());
        let mut input = suggestion_box(&source);
        let mut updates = input.subscribe();

        input.on_query_change("matrix");
        assert!(input.is_pending());
        drop(input);
        pause(1000).await;

        assert!(source.queries().is_empty());
        assert!(updates.borrow_and_update().suggestions.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_discards_in_flight_response() {
        let source =
            Arc::new(MockSuggestionSource::new().with_latency("matrix", Duration::from_millis(500)));
        let mut input = suggestion_box(&source);

        input.on_query_change("matrix");
        pause(350).await;
        input.dispose();
        pause(1000).await;

        assert_eq!(source.queries(), vec!["matrix"]);
        assert!(input.snapshot().suggestions.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_discards_pending_suggestions() {
        let source =
            Arc::new(MockSuggestionSource::new().with_latency("dune", Duration::from_millis(500)));
        let mut input = suggestion_box(&source);

        input.on_query_change("  ");
        assert_eq!(input.submit(), None);

        input.on_query_change("dune");
        pause(350).await;
        assert_eq!(input.submit(), Some("dune".to_string()));
        pause(1000).await;

        let view = input.snapshot();
        assert!(view.suggestions.is_empty());
        assert!(!view.loading);
        assert_eq!(view.query, "dune");
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_and_clear() {
        let source = Arc::new(MockSuggestionSource::new());
        let mut input = suggestion_box(&source);

        input.on_query_change("heat");
        pause(400).await;

        assert!(input.select("missing").is_none());
        let chosen = input.select("heat-2").unwrap();
        assert_eq!(chosen.title, "heat two");
        assert_eq!(input.snapshot(), SuggestionView::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_client_as_source_falls_back() {
        let transport = MockTransport::responding(
            json!({"Response": "False", "Error": "Too many results."}),
        );
        let client = LookupClient::new(&CinescopeConfig::for_testing(), Arc::new(transport));
        let mut input = SuggestionBox::new(Arc::new(client), &SearchConfig::default());

        input.on_query_change("the");
        pause(400).await;

        assert_eq!(input.snapshot().suggestions.len(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_client_as_source_live() {
        let transport = MockTransport::responding(search_body(&[
            ("tt0133093", "The Matrix", "1999"),
            ("tt0234215", "The Matrix Reloaded", "2003"),
        ]));
        let client = LookupClient::new(&CinescopeConfig::for_testing(), Arc::new(transport.clone()));
        let mut input = SuggestionBox::new(Arc::new(client), &SearchConfig::default());

        input.on_query_change("matrix");
        pause(400).await;

        assert_eq!(transport.call_count(), 1);
        assert_eq!(
            titles(&input.snapshot()),
            vec!["The Matrix", "The Matrix Reloaded"]
        );
    }
}
