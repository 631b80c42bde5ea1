//! Mock transports and suggestion sources for testing.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};

use crate::errors::LookupError;
use crate::omdb::{MetadataTransport, QueryParams};
use crate::suggest::SuggestionSource;
use crate::types::MovieSummary;

type Handler = dyn Fn(&[(&'static str, String)]) -> Result<Value, LookupError> + Send + Sync;

/// Transport answering every request through a closure and recording the parameters.
#[derive(Clone)]
pub struct MockTransport {
    handler: Arc<Handler>,
    calls: Arc<Mutex<Vec<QueryParams>>>,
    latency: Arc<HashMap<String, Duration>>,
}

impl fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTransport")
            .field("calls", &self.calls.lock().len())
            .finish()
    }
}

impl MockTransport {
    pub fn new(
        handler: impl Fn(&[(&'static str, String)]) -> Result<Value, LookupError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            handler: Arc::new(handler),
            calls: Arc::new(Mutex::new(Vec::new())),
            latency: Arc::new(HashMap::new()),
        }
    }

    /// Delays answers to requests whose `s` or `i` parameter equals `key`.
    pub fn with_latency(mut self, key: &str, delay: Duration) -> Self {
        Arc::make_mut(&mut self.latency).insert(key.to_string(), delay);
        self
    }

    /// Always answers with `body`.
    pub fn responding(body: Value) -> Self {
        Self::new(move |_| Ok(body.clone()))
    }

    /// Always fails with `error`.
    pub fn failing(error: LookupError) -> Self {
        Self::new(move |_| Err(error.clone()))
    }

    pub fn calls(&self) -> Vec<QueryParams> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl MetadataTransport for MockTransport {
    async fn fetch(&self, params: &[(&'static str, String)]) -> Result<Value, LookupError> {
        self.calls.lock().push(params.to_vec());

        let delay = param(params, "s")
            .or_else(|| param(params, "i"))
            .and_then(|key| self.latency.get(key).copied());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        (self.handler)(params)
    }
}

/// Looks up a parameter by name.
pub fn param<'a>(params: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.as_str())
}

/// Positive search body with the given `(id, title, year)` entries.
pub fn search_body(entries: &[(&str, &str, &str)]) -> Value {
    let search: Vec<Value> = entries
        .iter()
        .map(|(id, title, year)| {
            json!({
                "Title": title,
                "Year": year,
                "imdbID": id,
                "Type": "movie",
                "Poster": format!("https://img.example/{id}.jpg"),
            })
        })
        .collect();

    json!({
        "Search": search,
        "totalResults": entries.len().to_string(),
        "Response": "True",
    })
}

pub fn movie(id: &str, title: &str) -> MovieSummary {
    MovieSummary {
        id: id.to_string(),
        title: title.to_string(),
        year: "2000".to_string(),
        poster_url: "N/A".to_string(),
        media_type: "movie".to_string(),
    }
}

/// Suggestion source with per-query latency that records every query it serves.
#[derive(Debug, Default)]
pub struct MockSuggestionSource {
    latency: HashMap<String, Duration>,
    queries: Mutex<Vec<String>>,
}

impl MockSuggestionSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays answers for `query` by `delay`.
    pub fn with_latency(mut self, query: &str, delay: Duration) -> Self {
        self.latency.insert(query.to_string(), delay);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl SuggestionSource for MockSuggestionSource {
    async fn suggestions(&self, query: &str) -> Vec<MovieSummary> {
        self.queries.lock().push(query.to_string());

        if let Some(delay) = self.latency.get(query) {
            tokio::time::sleep(*delay).await;
        }

        vec![
            movie(&format!("{query}-1"), &format!("{query} one")),
            movie(&format!("{query}-2"), &format!("{query} two")),
        ]
    }
}
