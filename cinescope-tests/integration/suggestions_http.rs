//! Debounced suggestions backed by the HTTP lookup client.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use cinescope_search::{LookupClient, SuggestionBox, SuggestionView};
use tokio::sync::watch;

use crate::mock_omdb::{Behavior, MockOmdb};

const DEBOUNCE: Duration = Duration::from_millis(60);

fn suggestion_box(server: &MockOmdb) -> SuggestionBox {
    let mut config = server.config();
    config.search.debounce_delay = DEBOUNCE;
    let client = LookupClient::from_config(&config).expect("build lookup client");
    SuggestionBox::new(Arc::new(client), &config.search)
}

async fn settled(updates: &mut watch::Receiver<SuggestionView>) -> SuggestionView {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let view = updates.borrow_and_update().clone();
            if !view.loading {
                return view;
            }
            updates.changed().await.expect("suggestion box alive");
        }
    })
    .await
    .expect("suggestions settle")
}

#[tokio::test]
async fn test_typing_burst_issues_one_request() {
    let server = MockOmdb::start(Behavior::Omdb).await;
    let mut input = suggestion_box(&server);
    let mut updates = input.subscribe();

    for query in ["m", "ma", "mat", "matr", "matri", "matrix"] {
        input.on_query_change(query);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let view = settled(&mut updates).await;
    assert_eq!(view.query, "matrix");
    assert_eq!(view.suggestions.len(), 8);
    assert_eq!(view.suggestions[0].title, "matrix 1");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0]["s"], "matrix");
}

#[tokio::test]
async fn test_short_query_clears_without_request() {
    let server = MockOmdb::start(Behavior::Omdb).await;
    let mut input = suggestion_box(&server);

    input.on_query_change("ab");
    tokio::time::sleep(DEBOUNCE * 3).await;

    assert_eq!(input.snapshot().suggestions, Vec::new());
    assert!(server.requests().is_empty());
}

#[tokio::test]
async fn test_stale_slow_response_is_discarded() {
    let latency = HashMap::from([("heat".to_string(), Duration::from_millis(400))]);
    let server = MockOmdb::start_with_latency(Behavior::Omdb, latency).await;
    let mut input = suggestion_box(&server);
    let mut updates = input.subscribe();

    input.on_query_change("heat");
    tokio::time::sleep(DEBOUNCE * 2).await;
    input.on_query_change("alien");

    let view = settled(&mut updates).await;
    assert_eq!(view.query, "alien");
    assert_eq!(view.suggestions[0].title, "alien 1");

    tokio::time::sleep(Duration::from_millis(500)).await;
    let after = input.snapshot();
    assert_eq!(after.query, "alien");
    assert!(after.suggestions.iter().all(|m| m.title.starts_with("alien")));
}

#[tokio::test]
async fn test_fallback_suggestions_when_server_fails() {
    let server = MockOmdb::start(Behavior::ServerError).await;
    let mut input = suggestion_box(&server);
    let mut updates = input.subscribe();

    input.on_query_change("anything");

    let view = settled(&mut updates).await;
    assert_eq!(view.suggestions.len(), 8);
    assert_eq!(view.suggestions[0].id, "tt0111161");
}
