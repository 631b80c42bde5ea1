//! Catalog browsing over HTTP, the way the presentation layer drives it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use cinescope_search::{BrowseError, BrowseView, CatalogBrowser, Category, ListingOrigin, LookupClient};

use crate::mock_omdb::{Behavior, MockOmdb, UNKNOWN_QUERY};

fn browser_for(config: &cinescope_core::CinescopeConfig) -> Arc<CatalogBrowser> {
    let client = LookupClient::from_config(config).expect("build lookup client");
    Arc::new(CatalogBrowser::new(Arc::new(client)))
}

#[tokio::test]
async fn test_tab_switch_search_and_select() {
    let server = MockOmdb::start(Behavior::Omdb).await;
    let browser = browser_for(&server.config());

    let trending = browser.show_category(Category::Trending).await.ready().expect("listing");
    assert_eq!(trending.origin, ListingOrigin::Category(Category::Trending));
    assert_eq!(trending.movies[0].title, "2023 1");
    assert!(!trending.is_fallback());

    let search = browser.search("  heat  ").await.ready().expect("listing");
    assert_eq!(search.origin, ListingOrigin::Search("heat".to_string()));

    let details = browser.select(&search.movies[0].id).await.ready().expect("details");
    assert_eq!(details.summary.id, search.movies[0].id);
}

#[tokio::test]
async fn test_server_failure_shows_fallback_listing() {
    let server = MockOmdb::start(Behavior::ServerError).await;
    let browser = browser_for(&server.config());

    let listing = browser.show_category(Category::TopRated).await.ready().expect("listing");

    assert!(listing.is_fallback());
    assert!(matches!(
        listing.fallback_reason,
        Some(BrowseError::Unavailable { .. })
    ));
}

#[tokio::test]
async fn test_banner_and_retry_without_fallback() {
    let server = MockOmdb::start(Behavior::Omdb).await;
    let mut config = server.config();
    config.search.fallback_enabled = false;
    let browser = browser_for(&config);

    let view = browser.search(UNKNOWN_QUERY).await;
    assert_eq!(view, BrowseView::Error(BrowseError::NotFound));
    assert_eq!(
        BrowseError::NotFound.user_message(),
        "No movies found. Try a different search term."
    );

    browser.retry().await;
    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1]["s"], UNKNOWN_QUERY);
}

#[tokio::test]
async fn test_slow_category_does_not_overwrite_newer_search() {
    let latency = HashMap::from([("2023".to_string(), Duration::from_millis(400))]);
    let server = MockOmdb::start_with_latency(Behavior::Omdb, latency).await;
    let browser = browser_for(&server.config());

    let slow = tokio::spawn({
        let browser = Arc::clone(&browser);
        async move { browser.show_category(Category::Trending).await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let fast = browser.search("heat").await.ready().expect("listing");
    assert_eq!(fast.origin, ListingOrigin::Search("heat".to_string()));

    assert_eq!(slow.await.expect("join"), BrowseView::Superseded);
    assert_eq!(
        browser.current().map(|listing| listing.origin),
        Some(ListingOrigin::Search("heat".to_string()))
    );
}
