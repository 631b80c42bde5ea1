//! Lookup client against a real HTTP endpoint.

use cinescope_search::{
    Category, DataSource, LookupClient, LookupError, LookupOutcome, RemoteErrorKind,
};

use crate::mock_omdb::{Behavior, MockOmdb, UNKNOWN_QUERY, unreachable_base_url};

fn client_for(server: &MockOmdb) -> LookupClient {
    LookupClient::from_config(&server.config()).expect("build lookup client")
}

#[tokio::test]
async fn test_search_sends_expected_query_parameters() {
    let server = MockOmdb::start(Behavior::Omdb).await;
    let client = client_for(&server);

    let outcome = client.search_by_text("heat", 2).await;

    let page = outcome.value().expect("live page");
    assert!(outcome.is_live());
    assert_eq!(page.movies.len(), 10);
    assert_eq!(page.total_results, 23);
    assert_eq!(page.movies[0].title, "heat 11");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    let params = &requests[0];
    assert_eq!(params["apikey"], "test-key");
    assert_eq!(params["s"], "heat");
    assert_eq!(params["page"], "2");
    assert_eq!(params["type"], "movie");
}

#[tokio::test]
async fn test_query_text_is_url_encoded() {
    let server = MockOmdb::start(Behavior::Omdb).await;
    let client = client_for(&server);

    let outcome = client.search_by_text("star wars & co", 1).await;

    assert!(outcome.is_live());
    assert_eq!(server.requests()[0]["s"], "star wars & co");
}

#[tokio::test]
async fn test_page_zero_is_sent_as_first_page() {
    let server = MockOmdb::start(Behavior::Omdb).await;
    let client = client_for(&server);

    client.search_by_text("heat", 0).await;

    assert_eq!(server.requests()[0]["page"], "1");
}

#[tokio::test]
async fn test_category_queries_reach_the_server() {
    let server = MockOmdb::start(Behavior::Omdb).await;
    let client = client_for(&server);

    for category in [Category::Trending, Category::TopRated, Category::Upcoming] {
        assert!(client.search_by_category(category, 1).await.is_live());
    }
    assert!(client.search_by_category(Category::Popular, 1).await.is_live());

    let queries: Vec<String> = server
        .requests()
        .into_iter()
        .map(|params| params["s"].clone())
        .collect();
    assert_eq!(&queries[..3], ["2023", "academy award", "2024"]);
    assert!(
        ["marvel", "star wars", "avengers", "jurassic", "harry potter"]
            .contains(&queries[3].as_str())
    );
}

#[tokio::test]
async fn test_details_request_and_parse() {
    let server = MockOmdb::start(Behavior::Omdb).await;
    let client = client_for(&server);

    let outcome = client.fetch_details("tt0113277").await;

    let details = outcome.value().expect("live details");
    assert!(outcome.is_live());
    assert_eq!(details.summary.id, "tt0113277");
    assert_eq!(details.summary.title, "Heat");
    assert_eq!(details.director, "Michael Mann");
    assert_eq!(details.ratings.len(), 2);
    assert_eq!(details.box_office, "$67,436,818");
    assert_eq!(details.summary.poster_or_placeholder(), "/placeholder-movie.jpg");

    let params = &server.requests()[0];
    assert_eq!(params["i"], "tt0113277");
    assert_eq!(params["plot"], "full");
    assert_eq!(params["apikey"], "test-key");
}

#[tokio::test]
async fn test_suggestions_are_capped() {
    let server = MockOmdb::start(Behavior::Omdb).await;
    let client = client_for(&server);

    let outcome = client.fetch_suggestions("alien").await;

    assert!(outcome.is_live());
    assert_eq!(outcome.value().map(Vec::len), Some(8));
    assert_eq!(server.requests()[0]["page"], "1");
}

#[tokio::test]
async fn test_server_error_falls_back() {
    let server = MockOmdb::start(Behavior::ServerError).await;
    let client = client_for(&server);

    let outcome = client.search_by_text("heat", 1).await;

    assert!(outcome.is_fallback());
    assert_eq!(outcome.value().map(|p| p.movies.len()), Some(8));
    assert_eq!(outcome.error(), Some(&LookupError::HttpStatus { status: 500 }));
}

#[tokio::test]
async fn test_malformed_body_falls_back() {
    let server = MockOmdb::start(Behavior::Garbage).await;
    let client = client_for(&server);

    let outcome = client.fetch_details("tt0113277").await;

    assert!(outcome.is_fallback());
    assert!(matches!(outcome.error(), Some(LookupError::Malformed { .. })));
    assert_eq!(
        outcome.value().map(|d| d.summary.id.as_str()),
        Some("tt0111161")
    );
}

#[tokio::test]
async fn test_unreachable_server_falls_back() {
    let mut config = cinescope_core::CinescopeConfig::for_testing();
    config.api.base_url = unreachable_base_url().await;
    let client = LookupClient::from_config(&config).expect("build lookup client");

    let outcome = client.search_by_text("heat", 1).await;

    assert!(outcome.is_fallback());
    assert!(matches!(outcome.error(), Some(LookupError::Transport { .. })));
}

#[tokio::test]
async fn test_remote_errors_are_classified() {
    let server = MockOmdb::start(Behavior::Omdb).await;

    let mut bad_key = server.config();
    bad_key.api.api_key = "wrong".to_string();
    let client = LookupClient::from_config(&bad_key).expect("build lookup client");
    let outcome = client.search_by_text("heat", 1).await;
    assert!(matches!(
        outcome.error(),
        Some(LookupError::Remote {
            kind: RemoteErrorKind::InvalidApiKey,
            ..
        })
    ));

    let client = client_for(&server);
    let outcome = client.search_by_text(UNKNOWN_QUERY, 1).await;
    assert!(matches!(
        outcome.error(),
        Some(LookupError::Remote {
            kind: RemoteErrorKind::NotFound,
            ..
        })
    ));

    let outcome = client.fetch_details("nm0000199").await;
    assert!(matches!(
        outcome.error(),
        Some(LookupError::Remote {
            kind: RemoteErrorKind::NotFound,
            ..
        })
    ));
}

#[tokio::test]
async fn test_disabled_fallback_surfaces_failure() {
    let server = MockOmdb::start(Behavior::ServerError).await;
    let mut config = server.config();
    config.search.fallback_enabled = false;
    let client = LookupClient::from_config(&config).expect("build lookup client");

    let outcome = client.search_by_text("heat", 1).await;

    assert_eq!(
        outcome,
        LookupOutcome::Failed {
            reason: LookupError::HttpStatus { status: 500 }
        }
    );
}

#[tokio::test]
async fn test_live_outcome_has_live_source() {
    let server = MockOmdb::start(Behavior::Omdb).await;
    let client = client_for(&server);

    match client.search_by_text("heat", 1).await {
        LookupOutcome::Ok { source, .. } => assert_eq!(source, DataSource::Live),
        LookupOutcome::Failed { reason } => panic!("unexpected failure: {reason}"),
    }
}
