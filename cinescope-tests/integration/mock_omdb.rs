//! Local OMDb-compatible server for integration tests.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use cinescope_core::CinescopeConfig;
use parking_lot::Mutex;
use serde_json::{Value, json};

/// Key the server accepts; anything else gets the OMDb "Invalid API key!" answer.
pub const VALID_KEY: &str = "test-key";

/// Query that the server answers with "Movie not found!".
pub const UNKNOWN_QUERY: &str = "qqqqzzzz";

/// Number of results per page, as OMDb does.
const PAGE_SIZE: usize = 10;

/// How the server answers every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Behave like OMDb.
    Omdb,
    /// Fail with HTTP 500.
    ServerError,
    /// Return a 200 response whose body is not JSON.
    Garbage,
}

#[derive(Clone)]
struct ServerState {
    behavior: Behavior,
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
    latency: Arc<HashMap<String, Duration>>,
}

/// Handle to a running mock server.
pub struct MockOmdb {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl MockOmdb {
    pub async fn start(behavior: Behavior) -> Self {
        Self::start_with_latency(behavior, HashMap::new()).await
    }

    /// Starts a server that delays searches for the given `s` values.
    pub async fn start_with_latency(
        behavior: Behavior,
        latency: HashMap<String, Duration>,
    ) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = ServerState {
            behavior,
            requests: Arc::clone(&requests),
            latency: Arc::new(latency),
        };

        let app = Router::new().route("/", get(handle)).with_state(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock server");
        let addr = listener.local_addr().expect("mock server address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock server");
        });

        Self { addr, requests }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Test configuration pointed at this server.
    pub fn config(&self) -> CinescopeConfig {
        let mut config = CinescopeConfig::for_testing();
        config.api.base_url = self.base_url();
        config.api.request_timeout = Some(Duration::from_secs(5));
        config
    }

    /// Query parameters of every request received so far.
    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.requests.lock().clone()
    }
}

/// Base URL of a port nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind probe");
    let addr = listener.local_addr().expect("probe address");
    drop(listener);
    format!("http://{addr}")
}

async fn handle(
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.requests.lock().push(params.clone());

    if let Some(delay) = params.get("s").and_then(|s| state.latency.get(s)) {
        tokio::time::sleep(*delay).await;
    }

    match state.behavior {
        Behavior::ServerError => {
            return (StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded").into_response();
        }
        Behavior::Garbage => return (StatusCode::OK, "<html>not json</html>").into_response(),
        Behavior::Omdb => {}
    }

    if params.get("apikey").map(String::as_str) != Some(VALID_KEY) {
        return Json(json!({"Response": "False", "Error": "Invalid API key!"})).into_response();
    }

    if let Some(query) = params.get("s") {
        let page = params
            .get("page")
            .and_then(|p| p.parse::<usize>().ok())
            .unwrap_or(1);
        return Json(search_response(query, page)).into_response();
    }

    if let Some(id) = params.get("i") {
        return Json(details_response(id)).into_response();
    }

    Json(json!({"Response": "False", "Error": "Something went wrong."})).into_response()
}

/// 23 results for any known query, paged ten at a time.
fn search_response(query: &str, page: usize) -> Value {
    if query == UNKNOWN_QUERY {
        return json!({"Response": "False", "Error": "Movie not found!"});
    }

    let total = 23;
    let start = (page - 1) * PAGE_SIZE;
    let movies: Vec<Value> = (start..total.min(start + PAGE_SIZE))
        .map(|n| {
            json!({
                "Title": format!("{query} {}", n + 1),
                "Year": "2001",
                "imdbID": format!("tt{:07}", n + 1),
                "Type": "movie",
                "Poster": if n % 2 == 0 { "N/A".to_string() } else { format!("https://img.test/{n}.jpg") },
            })
        })
        .collect();

    if movies.is_empty() {
        return json!({"Response": "False", "Error": "Movie not found!"});
    }

    json!({
        "Search": movies,
        "totalResults": total.to_string(),
        "Response": "True",
    })
}

fn details_response(id: &str) -> Value {
    if !id.starts_with("tt") {
        return json!({"Response": "False", "Error": "Incorrect IMDb ID."});
    }

    json!({
        "Title": "Heat",
        "Year": "1995",
        "Rated": "R",
        "Released": "15 Dec 1995",
        "Runtime": "170 min",
        "Genre": "Action, Crime, Drama",
        "Director": "Michael Mann",
        "Writer": "Michael Mann",
        "Actors": "Al Pacino, Robert De Niro, Val Kilmer",
        "Plot": "A group of high-end professional thieves start to feel the heat.",
        "Language": "English, Spanish",
        "Country": "United States",
        "Awards": "14 nominations",
        "Poster": "N/A",
        "Ratings": [
            {"Source": "Internet Movie Database", "Value": "8.3/10"},
            {"Source": "Rotten Tomatoes", "Value": "83%"}
        ],
        "Metascore": "76",
        "imdbRating": "8.3",
        "imdbVotes": "707,450",
        "imdbID": id,
        "Type": "movie",
        "DVD": "N/A",
        "BoxOffice": "$67,436,818",
        "Production": "N/A",
        "Website": "N/A",
        "Response": "True"
    })
}
