//! OMDb wire format and HTTP transport.
//!
//! The remote is a single GET endpoint. Searches send `s`, `page` and
//! `type`; detail lookups send `i` and `plot`. Every request carries
//! `apikey`. Responses are JSON objects with a `"Response": "True"|"False"`
//! flag and either a `Search` list or a single detail record.

use std::fmt;

use async_trait::async_trait;
use cinescope_core::ApiConfig;
use serde::Deserialize;
use serde_json::Value;

use crate::errors::LookupError;
use crate::types::{MovieDetails, MovieSummary, Rating, SearchPage};

/// Query parameters for one request, in the order they are sent.
pub type QueryParams = Vec<(&'static str, String)>;

/// Transport for the metadata endpoint.
///
/// Implementations perform one GET with the given query parameters and
/// return the decoded JSON body. Interpreting the body is the caller's job.
#[async_trait]
pub trait MetadataTransport: Send + Sync + fmt::Debug {
    /// Performs the request.
    ///
    /// # Errors
    /// - `LookupError::Transport` - Request could not be sent
    /// - `LookupError::HttpStatus` - Non-success status code
    /// - `LookupError::Malformed` - Body is not JSON
    async fn fetch(&self, params: &[(&'static str, String)]) -> Result<Value, LookupError>;
}

/// reqwest-backed transport used in production.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// Builds a transport from the API configuration.
    ///
    /// No timeout is applied unless `request_timeout` is set.
    ///
    /// # Errors
    /// - `LookupError::Transport` - HTTP client could not be constructed
    pub fn new(api: &ApiConfig) -> Result<Self, LookupError> {
        let mut builder = reqwest::Client::builder().user_agent(api.user_agent);
        if let Some(timeout) = api.request_timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| LookupError::Transport {
            reason: format!("failed to build HTTP client: {e}"),
        })?;

        Ok(Self {
            client,
            endpoint: format!("{}/", api.base_url.trim_end_matches('/')),
        })
    }

    /// URL every request is sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl MetadataTransport for HttpTransport {
    async fn fetch(&self, params: &[(&'static str, String)]) -> Result<Value, LookupError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(params)
            .send()
            .await
            .map_err(|e| LookupError::Transport {
                reason: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::HttpStatus {
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| LookupError::Malformed {
                reason: format!("JSON parsing failed: {e}"),
            })
    }
}

/// Summary record as it appears in a `Search` list.
#[derive(Debug, Clone, Deserialize)]
struct OmdbMovie {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year", default)]
    year: String,
    #[serde(rename = "Poster", default)]
    poster: String,
    #[serde(rename = "Type", default)]
    media_type: String,
}

impl From<OmdbMovie> for MovieSummary {
    fn from(movie: OmdbMovie) -> Self {
        Self {
            id: movie.imdb_id,
            title: movie.title,
            year: movie.year,
            poster_url: movie.poster,
            media_type: movie.media_type,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Search", default)]
    search: Vec<OmdbMovie>,
    #[serde(rename = "totalResults")]
    total_results: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbRating {
    #[serde(rename = "Source")]
    source: String,
    #[serde(rename = "Value")]
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct OmdbDetails {
    #[serde(flatten)]
    movie: OmdbMovie,
    #[serde(default)]
    released: String,
    #[serde(default)]
    runtime: String,
    #[serde(default)]
    genre: String,
    #[serde(default)]
    director: String,
    #[serde(default)]
    writer: String,
    #[serde(default)]
    actors: String,
    #[serde(default)]
    plot: String,
    #[serde(default)]
    language: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    awards: String,
    #[serde(default)]
    ratings: Vec<OmdbRating>,
    #[serde(default)]
    metascore: String,
    #[serde(rename = "imdbRating", default)]
    imdb_rating: String,
    #[serde(rename = "imdbVotes", default)]
    imdb_votes: String,
    #[serde(rename = "DVD", default)]
    dvd: String,
    #[serde(default)]
    box_office: String,
    #[serde(default)]
    production: String,
    #[serde(default)]
    website: String,
}

impl From<OmdbDetails> for MovieDetails {
    fn from(details: OmdbDetails) -> Self {
        Self {
            summary: details.movie.into(),
            released: details.released,
            runtime: details.runtime,
            genre: details.genre,
            director: details.director,
            writer: details.writer,
            actors: details.actors,
            plot: details.plot,
            language: details.language,
            country: details.country,
            awards: details.awards,
            ratings: details
                .ratings
                .into_iter()
                .map(|r| Rating {
                    source: r.source,
                    value: r.value,
                })
                .collect(),
            metascore: details.metascore,
            imdb_rating: details.imdb_rating,
            imdb_votes: details.imdb_votes,
            dvd: details.dvd,
            box_office: details.box_office,
            production: details.production,
            website: details.website,
        }
    }
}

/// Rejects negative responses.
///
/// Only an explicit `"Response": "False"` counts as negative; a missing
/// flag is left to the typed parse to judge.
fn check_response_flag(body: &Value) -> Result<(), LookupError> {
    let Some(object) = body.as_object() else {
        return Err(LookupError::Malformed {
            reason: "expected a JSON object".to_string(),
        });
    };

    let negative = object
        .get("Response")
        .and_then(Value::as_str)
        .is_some_and(|flag| flag.eq_ignore_ascii_case("false"));

    if negative {
        let message = object
            .get("Error")
            .and_then(Value::as_str)
            .map(str::to_string);
        return Err(LookupError::remote(message));
    }

    Ok(())
}

/// Parses a search response body into a page of summaries.
///
/// # Errors
/// - `LookupError::Remote` - Body carries a negative response flag
/// - `LookupError::Malformed` - Body does not match the search shape
pub fn parse_search(body: Value) -> Result<SearchPage, LookupError> {
    check_response_flag(&body)?;

    let response: OmdbSearchResponse =
        serde_json::from_value(body).map_err(|e| LookupError::Malformed {
            reason: format!("invalid search payload: {e}"),
        })?;

    let movies: Vec<MovieSummary> = response.search.into_iter().map(Into::into).collect();
    let total_results = response
        .total_results
        .and_then(|total| total.parse().ok())
        .unwrap_or(movies.len() as u32);

    Ok(SearchPage {
        movies,
        total_results,
    })
}

/// Parses a detail response body.
///
/// # Errors
/// - `LookupError::Remote` - Body carries a negative response flag
/// - `LookupError::Malformed` - Body does not match the detail shape
pub fn parse_details(body: Value) -> Result<MovieDetails, LookupError> {
    check_response_flag(&body)?;

    let details: OmdbDetails =
        serde_json::from_value(body).map_err(|e| LookupError::Malformed {
            reason: format!("invalid detail payload: {e}"),
        })?;

    Ok(details.into())
}
