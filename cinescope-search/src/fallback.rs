//! Built-in catalog substituted when the remote lookup fails.
//!
//! Returns realistic data so the browsing workflow keeps working without
//! network access or a valid API key.

use std::collections::HashMap;

use crate::types::{MovieDetails, MovieSummary, Rating, SearchPage};

/// Identifier of the record served for unknown detail lookups.
pub const DEFAULT_DETAILS_ID: &str = "tt0111161";

/// Fixed result set for list operations plus a handful of detail records.
#[derive(Debug, Clone)]
pub struct FallbackCatalog {
    movies: Vec<MovieSummary>,
    details: HashMap<String, MovieDetails>,
    default_id: String,
}

impl Default for FallbackCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FallbackCatalog {
    /// Creates a catalog from explicit data.
    ///
    /// `default_id` should name a record in `details`; if it does not, the
    /// first detail record (by id) is served for unknown lookups instead.
    pub fn new(
        movies: Vec<MovieSummary>,
        details: Vec<MovieDetails>,
        default_id: impl Into<String>,
    ) -> Self {
        Self {
            movies,
            details: details
                .into_iter()
                .map(|d| (d.summary.id.clone(), d))
                .collect(),
            default_id: default_id.into(),
        }
    }

    /// The eight well-known titles and two detail records shipped with Cinescope.
    pub fn builtin() -> Self {
        let movies = vec![
            summary(
                "tt0111161",
                "The Shawshank Redemption",
                "1994",
                "https://m.media-amazon.com/images/M/MV5BNDE3ODcxYzMtY2YzZC00NmNlLWExZGUtYzAwZDQzOWNkNjRiXkEyXkFqcGdeQXVyNjAwNDUxODI@._V1_SX300.jpg",
            ),
            summary(
                "tt0068646",
                "The Godfather",
                "1972",
                "https://m.media-amazon.com/images/M/MV5BM2MyNjYxNmUtYzcwZi00YzVlLWJkMjYtZGJkYmMxNmQ3NjE5XkEyXkFqcGdeQXVyNzkwMjQ5NzM@._V1_SX300.jpg",
            ),
            summary(
                "tt0468569",
                "The Dark Knight",
                "2008",
                "https://m.media-amazon.com/images/M/MV5BMTMxNTMwODM3NF5BMl5BanBnXkFtZTcwODAyMTk2Mw@@._V1_SX300.jpg",
            ),
            summary(
                "tt0071562",
                "The Godfather: Part II",
                "1974",
                "https://m.media-amazon.com/images/M/MV5BMWMwMGQzZGUtM2Q5OS00NTc1LThiODUtYjQwNDU5NjY3ZjA0XkEyXkFqcGdeQXVyNzkwMjQ5NzM@._V1_SX300.jpg",
            ),
            summary(
                "tt0050083",
                "12 Angry Men",
                "1957",
                "https://m.media-amazon.com/images/M/MV5BODU4NjM4MjIwM15BMl5BanBnXkFtZTgwNTM3NTg4OTE@._V1_SX300.jpg",
            ),
            summary(
                "tt0108052",
                "Schindler's List",
                "1993",
                "https://m.media-amazon.com/images/M/MV5BNDE4ODMxMjAyMl5BMl5BanBnXkFtZTgwNTM3NTg4OTE@._V1_SX300.jpg",
            ),
            summary(
                "tt0110912",
                "Pulp Fiction",
                "1994",
                "https://m.media-amazon.com/images/M/MV5BNGNhMDI5ZTUtNTBhNS00NjA3LWIxY2MzZDQzNjNhXkEyXkFqcGdeQXVyNzkwMjQ5NzM@._V1_SX300.jpg",
            ),
            summary(
                "tt0167260",
                "The Lord of the Rings: The Return of the King",
                "2003",
                "https://m.media-amazon.com/images/M/MV5BNzA5ZDNlZWMtM2NhNS00NDJjLTk4NDYtM2Q0YThkZjI5MTFkXkEyXkFqcGdeQXVyNzkwMjQ5NzM@._V1_SX300.jpg",
            ),
        ];

        let shawshank = MovieDetails {
            summary: movies[0].clone(),
            released: "23 Sep 1994".to_string(),
            runtime: "142 min".to_string(),
            genre: "Drama".to_string(),
            director: "Frank Darabont".to_string(),
            writer: "Stephen King, Frank Darabont".to_string(),
            actors: "Tim Robbins, Morgan Freeman, Bob Gunton".to_string(),
            plot: "Two imprisoned men bond over a number of years, finding solace and eventual redemption through acts of common decency.".to_string(),
            language: "English".to_string(),
            country: "United States".to_string(),
            awards: "Nominated for 7 Oscars. 21 wins & 42 nominations total".to_string(),
            ratings: ratings("9.3/10", "91%", "81/100"),
            metascore: "81".to_string(),
            imdb_rating: "9.3".to_string(),
            imdb_votes: "2,600,000".to_string(),
            dvd: "20 Jan 1998".to_string(),
            box_office: "$28,341,469".to_string(),
            production: "N/A".to_string(),
            website: "N/A".to_string(),
        };

        let godfather = MovieDetails {
            summary: movies[1].clone(),
            released: "24 Mar 1972".to_string(),
            runtime: "175 min".to_string(),
            genre: "Crime, Drama".to_string(),
            director: "Francis Ford Coppola".to_string(),
            writer: "Mario Puzo, Francis Ford Coppola".to_string(),
            actors: "Marlon Brando, Al Pacino, James Caan".to_string(),
            plot: "The aging patriarch of an organized crime dynasty transfers control of his clandestine empire to his reluctant son.".to_string(),
            language: "English, Italian, Latin".to_string(),
            country: "United States".to_string(),
            awards: "Won 3 Oscars. 30 wins & 54 nominations total".to_string(),
            ratings: ratings("9.2/10", "97%", "100/100"),
            metascore: "100".to_string(),
            imdb_rating: "9.2".to_string(),
            imdb_votes: "1,800,000".to_string(),
            dvd: "09 Oct 2001".to_string(),
            box_office: "$134,921,495".to_string(),
            production: "N/A".to_string(),
            website: "N/A".to_string(),
        };

        Self::new(movies, vec![shawshank, godfather], DEFAULT_DETAILS_ID)
    }

    /// The fixed list served for every failed list operation.
    pub fn search_page(&self) -> SearchPage {
        SearchPage {
            movies: self.movies.clone(),
            total_results: self.movies.len() as u32,
        }
    }

    /// Record for `id`, or the default record when `id` is unknown.
    ///
    /// Returns `None` only for a catalog built without any detail records.
    pub fn details_for(&self, id: &str) -> Option<MovieDetails> {
        self.details
            .get(id)
            .or_else(|| self.details.get(&self.default_id))
            .or_else(|| {
                self.details
                    .iter()
                    .min_by(|a, b| a.0.cmp(b.0))
                    .map(|(_, d)| d)
            })
            .cloned()
    }

    pub fn movies(&self) -> &[MovieSummary] {
        &self.movies
    }
}

fn summary(id: &str, title: &str, year: &str, poster_url: &str) -> MovieSummary {
    MovieSummary {
        id: id.to_string(),
        title: title.to_string(),
        year: year.to_string(),
        poster_url: poster_url.to_string(),
        media_type: "movie".to_string(),
    }
}

fn ratings(imdb: &str, rotten_tomatoes: &str, metacritic: &str) -> Vec<Rating> {
    [
        ("Internet Movie Database", imdb),
        ("Rotten Tomatoes", rotten_tomatoes),
        ("Metacritic", metacritic),
    ]
    .into_iter()
    .map(|(source, value)| Rating {
        source: source.to_string(),
        value: value.to_string(),
    })
    .collect()
}
