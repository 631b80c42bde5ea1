//! Data types for movie lookups.

use serde::{Deserialize, Serialize};

/// Shown in place of a poster when the remote has none.
pub const PLACEHOLDER_POSTER: &str = "/placeholder-movie.jpg";

/// Compact movie record as returned by a search.
///
/// Identity is `id` (the IMDb identifier). Fields are copied verbatim from
/// the remote response, including the `N/A` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: String,
    pub title: String,
    pub year: String,
    pub poster_url: String,
    pub media_type: String,
}

impl MovieSummary {
    /// Poster URL, or the placeholder when the remote reported none.
    pub fn poster_or_placeholder(&self) -> &str {
        if self.poster_url.is_empty() || self.poster_url == "N/A" {
            PLACEHOLDER_POSTER
        } else {
            &self.poster_url
        }
    }
}

/// Rating from one source, e.g. `("Rotten Tomatoes", "91%")`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub source: String,
    pub value: String,
}

/// Full descriptive record for a single movie.
///
/// Fetched fresh for every detail request and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetails {
    pub summary: MovieSummary,
    pub released: String,
    pub runtime: String,
    pub genre: String,
    pub director: String,
    pub writer: String,
    pub actors: String,
    pub plot: String,
    pub language: String,
    pub country: String,
    pub awards: String,
    pub ratings: Vec<Rating>,
    pub metascore: String,
    pub imdb_rating: String,
    pub imdb_votes: String,
    pub dvd: String,
    pub box_office: String,
    pub production: String,
    pub website: String,
}

impl MovieDetails {
    /// Main cast members split out of the comma separated `actors` field.
    pub fn cast(&self) -> Vec<&str> {
        self.actors
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty() && *name != "N/A")
            .collect()
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    pub movies: Vec<MovieSummary>,
    /// Total hits reported by the remote across all pages
    pub total_results: u32,
}

impl SearchPage {
    /// Keeps at most `limit` movies. `total_results` is left untouched.
    pub fn truncated(mut self, limit: usize) -> Self {
        self.movies.truncate(limit);
        self
    }
}

/// Browsing categories offered by the UI.
///
/// None of these exist on the remote; each is served by a substitute
/// free-text query (see [`crate::LookupClient::query_for_category`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Trending,
    Popular,
    TopRated,
    Upcoming,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 4] = [
        Category::Trending,
        Category::Popular,
        Category::TopRated,
        Category::Upcoming,
    ];

    /// Stable machine name.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Trending => "trending",
            Category::Popular => "popular",
            Category::TopRated => "top_rated",
            Category::Upcoming => "upcoming",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "trending" => Ok(Category::Trending),
            "popular" => Ok(Category::Popular),
            "top_rated" => Ok(Category::TopRated),
            "upcoming" => Ok(Category::Upcoming),
            _ => Err(format!("Unknown category: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(poster: &str) -> MovieSummary {
        MovieSummary {
            id: "tt0000001".to_string(),
            title: "Test".to_string(),
            year: "2000".to_string(),
            poster_url: poster.to_string(),
            media_type: "movie".to_string(),
        }
    }

    #[test]
    fn test_poster_placeholder() {
        assert_eq!(summary("N/A").poster_or_placeholder(), PLACEHOLDER_POSTER);
        assert_eq!(summary("").poster_or_placeholder(), PLACEHOLDER_POSTER);
        assert_eq!(
            summary("https://img.example/p.jpg").poster_or_placeholder(),
            "https://img.example/p.jpg"
        );
    }

    #[test]
    fn test_category_parsing() {
        assert_eq!("trending".parse::<Category>(), Ok(Category::Trending));
        assert_eq!("Top-Rated".parse::<Category>(), Ok(Category::TopRated));
        assert_eq!("top_rated".parse::<Category>(), Ok(Category::TopRated));
        assert!("classics".parse::<Category>().is_err());

        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn test_truncated_keeps_total() {
        let page = SearchPage {
            movies: vec![summary("N/A"); 10],
            total_results: 120,
        };
        let page = page.truncated(8);
        assert_eq!(page.movies.len(), 8);
        assert_eq!(page.total_results, 120);
    }
}
