//! Centralized configuration for Cinescope.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase. The lookup client
//! receives its configuration at construction time; nothing reads globals.

use std::time::Duration;

use url::Url;

use crate::CinescopeError;

/// Shared demo key. Override with `CINESCOPE_OMDB_API_KEY`.
pub const DEFAULT_API_KEY: &str = "8a4e6bd";

/// Public OMDb endpoint.
pub const DEFAULT_BASE_URL: &str = "http://www.omdbapi.com";

/// Central configuration for all Cinescope components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct CinescopeConfig {
    pub api: ApiConfig,
    pub search: SearchConfig,
}

/// Remote metadata API configuration.
///
/// Controls where requests go, how they are authenticated, and the fixed
/// filter parameters attached to every search and detail request.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the metadata endpoint
    pub base_url: String,
    /// Static key passed as the `apikey` query parameter
    pub api_key: String,
    /// Request timeout (None = rely on the transport default)
    pub request_timeout: Option<Duration>,
    /// User agent for HTTP requests
    pub user_agent: &'static str,
    /// Media type filter sent with every search
    pub media_type_filter: &'static str,
    /// Plot length requested for detail lookups
    pub plot_length: &'static str,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            request_timeout: None,
            user_agent: "cinescope/0.1.0",
            media_type_filter: "movie",
            plot_length: "full",
        }
    }
}

/// Search, suggestion and fallback behaviour.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Quiet period before a suggestion lookup fires
    pub debounce_delay: Duration,
    /// Queries with at most this many characters never trigger suggestions
    pub short_query_threshold: usize,
    /// Maximum number of suggestions shown
    pub suggestion_limit: usize,
    /// Substitute the built-in catalog when the remote call fails
    pub fallback_enabled: bool,
    /// Seed for the "popular" category query pick (None = random per process)
    pub popular_seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_delay: Duration::from_millis(300),
            short_query_threshold: 2,
            suggestion_limit: 8,
            fallback_enabled: true,
            popular_seed: None,
        }
    }
}

impl CinescopeConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults. Unparsable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(key) =
            std::env::var("CINESCOPE_OMDB_API_KEY").or_else(|_| std::env::var("OMDB_API_KEY"))
        {
            config.api.api_key = key;
        }

        if let Ok(base_url) = std::env::var("CINESCOPE_OMDB_BASE_URL") {
            config.api.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("CINESCOPE_REQUEST_TIMEOUT_SECS")
            && let Ok(seconds) = timeout.parse::<u64>()
        {
            config.api.request_timeout = Some(Duration::from_secs(seconds));
        }

        if let Ok(delay) = std::env::var("CINESCOPE_DEBOUNCE_MS")
            && let Ok(millis) = delay.parse::<u64>()
        {
            config.search.debounce_delay = Duration::from_millis(millis);
        }

        if let Ok(disabled) = std::env::var("CINESCOPE_DISABLE_FALLBACK") {
            config.search.fallback_enabled = !disabled.parse().unwrap_or(false);
        }

        if let Ok(seed) = std::env::var("CINESCOPE_POPULAR_SEED")
            && let Ok(seed_value) = seed.parse::<u64>()
        {
            config.search.popular_seed = Some(seed_value);
        }

        config
    }

    /// Creates a configuration for deterministic tests.
    ///
    /// Fixed popular seed and a fake key so nothing depends on the environment.
    pub fn for_testing() -> Self {
        Self {
            api: ApiConfig {
                api_key: "test-key".to_string(),
                ..Default::default()
            },
            search: SearchConfig {
                popular_seed: Some(42),
                ..Default::default()
            },
        }
    }

    /// Checks that the configuration can be used to reach the remote API.
    ///
    /// # Errors
    ///
    /// - `CinescopeError::Configuration` - Empty API key, unparsable base URL,
    ///   or a zero suggestion limit
    pub fn validate(&self) -> Result<(), CinescopeError> {
        if self.api.api_key.trim().is_empty() {
            return Err(CinescopeError::Configuration {
                reason: "API key must not be empty".to_string(),
            });
        }

        let url = Url::parse(&self.api.base_url).map_err(|e| CinescopeError::Configuration {
            reason: format!("invalid base URL '{}': {e}", self.api.base_url),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(CinescopeError::Configuration {
                reason: format!("unsupported URL scheme '{}'", url.scheme()),
            });
        }

        if self.search.suggestion_limit == 0 {
            return Err(CinescopeError::Configuration {
                reason: "suggestion limit must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}
