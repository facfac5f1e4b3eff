use std::env;
use std::str::FromStr;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,
    pub node_env: String,

    // Upstream catalog
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: String,
    pub tmdb_language: String,
    pub upstream_timeout_ms: u64,

    // Search
    pub default_watch_region: String,
    pub search_cache_max_age_secs: u64,
    pub degraded_cache_max_age_secs: u64,

    // Misc
    pub user_agent: String,
}

/// Parse an env var, falling back to a default when unset or invalid
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            // Server
            port: env_or("PORT", 3001),
            node_env: env::var("NODE_ENV").unwrap_or_else(|_| "development".to_string()),

            // Upstream catalog
            tmdb_api_key: env::var("TMDB_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            tmdb_base_url: env::var("TMDB_BASE_URL")
                .unwrap_or_else(|_| "https://api.themoviedb.org/3".to_string()),
            tmdb_language: env::var("TMDB_LANGUAGE").unwrap_or_else(|_| "en-US".to_string()),
            upstream_timeout_ms: env_or("UPSTREAM_TIMEOUT_MS", 15_000), // 15 seconds

            // Search
            default_watch_region: env::var("DEFAULT_WATCH_REGION")
                .unwrap_or_else(|_| "US".to_string()),
            search_cache_max_age_secs: env_or("SEARCH_CACHE_MAX_AGE_SECS", 3600), // 1 hour
            degraded_cache_max_age_secs: env_or("DEGRADED_CACHE_MAX_AGE_SECS", 60),

            // Misc
            user_agent: env::var("USER_AGENT")
                .unwrap_or_else(|_| format!("discovery-server/{}", env!("CARGO_PKG_VERSION"))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
