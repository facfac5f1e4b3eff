//! TMDB API Client
//!
//! HTTP client for the TMDB v3 search and discover endpoints.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

use super::types::parse_page;
use crate::models::{CatalogItem, MediaKind, PageEnvelope, YearFilter};
use crate::services::upstream::{
    CatalogSource, DiscoverFilters, UpstreamError, UpstreamMode, UpstreamPageRequest,
};

/// TMDB API Client
///
/// One instance is shared by all requests; `reqwest::Client` pools
/// connections internally.
pub struct TmdbClient {
    http: Client,
    base_url: Url,
    credential: Credential,
    language: String,
}

/// v4 read-access tokens are JWTs and go in the Authorization header,
/// v3 keys go in the query string
#[derive(Debug, Clone, PartialEq)]
enum Credential {
    Bearer(String),
    ApiKey(String),
}

impl Credential {
    fn from_key(key: &str) -> Self {
        if key.starts_with("eyJ") {
            Credential::Bearer(key.to_string())
        } else {
            Credential::ApiKey(key.to_string())
        }
    }
}

impl TmdbClient {
    /// Create a new TMDB client
    ///
    /// # Arguments
    /// * `base_url` - API root (e.g., "https://api.themoviedb.org/3")
    /// * `api_key` - v3 API key or v4 read-access token
    /// * `language` - Response language (e.g., "en-US")
    /// * `timeout` - Per-call transport timeout
    /// * `user_agent` - User-Agent header value
    pub fn new(
        base_url: &str,
        api_key: &str,
        language: &str,
        timeout: Duration,
        user_agent: &str,
    ) -> anyhow::Result<Self> {
        // Url::join drops the last segment unless the base ends with '/'
        let base_url = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
            .with_context(|| format!("Invalid TMDB base URL: {}", base_url))?;

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url,
            credential: Credential::from_key(api_key),
            language: language.to_string(),
        })
    }

    /// Endpoint path for a request, relative to the API root
    fn endpoint(request: &UpstreamPageRequest) -> Result<&'static str, UpstreamError> {
        match (request.mode, request.kind) {
            (UpstreamMode::Search, MediaKind::Movie) => Ok("search/movie"),
            (UpstreamMode::Search, MediaKind::Series) => Ok("search/tv"),
            (UpstreamMode::Search, MediaKind::Person) => Ok("search/person"),
            (UpstreamMode::Discover, MediaKind::Movie) => Ok("discover/movie"),
            (UpstreamMode::Discover, MediaKind::Series) => Ok("discover/tv"),
            (UpstreamMode::Discover, MediaKind::Person) => Err(UpstreamError::bad_response(
                "person catalog has no discover endpoint",
            )),
        }
    }

    /// Query parameters for a request, credential excluded
    fn query_params(&self, request: &UpstreamPageRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("language", self.language.clone()),
            ("page", request.page.to_string()),
            ("include_adult", "false".to_string()),
        ];

        match request.mode {
            UpstreamMode::Search => {
                if let Some(query) = &request.query {
                    params.push(("query", query.clone()));
                }
            }
            UpstreamMode::Discover => discover_params(request.kind, &request.filters, &mut params),
        }

        params
    }

    /// Perform one GET and decode the page
    async fn get_page(
        &self,
        request: &UpstreamPageRequest,
    ) -> Result<PageEnvelope<CatalogItem>, UpstreamError> {
        let path = Self::endpoint(request)?;
        let url = self
            .base_url
            .join(path)
            .map_err(|e| UpstreamError::bad_response(format!("Invalid endpoint URL: {}", e)))?;

        debug!(kind = %request.kind, page = request.page, "TMDB request: {}", path);

        let mut builder = self.http.get(url).query(&self.query_params(request));
        builder = match &self.credential {
            Credential::Bearer(token) => builder.bearer_auth(token),
            Credential::ApiKey(key) => builder.query(&[("api_key", key)]),
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::timeout(format!("TMDB did not respond: {}", e))
            } else {
                UpstreamError::unavailable(format!("Request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = format!("HTTP error: {}", status);
            return Err(
                if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
                    UpstreamError::unavailable(message)
                } else {
                    UpstreamError::bad_response(message)
                },
            );
        }

        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::timeout(format!("Timed out reading response: {}", e))
            } else {
                UpstreamError::unavailable(format!("Failed to read response: {}", e))
            }
        })?;

        parse_page(request.kind, &text).map_err(|e| {
            error!("Failed to parse TMDB response for '{}': {}", path, e);
            debug!("Response text: {}", text.chars().take(500).collect::<String>());
            UpstreamError::bad_response(format!("Parse error: {}", e))
        })
    }
}

#[async_trait]
impl CatalogSource for TmdbClient {
    async fn fetch(
        &self,
        request: &UpstreamPageRequest,
    ) -> Result<PageEnvelope<CatalogItem>, UpstreamError> {
        self.get_page(request).await
    }
}

/// Translate discovery filters into TMDB `/discover` parameters
fn discover_params(
    kind: MediaKind,
    filters: &DiscoverFilters,
    params: &mut Vec<(&'static str, String)>,
) {
    let is_series = kind == MediaKind::Series;

    params.push(("sort_by", filters.sort.upstream_key(kind)));

    if let Some(category) = filters.category_id {
        params.push(("with_genres", category.to_string()));
    }

    match filters.year {
        Some(YearFilter::Exact(year)) => {
            let key = if is_series {
                "first_air_date_year"
            } else {
                "primary_release_year"
            };
            params.push((key, year.to_string()));
        }
        Some(YearFilter::Range { from, to }) => {
            let (gte, lte) = if is_series {
                ("first_air_date.gte", "first_air_date.lte")
            } else {
                ("primary_release_date.gte", "primary_release_date.lte")
            };
            if let Some(from) = from {
                params.push((gte, format!("{}-01-01", from)));
            }
            if let Some(to) = to {
                params.push((lte, format!("{}-12-31", to)));
            }
        }
        None => {}
    }

    if let Some(rating) = filters.min_rating {
        params.push(("vote_average.gte", rating.to_string()));
    }
    if let Some(min) = filters.runtime_min {
        params.push(("with_runtime.gte", min.to_string()));
    }
    if let Some(max) = filters.runtime_max {
        params.push(("with_runtime.lte", max.to_string()));
    }
    if let Some(country) = &filters.origin_country {
        params.push(("with_origin_country", country.clone()));
    }
    if let Some(provider) = filters.watch_provider {
        params.push(("with_watch_providers", provider.to_string()));
        if let Some(region) = &filters.watch_region {
            params.push(("watch_region", region.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortKey;

    fn client(key: &str) -> TmdbClient {
        TmdbClient::new(
            "https://api.themoviedb.org/3/",
            key,
            "en-US",
            Duration::from_secs(15),
            "test-agent",
        )
        .unwrap()
    }

    fn param<'a>(params: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        params.iter().find(|(k, _)| *k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_base_url_joins_endpoint() {
        let c = client("abc");
        assert_eq!(
            c.base_url.join("discover/movie").unwrap().as_str(),
            "https://api.themoviedb.org/3/discover/movie"
        );
    }

    #[test]
    fn test_credential_detection() {
        assert_eq!(client("abc123").credential, Credential::ApiKey("abc123".to_string()));
        assert!(matches!(client("eyJhbGciOi").credential, Credential::Bearer(_)));
    }

    #[test]
    fn test_search_params() {
        let c = client("abc");
        let request = UpstreamPageRequest::search(MediaKind::Series, "dark", 3);
        let params = c.query_params(&request);
        assert_eq!(param(&params, "query"), Some("dark"));
        assert_eq!(param(&params, "page"), Some("3"));
        assert_eq!(param(&params, "language"), Some("en-US"));
        assert_eq!(param(&params, "sort_by"), None);
        assert_eq!(TmdbClient::endpoint(&request).unwrap(), "search/tv");
    }

    #[test]
    fn test_discover_movie_params() {
        let c = client("abc");
        let filters = DiscoverFilters {
            category_id: Some(28),
            year: Some(YearFilter::Range {
                from: Some(1990),
                to: Some(1999),
            }),
            min_rating: Some(7.5),
            runtime_min: Some(90),
            runtime_max: Some(150),
            origin_country: Some("US".to_string()),
            watch_provider: Some(8),
            watch_region: Some("BR".to_string()),
            sort: SortKey::ReleaseDateDesc,
        };
        let request = UpstreamPageRequest::discover(MediaKind::Movie, filters, 1);
        let params = c.query_params(&request);

        assert_eq!(param(&params, "with_genres"), Some("28"));
        assert_eq!(param(&params, "primary_release_date.gte"), Some("1990-01-01"));
        assert_eq!(param(&params, "primary_release_date.lte"), Some("1999-12-31"));
        assert_eq!(param(&params, "vote_average.gte"), Some("7.5"));
        assert_eq!(param(&params, "with_runtime.gte"), Some("90"));
        assert_eq!(param(&params, "with_runtime.lte"), Some("150"));
        assert_eq!(param(&params, "with_origin_country"), Some("US"));
        assert_eq!(param(&params, "with_watch_providers"), Some("8"));
        assert_eq!(param(&params, "watch_region"), Some("BR"));
        assert_eq!(param(&params, "sort_by"), Some("primary_release_date.desc"));
    }

    #[test]
    fn test_discover_tv_exact_year() {
        let c = client("abc");
        let filters = DiscoverFilters {
            year: Some(YearFilter::Exact(2008)),
            watch_region: Some("US".to_string()),
            ..Default::default()
        };
        let params = c.query_params(&UpstreamPageRequest::discover(MediaKind::Series, filters, 2));
        assert_eq!(param(&params, "first_air_date_year"), Some("2008"));
        assert_eq!(param(&params, "sort_by"), Some("popularity.desc"));
        // region only accompanies a provider
        assert_eq!(param(&params, "watch_region"), None);
        assert_eq!(param(&params, "with_genres"), None);
    }

    #[test]
    fn test_person_discover_is_rejected() {
        let request =
            UpstreamPageRequest::discover(MediaKind::Person, DiscoverFilters::default(), 1);
        assert!(TmdbClient::endpoint(&request).is_err());
    }
}
