//! Upstream catalog seam
//!
//! The discovery engine talks to the movie/series catalogs only through
//! [`CatalogSource`]. One call fetches one physical page of one resource
//! kind, and every failure is normalized into an [`UpstreamError`].

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{CatalogItem, FilterSpec, MediaKind, PageEnvelope, SortKey, YearFilter};

#[cfg(test)]
pub mod stub;

/// Fixed page size of the upstream catalogs
pub const UPSTREAM_PAGE_SIZE: usize = 20;

/// Highest page number the upstream will serve
pub const MAX_UPSTREAM_PAGE: u32 = 500;

/// Upstream endpoint family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpstreamMode {
    Search,
    Discover,
}

/// Discovery filters for a single upstream call. Carries at most one
/// category id: the upstream ANDs multiple ids, which would narrow the
/// result instead of broadening it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscoverFilters {
    pub category_id: Option<i64>,
    pub year: Option<YearFilter>,
    pub min_rating: Option<f64>,
    pub runtime_min: Option<u32>,
    pub runtime_max: Option<u32>,
    pub origin_country: Option<String>,
    pub watch_provider: Option<i64>,
    pub watch_region: Option<String>,
    pub sort: SortKey,
}

impl DiscoverFilters {
    /// Filters of a request narrowed to one category (or none)
    pub fn from_spec(spec: &FilterSpec, category_id: Option<i64>) -> Self {
        Self {
            category_id,
            year: spec.year,
            min_rating: spec.min_rating,
            runtime_min: spec.runtime_min,
            runtime_max: spec.runtime_max,
            origin_country: spec.origin_country.clone(),
            watch_provider: spec.watch_provider,
            watch_region: Some(spec.watch_region.clone()),
            sort: spec.sort.clone(),
        }
    }
}

/// Atomic unit of upstream work
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamPageRequest {
    pub kind: MediaKind,
    pub mode: UpstreamMode,
    pub page: u32,
    pub query: Option<String>,
    pub filters: DiscoverFilters,
}

impl UpstreamPageRequest {
    pub fn search(kind: MediaKind, query: &str, page: u32) -> Self {
        Self {
            kind,
            mode: UpstreamMode::Search,
            page,
            query: Some(query.to_string()),
            filters: DiscoverFilters::default(),
        }
    }

    pub fn discover(kind: MediaKind, filters: DiscoverFilters, page: u32) -> Self {
        Self {
            kind,
            mode: UpstreamMode::Discover,
            page,
            query: None,
            filters,
        }
    }

    /// Same request against another physical page
    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}

/// Failure class of an upstream call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    Timeout,
    Unavailable,
    BadResponse,
}

impl UpstreamErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamErrorKind::Timeout => "timeout",
            UpstreamErrorKind::Unavailable => "unavailable",
            UpstreamErrorKind::BadResponse => "bad_response",
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("upstream {} error: {message}", .kind.as_str())]
pub struct UpstreamError {
    pub kind: UpstreamErrorKind,
    pub message: String,
}

impl UpstreamError {
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            kind: UpstreamErrorKind::Timeout,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: UpstreamErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn bad_response(message: impl Into<String>) -> Self {
        Self {
            kind: UpstreamErrorKind::BadResponse,
            message: message.into(),
        }
    }
}

/// A paginated movie/series/person catalog
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch one physical page. Items come back tagged with `request.kind`.
    async fn fetch(
        &self,
        request: &UpstreamPageRequest,
    ) -> Result<PageEnvelope<CatalogItem>, UpstreamError>;
}
