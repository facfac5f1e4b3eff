//! Discovery Aggregation
//!
//! Turns one caller-facing search into the upstream calls needed to answer
//! it, and merges the pages back into a single logical page:
//!
//! - **Classification**: keyword search, person search, filtered discovery,
//!   or reject ([`classifier`])
//! - **Genre fan-out**: OR across several categories ([`fanout`])
//! - **Page stitching**: 42-item pages from 20-item upstream pages ([`stitch`])
//! - **Merging**: interleave, concatenate, deduplicate, sort ([`merge`])
//! - **Assembly**: totals and cache hints ([`assemble`])
//!
//! Every upstream call of a request shares one deadline ([`deadline`]). Any
//! failure or expiry degrades to an empty page; partial pages are never
//! returned.

pub mod assemble;
pub mod classifier;
pub mod deadline;
pub mod fanout;
pub mod merge;
pub mod stitch;

use futures::future::try_join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{CatalogItem, FilterSpec, LogicalPageSize, PageEnvelope};
use crate::services::metrics;
use crate::services::upstream::{
    CatalogSource, DiscoverFilters, UpstreamError, UpstreamPageRequest, MAX_UPSTREAM_PAGE,
};

pub use assemble::{CacheHints, Freshness, SearchOutcome};
pub use classifier::{classify, QueryMode};

use assemble::{assemble, plain_totals};
use deadline::with_deadline;
use merge::{merge_all, MergeStrategy};

/// Failure of a logical request. Never reaches the caller.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

impl DiscoveryError {
    /// Label for logs and the degraded counter
    pub fn reason(&self) -> &'static str {
        match self {
            DiscoveryError::Upstream(e) => e.kind.as_str(),
            DiscoveryError::DeadlineExceeded(_) => "deadline",
        }
    }
}

/// The request carries nothing that selects content
#[derive(Debug, Error, PartialEq)]
#[error("query or at least one filter is required")]
pub struct Rejected;

/// Search/discover engine over a catalog source
#[derive(Clone)]
pub struct DiscoveryService {
    source: Arc<dyn CatalogSource>,
    deadline: Duration,
}

impl DiscoveryService {
    pub fn new(source: Arc<dyn CatalogSource>, deadline: Duration) -> Self {
        Self { source, deadline }
    }

    /// Serve one search. Only a request without any criteria is an error;
    /// upstream trouble yields a degraded empty page.
    pub async fn search(&self, spec: &FilterSpec) -> Result<SearchOutcome, Rejected> {
        let mode = classify(spec);
        metrics::SEARCHES.with_label_values(&[mode.as_str()]).inc();

        match mode {
            QueryMode::Reject => return Err(Rejected),
            QueryMode::Empty => {
                info!(mode = mode.as_str(), "Search cannot be served, returning empty page");
                return Ok(SearchOutcome::empty(spec.page));
            }
            _ => {}
        }

        let started = Instant::now();
        match with_deadline(self.deadline, self.execute(spec, mode)).await {
            Ok(envelope) => {
                info!(
                    mode = mode.as_str(),
                    page = spec.page,
                    results = envelope.results.len(),
                    total_results = envelope.total_results,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Search complete"
                );
                Ok(SearchOutcome::from_envelope(envelope))
            }
            Err(e) => {
                warn!(
                    mode = mode.as_str(),
                    reason = e.reason(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Search degraded to empty page: {}",
                    e
                );
                metrics::DEGRADED.with_label_values(&[e.reason()]).inc();
                Ok(SearchOutcome::degraded(spec.page))
            }
        }
    }

    async fn execute(
        &self,
        spec: &FilterSpec,
        mode: QueryMode,
    ) -> Result<PageEnvelope<CatalogItem>, DiscoveryError> {
        let source = self.source.as_ref();
        let kinds = spec.resource.targets();

        if mode == QueryMode::FilteredDiscovery && spec.keyword.is_some() {
            debug!(
                categories = spec.category_ids.len(),
                "Keyword ignored by filtered discovery"
            );
        }

        let envelope = match mode {
            QueryMode::KeywordSearch | QueryMode::PersonSearch => {
                let query = spec.keyword.as_deref().unwrap_or_default();
                let bases: Vec<_> = kinds
                    .iter()
                    .map(|kind| UpstreamPageRequest::search(*kind, query, spec.page))
                    .collect();
                paged(source, spec, &bases).await?
            }
            QueryMode::FilteredDiscovery if spec.category_ids.len() > 1 => {
                fanout::fan_out_page(source, spec).await?
            }
            QueryMode::FilteredDiscovery => {
                let filters = DiscoverFilters::from_spec(spec, spec.category_ids.first().copied());
                let bases: Vec<_> = kinds
                    .iter()
                    .map(|kind| UpstreamPageRequest::discover(*kind, filters.clone(), spec.page))
                    .collect();
                paged(source, spec, &bases).await?
            }
            QueryMode::Reject | QueryMode::Empty => PageEnvelope::empty(spec.page),
        };

        Ok(envelope)
    }
}

/// One upstream page per kind for standard pages, stitched pages for wide
async fn paged(
    source: &dyn CatalogSource,
    spec: &FilterSpec,
    bases: &[UpstreamPageRequest],
) -> Result<PageEnvelope<CatalogItem>, UpstreamError> {
    match spec.page_size {
        LogicalPageSize::Standard => plain_page(source, spec.page, bases).await,
        LogicalPageSize::Wide => stitch::stitch_page(source, spec.page, bases).await,
    }
}

/// Standard page: kinds concatenated in target order, totals summed.
/// With both kinds targeted this holds up to two upstream pages (40 items).
async fn plain_page(
    source: &dyn CatalogSource,
    page: u32,
    bases: &[UpstreamPageRequest],
) -> Result<PageEnvelope<CatalogItem>, UpstreamError> {
    if page > MAX_UPSTREAM_PAGE {
        return Ok(PageEnvelope::empty(page));
    }

    let pages = fetch_all(source, bases).await?;
    let (total_pages, total_results) = plain_totals(&pages);
    let results = merge_all(
        pages.into_iter().map(|p| p.results).collect(),
        MergeStrategy::Concat,
    );

    Ok(assemble(page, results, total_pages, total_results))
}

/// Issue every request concurrently; the first failure fails the join and
/// drops the calls still running.
pub(crate) async fn fetch_all(
    source: &dyn CatalogSource,
    requests: &[UpstreamPageRequest],
) -> Result<Vec<PageEnvelope<CatalogItem>>, UpstreamError> {
    let calls = requests.iter().map(|request| async move {
        let result = source.fetch(request).await;

        let kind = request.kind.to_string();
        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => {
                debug!(kind = %request.kind, page = request.page, "Upstream call failed: {}", e);
                e.kind.as_str()
            }
        };
        metrics::UPSTREAM_CALLS
            .with_label_values(&[kind.as_str(), outcome])
            .inc();

        result
    });

    try_join_all(calls).await
}
