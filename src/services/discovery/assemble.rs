use crate::models::{CatalogItem, PageEnvelope};
use crate::services::upstream::{MAX_UPSTREAM_PAGE, UPSTREAM_PAGE_SIZE};

/// Where a response came from, which decides how long clients may cache it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Upstream answered with at least one item
    Fresh,
    /// Nothing matched, or the request could not be served
    Empty,
    /// Upstream failed or the deadline expired
    Degraded,
}

/// Final result of a search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub envelope: PageEnvelope<CatalogItem>,
    pub freshness: Freshness,
}

impl SearchOutcome {
    pub fn from_envelope(envelope: PageEnvelope<CatalogItem>) -> Self {
        let freshness = if envelope.results.is_empty() {
            Freshness::Empty
        } else {
            Freshness::Fresh
        };
        Self {
            envelope,
            freshness,
        }
    }

    pub fn empty(page: u32) -> Self {
        Self {
            envelope: PageEnvelope::empty(page),
            freshness: Freshness::Empty,
        }
    }

    pub fn degraded(page: u32) -> Self {
        Self {
            envelope: PageEnvelope::empty(page),
            freshness: Freshness::Degraded,
        }
    }
}

/// Cache-Control max-ages for the two outcome classes
#[derive(Debug, Clone, Copy)]
pub struct CacheHints {
    pub fresh_max_age: u64,
    pub fallback_max_age: u64,
}

impl CacheHints {
    pub fn header_value(&self, freshness: Freshness) -> String {
        let max_age = match freshness {
            Freshness::Fresh => self.fresh_max_age,
            Freshness::Empty | Freshness::Degraded => self.fallback_max_age,
        };
        format!("public, max-age={}", max_age)
    }
}

/// Logical page count for a result total. The total is first capped to
/// what the upstream can actually serve.
pub fn logical_total_pages(total_results: u64, page_size: usize) -> u32 {
    let reachable = total_results.min(u64::from(MAX_UPSTREAM_PAGE) * UPSTREAM_PAGE_SIZE as u64);
    reachable.div_ceil(page_size as u64) as u32
}

/// Totals of a plain (unstitched) page built from one upstream page per kind
pub fn plain_totals(pages: &[PageEnvelope<CatalogItem>]) -> (u32, u64) {
    let total_pages = pages
        .iter()
        .map(|p| p.total_pages)
        .max()
        .unwrap_or(0)
        .min(MAX_UPSTREAM_PAGE);
    let total_results = pages.iter().map(|p| p.total_results).sum();
    (total_pages, total_results)
}

/// Caller-facing envelope; `page` is always the logical page
pub fn assemble(
    page: u32,
    results: Vec<CatalogItem>,
    total_pages: u32,
    total_results: u64,
) -> PageEnvelope<CatalogItem> {
    PageEnvelope {
        page,
        results,
        total_pages,
        total_results,
    }
}
