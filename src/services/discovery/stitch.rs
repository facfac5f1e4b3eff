use crate::models::{CatalogItem, LogicalPageSize, PageEnvelope};
use crate::services::upstream::{
    CatalogSource, UpstreamError, UpstreamPageRequest, MAX_UPSTREAM_PAGE, UPSTREAM_PAGE_SIZE,
};

use super::assemble::{assemble, logical_total_pages};
use super::fetch_all;
use super::merge::{dedupe, merge_all, MergeStrategy};

/// Physical pages covering one logical page: `k(p-1)+1 ..= k(p-1)+k` with
/// `k = ceil(size / 20)`. Pages the upstream will not serve are left out.
pub fn physical_pages(logical_page: u32, size: LogicalPageSize) -> Vec<u32> {
    let per_logical = size.get().div_ceil(UPSTREAM_PAGE_SIZE) as u64;
    let first = per_logical * (u64::from(logical_page.max(1)) - 1) + 1;
    if first > u64::from(MAX_UPSTREAM_PAGE) {
        return Vec::new();
    }
    (first..first + per_logical)
        .filter(|p| *p <= u64::from(MAX_UPSTREAM_PAGE))
        .map(|p| p as u32)
        .collect()
}

/// Build one wide logical page from consecutive physical pages.
///
/// `bases` holds one request per targeted kind; its page number is
/// replaced. All physical pages of all kinds are fetched in one join.
/// Kinds are alternated (first kind leads), then deduplicated and
/// truncated. Totals come from each kind's first physical page.
pub async fn stitch_page(
    source: &dyn CatalogSource,
    logical_page: u32,
    bases: &[UpstreamPageRequest],
) -> Result<PageEnvelope<CatalogItem>, UpstreamError> {
    let size = LogicalPageSize::Wide;
    let pages = physical_pages(logical_page, size);
    if pages.is_empty() {
        return Ok(PageEnvelope::empty(logical_page));
    }

    let requests: Vec<UpstreamPageRequest> = bases
        .iter()
        .flat_map(|base| pages.iter().map(move |p| base.with_page(*p)))
        .collect();

    let fetched = fetch_all(source, &requests).await?;

    let mut total_results = 0;
    let mut per_kind = Vec::with_capacity(bases.len());
    for kind_pages in fetched.chunks(pages.len()) {
        total_results += kind_pages.first().map(|p| p.total_results).unwrap_or(0);
        let items: Vec<CatalogItem> = kind_pages
            .iter()
            .flat_map(|p| p.results.iter().cloned())
            .collect();
        per_kind.push(items);
    }

    let mut results = dedupe(merge_all(per_kind, MergeStrategy::Alternate));
    results.truncate(size.get());

    Ok(assemble(
        logical_page,
        results,
        logical_total_pages(total_results, size.get()),
        total_results,
    ))
}
