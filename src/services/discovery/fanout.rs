use crate::models::{CatalogItem, FilterSpec, PageEnvelope, SortKey};
use crate::services::upstream::{CatalogSource, DiscoverFilters, UpstreamError, UpstreamPageRequest};

use super::assemble::{assemble, logical_total_pages};
use super::fetch_all;
use super::merge::{dedupe, sort_items};

/// OR across several categories.
///
/// The upstream ANDs multiple genre ids, so each (kind, category) pair is
/// discovered separately, first physical page only, and the union is
/// merged here. Deep pages of such a query are under-populated and
/// `total_results` counts the sampled union, not the true OR total.
pub async fn fan_out_page(
    source: &dyn CatalogSource,
    spec: &FilterSpec,
) -> Result<PageEnvelope<CatalogItem>, UpstreamError> {
    let requests: Vec<UpstreamPageRequest> = spec
        .resource
        .targets()
        .iter()
        .flat_map(|kind| {
            spec.category_ids.iter().map(move |category| {
                UpstreamPageRequest::discover(*kind, DiscoverFilters::from_spec(spec, Some(*category)), 1)
            })
        })
        .collect();

    let pages = fetch_all(source, &requests).await?;

    Ok(merge_categories(
        pages,
        &spec.sort,
        spec.page,
        spec.page_size.get(),
    ))
}

/// Union the sampled pages, sort, deduplicate and cut one logical page.
///
/// Sorting happens before deduplication so that when the same item comes
/// back from two categories, the best-ranked copy is the one kept.
pub fn merge_categories(
    pages: Vec<PageEnvelope<CatalogItem>>,
    sort: &SortKey,
    page: u32,
    page_size: usize,
) -> PageEnvelope<CatalogItem> {
    let mut union: Vec<CatalogItem> = pages.into_iter().flat_map(|p| p.results).collect();
    sort_items(&mut union, sort);
    let union = dedupe(union);

    let total_results = union.len() as u64;
    let start = (page.max(1) as usize - 1).saturating_mul(page_size);
    let results = union.into_iter().skip(start).take(page_size).collect();

    assemble(
        page,
        results,
        logical_total_pages(total_results, page_size),
        total_results,
    )
}
