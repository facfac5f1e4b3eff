use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::{CatalogItem, SortKey};

/// How two per-kind sequences are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// All of `a`, then all of `b`
    Concat,
    /// Round-robin starting with `a`, then whatever remains
    Alternate,
}

pub fn merge(a: Vec<CatalogItem>, b: Vec<CatalogItem>, strategy: MergeStrategy) -> Vec<CatalogItem> {
    match strategy {
        MergeStrategy::Concat => {
            let mut merged = a;
            merged.extend(b);
            merged
        }
        MergeStrategy::Alternate => {
            let mut merged = Vec::with_capacity(a.len() + b.len());
            let mut a = a.into_iter();
            let mut b = b.into_iter();
            loop {
                match (a.next(), b.next()) {
                    (None, None) => break,
                    (left, right) => {
                        merged.extend(left);
                        merged.extend(right);
                    }
                }
            }
            merged
        }
    }
}

/// Merge any number of per-kind sequences, pairwise in order
pub fn merge_all(sequences: Vec<Vec<CatalogItem>>, strategy: MergeStrategy) -> Vec<CatalogItem> {
    sequences
        .into_iter()
        .reduce(|acc, next| merge(acc, next, strategy))
        .unwrap_or_default()
}

/// Drop repeated `(kind, id)` pairs, keeping the first occurrence in place
pub fn dedupe(items: Vec<CatalogItem>) -> Vec<CatalogItem> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.identity()))
        .collect()
}

/// Stable sort by the requested key. `Other` keys keep upstream order.
pub fn sort_items(items: &mut [CatalogItem], sort: &SortKey) {
    match sort {
        SortKey::PopularityDesc => {
            items.sort_by(|a, b| b.popularity().total_cmp(&a.popularity()));
        }
        SortKey::RatingDesc => {
            items.sort_by(|a, b| b.vote_average().total_cmp(&a.vote_average()));
        }
        SortKey::ReleaseDateDesc => items.sort_by(compare_release_desc),
        SortKey::Other(_) => {}
    }
}

/// ISO-8601 dates compare correctly as strings; undated items go last
fn compare_release_desc(a: &CatalogItem, b: &CatalogItem) -> Ordering {
    match (a.release_date(), b.release_date()) {
        (Some(x), Some(y)) => y.cmp(x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
