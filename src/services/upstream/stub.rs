//! In-memory catalog for tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use super::{CatalogSource, UpstreamError, UpstreamErrorKind, UpstreamMode, UpstreamPageRequest};
use crate::models::{CatalogItem, MediaKind, MovieItem, PageEnvelope, PersonItem, SeriesItem};

type StubKey = (MediaKind, UpstreamMode, Option<i64>, u32);

/// Serves canned pages keyed by (kind, mode, category, page).
/// Unknown keys answer with an empty page.
#[derive(Default)]
pub struct StubCatalog {
    pages: HashMap<StubKey, PageEnvelope<CatalogItem>>,
    hanging: HashSet<StubKey>,
    failing: HashMap<StubKey, UpstreamErrorKind>,
    calls: Mutex<Vec<UpstreamPageRequest>>,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(
        mut self,
        kind: MediaKind,
        mode: UpstreamMode,
        category: Option<i64>,
        envelope: PageEnvelope<CatalogItem>,
    ) -> Self {
        self.pages
            .insert((kind, mode, category, envelope.page), envelope);
        self
    }

    /// Calls for this key never resolve
    pub fn hanging(
        mut self,
        kind: MediaKind,
        mode: UpstreamMode,
        category: Option<i64>,
        page: u32,
    ) -> Self {
        self.hanging.insert((kind, mode, category, page));
        self
    }

    pub fn failing(
        mut self,
        kind: MediaKind,
        mode: UpstreamMode,
        category: Option<i64>,
        page: u32,
        error: UpstreamErrorKind,
    ) -> Self {
        self.failing.insert((kind, mode, category, page), error);
        self
    }

    pub fn calls(&self) -> Vec<UpstreamPageRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogSource for StubCatalog {
    async fn fetch(
        &self,
        request: &UpstreamPageRequest,
    ) -> Result<PageEnvelope<CatalogItem>, UpstreamError> {
        self.calls.lock().unwrap().push(request.clone());
        let key = (
            request.kind,
            request.mode,
            request.filters.category_id,
            request.page,
        );

        if self.hanging.contains(&key) {
            futures::future::pending::<()>().await;
        }
        if let Some(kind) = self.failing.get(&key) {
            return Err(UpstreamError {
                kind: *kind,
                message: "stubbed failure".to_string(),
            });
        }

        Ok(self
            .pages
            .get(&key)
            .cloned()
            .unwrap_or_else(|| PageEnvelope::empty(request.page)))
    }
}

pub fn movie(id: i64, popularity: f64) -> CatalogItem {
    CatalogItem::Movie(MovieItem {
        id,
        title: format!("Movie {}", id),
        release_date: None,
        poster_path: None,
        backdrop_path: None,
        popularity,
        vote_average: 0.0,
        original_language: None,
        overview: None,
        genre_ids: Vec::new(),
    })
}

pub fn series(id: i64, popularity: f64) -> CatalogItem {
    CatalogItem::Series(SeriesItem {
        id,
        name: format!("Series {}", id),
        first_air_date: None,
        poster_path: None,
        backdrop_path: None,
        popularity,
        vote_average: 0.0,
        original_language: None,
        overview: None,
        genre_ids: Vec::new(),
    })
}

pub fn person(id: i64) -> CatalogItem {
    CatalogItem::Person(PersonItem {
        id,
        name: format!("Person {}", id),
        profile_path: None,
        popularity: 1.0,
        known_for_department: Some("Acting".to_string()),
    })
}

pub fn item(kind: MediaKind, id: i64, popularity: f64) -> CatalogItem {
    match kind {
        MediaKind::Movie => movie(id, popularity),
        MediaKind::Series => series(id, popularity),
        MediaKind::Person => person(id),
    }
}

/// Page holding the given items
pub fn envelope(
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

/// Full 20-item page whose ids are `page * 100 + 0..20`
pub fn full_page(kind: MediaKind, page: u32, total_results: u64) -> PageEnvelope<CatalogItem> {
    let base = i64::from(page) * 100;
    let results = (0..20).map(|i| item(kind, base + i, 100.0 - i as f64)).collect();
    let total_pages = total_results.div_ceil(20) as u32;
    envelope(page, results, total_pages, total_results)
}
