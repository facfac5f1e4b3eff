use serde::{Deserialize, Serialize};

/// Resource kind of a catalog item, set when the upstream page is ingested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    #[serde(rename = "movie")]
    Movie,
    #[serde(rename = "tv")]
    Series,
    #[serde(rename = "person")]
    Person,
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Movie => write!(f, "movie"),
            MediaKind::Series => write!(f, "tv"),
            MediaKind::Person => write!(f, "person"),
        }
    }
}

/// Movie entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieItem {
    pub id: i64,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    pub popularity: f64,
    pub vote_average: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    pub genre_ids: Vec<i64>,
}

/// Series entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesItem {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    pub popularity: f64,
    pub vote_average: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    pub genre_ids: Vec<i64>,
}

/// Person entry (only produced by person lookups)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonItem {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_path: Option<String>,
    pub popularity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub known_for_department: Option<String>,
}

/// A single result row. The `mediaType` tag is written on every item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mediaType")]
pub enum CatalogItem {
    #[serde(rename = "movie")]
    Movie(MovieItem),
    #[serde(rename = "tv")]
    Series(SeriesItem),
    #[serde(rename = "person")]
    Person(PersonItem),
}

impl CatalogItem {
    pub fn kind(&self) -> MediaKind {
        match self {
            CatalogItem::Movie(_) => MediaKind::Movie,
            CatalogItem::Series(_) => MediaKind::Series,
            CatalogItem::Person(_) => MediaKind::Person,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            CatalogItem::Movie(m) => m.id,
            CatalogItem::Series(s) => s.id,
            CatalogItem::Person(p) => p.id,
        }
    }

    /// Identity used for deduplication: ids are only unique within a kind
    pub fn identity(&self) -> (MediaKind, i64) {
        (self.kind(), self.id())
    }

    pub fn popularity(&self) -> f64 {
        match self {
            CatalogItem::Movie(m) => m.popularity,
            CatalogItem::Series(s) => s.popularity,
            CatalogItem::Person(p) => p.popularity,
        }
    }

    pub fn vote_average(&self) -> f64 {
        match self {
            CatalogItem::Movie(m) => m.vote_average,
            CatalogItem::Series(s) => s.vote_average,
            CatalogItem::Person(_) => 0.0,
        }
    }

    /// Release date for movies, first air date for series (ISO-8601 string).
    /// Empty strings are treated as missing.
    pub fn release_date(&self) -> Option<&str> {
        let date = match self {
            CatalogItem::Movie(m) => m.release_date.as_deref(),
            CatalogItem::Series(s) => s.first_air_date.as_deref(),
            CatalogItem::Person(_) => None,
        };
        date.filter(|d| !d.is_empty())
    }
}

/// Paginated result envelope, used both for upstream pages and for the
/// caller-facing logical page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageEnvelope<T> {
    pub page: u32,
    pub results: Vec<T>,
    pub total_pages: u32,
    pub total_results: u64,
}

impl<T> PageEnvelope<T> {
    /// Canonical empty envelope for a requested page
    pub fn empty(page: u32) -> Self {
        Self {
            page,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i64) -> CatalogItem {
        CatalogItem::Movie(MovieItem {
            id,
            title: format!("Movie {}", id),
            release_date: Some(String::new()),
            poster_path: None,
            backdrop_path: None,
            popularity: 1.0,
            vote_average: 7.5,
            original_language: Some("en".to_string()),
            overview: None,
            genre_ids: vec![28],
        })
    }

    #[test]
    fn test_identity_includes_kind() {
        let series = CatalogItem::Series(SeriesItem {
            id: 7,
            name: "Show".to_string(),
            first_air_date: Some("2020-01-01".to_string()),
            poster_path: None,
            backdrop_path: None,
            popularity: 1.0,
            vote_average: 8.0,
            original_language: None,
            overview: None,
            genre_ids: vec![],
        });
        assert_ne!(movie(7).identity(), series.identity());
        assert_eq!(series.release_date(), Some("2020-01-01"));
    }

    #[test]
    fn test_empty_release_date_is_missing() {
        assert_eq!(movie(1).release_date(), None);
    }

    #[test]
    fn test_item_serializes_with_media_type_tag() {
        let json = serde_json::to_value(movie(42)).unwrap();
        assert_eq!(json["mediaType"], "movie");
        assert_eq!(json["id"], 42);
        assert_eq!(json["voteAverage"], 7.5);
        assert_eq!(json["genreIds"][0], 28);
        assert!(json.get("posterPath").is_none());
    }

    #[test]
    fn test_empty_envelope_shape() {
        let envelope: PageEnvelope<CatalogItem> = PageEnvelope::empty(3);
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["page"], 3);
        assert_eq!(json["total_pages"], 0);
        assert_eq!(json["total_results"], 0);
        assert!(json["results"].as_array().unwrap().is_empty());
    }
}
