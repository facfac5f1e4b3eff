//! TMDB API Types
//!
//! Wire types for the TMDB v3 search and discover responses, and their
//! conversion into tagged catalog items.

use serde::Deserialize;

use crate::models::{CatalogItem, MediaKind, MovieItem, PageEnvelope, PersonItem, SeriesItem};

/// Paginated response shared by every search/discover endpoint
#[derive(Debug, Deserialize)]
pub struct TmdbPage<T> {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

fn first_page() -> u32 {
    1
}

impl<T> TmdbPage<T> {
    pub fn into_envelope(self, convert: impl Fn(T) -> CatalogItem) -> PageEnvelope<CatalogItem> {
        PageEnvelope {
            page: self.page,
            results: self.results.into_iter().map(convert).collect(),
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }
}

/// `/search/movie` and `/discover/movie` result
#[derive(Debug, Deserialize)]
pub struct TmdbMovie {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

impl From<TmdbMovie> for CatalogItem {
    fn from(m: TmdbMovie) -> Self {
        CatalogItem::Movie(MovieItem {
            id: m.id,
            title: m.title,
            release_date: m.release_date,
            poster_path: m.poster_path,
            backdrop_path: m.backdrop_path,
            popularity: m.popularity,
            vote_average: m.vote_average,
            original_language: m.original_language,
            overview: m.overview,
            genre_ids: m.genre_ids,
        })
    }
}

/// `/search/tv` and `/discover/tv` result
#[derive(Debug, Deserialize)]
pub struct TmdbTv {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
}

impl From<TmdbTv> for CatalogItem {
    fn from(t: TmdbTv) -> Self {
        CatalogItem::Series(SeriesItem {
            id: t.id,
            name: t.name,
            first_air_date: t.first_air_date,
            poster_path: t.poster_path,
            backdrop_path: t.backdrop_path,
            popularity: t.popularity,
            vote_average: t.vote_average,
            original_language: t.original_language,
            overview: t.overview,
            genre_ids: t.genre_ids,
        })
    }
}

/// `/search/person` result
#[derive(Debug, Deserialize)]
pub struct TmdbPerson {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub known_for_department: Option<String>,
}

impl From<TmdbPerson> for CatalogItem {
    fn from(p: TmdbPerson) -> Self {
        CatalogItem::Person(PersonItem {
            id: p.id,
            name: p.name,
            profile_path: p.profile_path,
            popularity: p.popularity,
            known_for_department: p.known_for_department,
        })
    }
}

/// Decode a page body for a resource kind, tagging every item with it
pub fn parse_page(kind: MediaKind, body: &str) -> Result<PageEnvelope<CatalogItem>, serde_json::Error> {
    Ok(match kind {
        MediaKind::Movie => serde_json::from_str::<TmdbPage<TmdbMovie>>(body)?.into_envelope(CatalogItem::from),
        MediaKind::Series => serde_json::from_str::<TmdbPage<TmdbTv>>(body)?.into_envelope(CatalogItem::from),
        MediaKind::Person => {
            serde_json::from_str::<TmdbPage<TmdbPerson>>(body)?.into_envelope(CatalogItem::from)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_movie_page() {
        let body = r#"{
            "page": 2,
            "results": [{
                "id": 603,
                "title": "The Matrix",
                "release_date": "1999-03-30",
                "poster_path": "/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg",
                "backdrop_path": null,
                "popularity": 84.2,
                "vote_average": 8.2,
                "original_language": "en",
                "genre_ids": [28, 878],
                "adult": false
            }],
            "total_pages": 12,
            "total_results": 231
        }"#;

        let page = parse_page(MediaKind::Movie, body).unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 12);
        assert_eq!(page.total_results, 231);
        assert_eq!(page.results.len(), 1);

        let item = &page.results[0];
        assert_eq!(item.identity(), (MediaKind::Movie, 603));
        assert_eq!(item.release_date(), Some("1999-03-30"));
        match item {
            CatalogItem::Movie(m) => {
                assert_eq!(m.title, "The Matrix");
                assert_eq!(m.backdrop_path, None);
                assert_eq!(m.genre_ids, vec![28, 878]);
            }
            other => panic!("expected movie, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_tv_page_tags_series() {
        let body = r#"{"page":1,"results":[{"id":1396,"name":"Breaking Bad","first_air_date":"2008-01-20","popularity":300.5,"vote_average":8.9}],"total_pages":1,"total_results":1}"#;
        let page = parse_page(MediaKind::Series, body).unwrap();
        assert_eq!(page.results[0].kind(), MediaKind::Series);
        assert_eq!(page.results[0].release_date(), Some("2008-01-20"));
    }

    #[test]
    fn test_parse_person_page() {
        let body = r#"{"page":1,"results":[{"id":6384,"name":"Keanu Reeves","known_for_department":"Acting","popularity":55.1}],"total_pages":1,"total_results":1}"#;
        let page = parse_page(MediaKind::Person, body).unwrap();
        assert_eq!(page.results[0].identity(), (MediaKind::Person, 6384));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let body = r#"{"results":[{"id":1}]}"#;
        let page = parse_page(MediaKind::Movie, body).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_results, 0);
        assert_eq!(page.results[0].popularity(), 0.0);
    }

    #[test]
    fn test_malformed_payload_is_error() {
        assert!(parse_page(MediaKind::Movie, r#"{"results":[{"title":"no id"}]}"#).is_err());
        assert!(parse_page(MediaKind::Series, "<html>").is_err());
    }
}
