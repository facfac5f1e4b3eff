use serde::Deserialize;
use thiserror::Error;

use super::catalog::MediaKind;

/// Raw query string of `GET /api/search`. Everything is kept as text so
/// that a malformed number produces a message naming the parameter.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
    pub year_from: Option<String>,
    pub year_to: Option<String>,
    pub min_rating: Option<String>,
    pub sort_by: Option<String>,
    pub runtime_min: Option<String>,
    pub runtime_max: Option<String>,
    pub with_origin_country: Option<String>,
    pub watch_provider: Option<String>,
    pub watch_region: Option<String>,
}

/// Invalid caller input, surfaced as 400
#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    #[error("invalid type '{0}', expected one of: movie, tv, person, all")]
    InvalidKind(String),
    #[error("invalid page '{0}', expected a positive integer")]
    InvalidPage(String),
    #[error("invalid genre '{0}', expected comma-separated integers")]
    InvalidGenre(String),
    #[error("invalid year '{0}', expected YYYY or YYYY-YYYY")]
    InvalidYear(String),
    #[error("invalid {param} '{value}', expected a number")]
    InvalidNumber { param: &'static str, value: String },
}

/// Resource kind selector of the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResourceKind {
    Movie,
    Series,
    Person,
    #[default]
    All,
}

impl ResourceKind {
    pub fn parse(raw: &str) -> Result<Self, ParamError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(Self::Movie),
            "tv" => Ok(Self::Series),
            "person" => Ok(Self::Person),
            "all" | "" => Ok(Self::All),
            _ => Err(ParamError::InvalidKind(raw.to_string())),
        }
    }

    /// Upstream resources queried for this selector, in merge order
    pub fn targets(&self) -> &'static [MediaKind] {
        match self {
            Self::Movie => &[MediaKind::Movie],
            Self::Series => &[MediaKind::Series],
            Self::Person => &[MediaKind::Person],
            Self::All => &[MediaKind::Movie, MediaKind::Series],
        }
    }
}

/// Requested ordering
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    PopularityDesc,
    RatingDesc,
    ReleaseDateDesc,
    /// Any other upstream sort key, forwarded verbatim
    Other(String),
}

impl SortKey {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" | "popularity.desc" => Self::PopularityDesc,
            "vote_average.desc" => Self::RatingDesc,
            "release_date.desc" | "primary_release_date.desc" | "first_air_date.desc" => {
                Self::ReleaseDateDesc
            }
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::PopularityDesc
    }

    /// Upstream `sort_by` value for a resource kind
    pub fn upstream_key(&self, kind: MediaKind) -> String {
        match self {
            Self::PopularityDesc => "popularity.desc".to_string(),
            Self::RatingDesc => "vote_average.desc".to_string(),
            Self::ReleaseDateDesc => match kind {
                MediaKind::Series => "first_air_date.desc".to_string(),
                _ => "primary_release_date.desc".to_string(),
            },
            Self::Other(raw) => raw.clone(),
        }
    }
}

/// Logical page size offered to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogicalPageSize {
    #[default]
    Standard,
    Wide,
}

impl LogicalPageSize {
    /// Anything other than 42 normalizes to the standard size
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "42" => Self::Wide,
            _ => Self::Standard,
        }
    }

    pub fn get(&self) -> usize {
        match self {
            Self::Standard => 20,
            Self::Wide => 42,
        }
    }
}

/// Release year constraint. Exact and range are exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearFilter {
    Exact(i32),
    Range { from: Option<i32>, to: Option<i32> },
}

/// Normalized request
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    pub resource: ResourceKind,
    pub keyword: Option<String>,
    pub category_ids: Vec<i64>,
    pub year: Option<YearFilter>,
    pub min_rating: Option<f64>,
    pub runtime_min: Option<u32>,
    pub runtime_max: Option<u32>,
    pub origin_country: Option<String>,
    pub watch_provider: Option<i64>,
    pub watch_region: String,
    pub sort: SortKey,
    pub page: u32,
    pub page_size: LogicalPageSize,
}

impl FilterSpec {
    /// Request with no criteria for a resource kind
    pub fn new(resource: ResourceKind, watch_region: &str) -> Self {
        Self {
            resource,
            keyword: None,
            category_ids: Vec::new(),
            year: None,
            min_rating: None,
            runtime_min: None,
            runtime_max: None,
            origin_country: None,
            watch_provider: None,
            watch_region: watch_region.to_string(),
            sort: SortKey::default(),
            page: 1,
            page_size: LogicalPageSize::default(),
        }
    }

    /// Parse and validate raw query parameters
    pub fn from_params(params: &SearchParams, default_region: &str) -> Result<Self, ParamError> {
        let resource = match non_empty(&params.kind) {
            Some(raw) => ResourceKind::parse(raw)?,
            None => ResourceKind::All,
        };

        let mut spec = Self::new(resource, default_region);

        spec.keyword = non_empty(&params.query).map(|q| q.trim().to_string());

        if let Some(raw) = non_empty(&params.page) {
            spec.page = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| ParamError::InvalidPage(raw.to_string()))?;
        }

        if let Some(raw) = non_empty(&params.page_size) {
            spec.page_size = LogicalPageSize::parse(raw);
        }

        if let Some(raw) = non_empty(&params.genre) {
            spec.category_ids = parse_genres(raw)?;
        }

        spec.year = parse_year(
            non_empty(&params.year),
            non_empty(&params.year_from),
            non_empty(&params.year_to),
        )?;

        spec.min_rating = parse_number::<f64>(&params.min_rating, "minRating")?;
        if let Some(rating) = spec.min_rating.filter(|r| !r.is_finite()) {
            return Err(ParamError::InvalidNumber {
                param: "minRating",
                value: rating.to_string(),
            });
        }
        spec.runtime_min = parse_number(&params.runtime_min, "runtimeMin")?;
        spec.runtime_max = parse_number(&params.runtime_max, "runtimeMax")?;
        spec.watch_provider = parse_number(&params.watch_provider, "watchProvider")?;
        spec.origin_country = non_empty(&params.with_origin_country).map(|c| c.trim().to_string());

        if let Some(region) = non_empty(&params.watch_region) {
            spec.watch_region = region.trim().to_string();
        }

        if let Some(raw) = non_empty(&params.sort_by) {
            spec.sort = SortKey::parse(raw);
        }

        Ok(spec)
    }

    /// Whether any discovery filter is present. `watchRegion` only
    /// qualifies `watchProvider` and does not count on its own.
    pub fn has_filters(&self) -> bool {
        !self.category_ids.is_empty()
            || self.year.is_some()
            || self.min_rating.is_some()
            || self.runtime_min.is_some()
            || self.runtime_max.is_some()
            || self.origin_country.is_some()
            || self.watch_provider.is_some()
    }

    pub fn has_explicit_sort(&self) -> bool {
        !self.sort.is_default()
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn parse_number<T: std::str::FromStr>(
    value: &Option<String>,
    param: &'static str,
) -> Result<Option<T>, ParamError> {
    match non_empty(value) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ParamError::InvalidNumber {
                param,
                value: raw.to_string(),
            }),
        None => Ok(None),
    }
}

/// Comma-separated ids, order kept, repeats dropped
fn parse_genres(raw: &str) -> Result<Vec<i64>, ParamError> {
    let mut ids: Vec<i64> = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let id = part
            .parse::<i64>()
            .map_err(|_| ParamError::InvalidGenre(raw.to_string()))?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

fn parse_year_value(raw: &str, original: &str) -> Result<i32, ParamError> {
    raw.trim()
        .parse::<i32>()
        .ok()
        .filter(|y| (1800..=3000).contains(y))
        .ok_or_else(|| ParamError::InvalidYear(original.to_string()))
}

/// `year` is `YYYY` or `YYYY-YYYY`; `yearFrom`/`yearTo` give open bounds.
/// When both forms are present the range wins.
fn parse_year(
    year: Option<&str>,
    year_from: Option<&str>,
    year_to: Option<&str>,
) -> Result<Option<YearFilter>, ParamError> {
    let mut filter = match year {
        Some(raw) => match raw.trim().split_once('-') {
            Some((from, to)) => Some(YearFilter::Range {
                from: Some(parse_year_value(from, raw)?),
                to: Some(parse_year_value(to, raw)?),
            }),
            None => Some(YearFilter::Exact(parse_year_value(raw, raw)?)),
        },
        None => None,
    };

    if year_from.is_some() || year_to.is_some() {
        let from = year_from.map(|y| parse_year_value(y, y)).transpose()?;
        let to = year_to.map(|y| parse_year_value(y, y)).transpose()?;
        filter = Some(YearFilter::Range { from, to });
    }

    Ok(filter)
}
