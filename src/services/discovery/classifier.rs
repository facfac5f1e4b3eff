use crate::models::{FilterSpec, ResourceKind};

/// How a search request is served
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Nothing selects content: no keyword, no filter, default sort
    Reject,
    PersonSearch,
    FilteredDiscovery,
    KeywordSearch,
    /// Well-formed but unservable; answered with an empty page
    Empty,
}

impl QueryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryMode::Reject => "reject",
            QueryMode::PersonSearch => "person_search",
            QueryMode::FilteredDiscovery => "filtered_discovery",
            QueryMode::KeywordSearch => "keyword_search",
            QueryMode::Empty => "empty",
        }
    }
}

/// Decide the serving mode for a request
pub fn classify(spec: &FilterSpec) -> QueryMode {
    let has_keyword = spec.keyword.is_some();
    let has_filters = spec.has_filters();
    let explicit_sort = spec.has_explicit_sort();

    if !has_keyword && !has_filters && !explicit_sort {
        return QueryMode::Reject;
    }

    if spec.resource == ResourceKind::Person {
        // person lookup is keyword-only
        return if has_keyword {
            QueryMode::PersonSearch
        } else {
            QueryMode::Empty
        };
    }

    if has_filters || (explicit_sort && !has_keyword) {
        return QueryMode::FilteredDiscovery;
    }

    if has_keyword {
        return QueryMode::KeywordSearch;
    }

    QueryMode::Empty
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SortKey;

    fn spec(resource: ResourceKind, keyword: bool, filters: bool, sort: bool) -> FilterSpec {
        let mut spec = FilterSpec::new(resource, "US");
        if keyword {
            spec.keyword = Some("matrix".to_string());
        }
        if filters {
            spec.category_ids = vec![28];
        }
        if sort {
            spec.sort = SortKey::RatingDesc;
        }
        spec
    }

    #[test]
    fn test_only_empty_request_rejects() {
        for resource in [
            ResourceKind::Movie,
            ResourceKind::Series,
            ResourceKind::Person,
            ResourceKind::All,
        ] {
            for keyword in [false, true] {
                for filters in [false, true] {
                    for sort in [false, true] {
                        let mode = classify(&spec(resource, keyword, filters, sort));
                        let rejects = !keyword && !filters && !sort;
                        assert_eq!(
                            mode == QueryMode::Reject,
                            rejects,
                            "{:?} keyword={} filters={} sort={} -> {:?}",
                            resource,
                            keyword,
                            filters,
                            sort,
                            mode
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_catalog_modes() {
        let all = ResourceKind::All;
        assert_eq!(classify(&spec(all, true, false, false)), QueryMode::KeywordSearch);
        assert_eq!(classify(&spec(all, true, false, true)), QueryMode::KeywordSearch);
        assert_eq!(classify(&spec(all, true, true, false)), QueryMode::FilteredDiscovery);
        assert_eq!(classify(&spec(all, false, true, false)), QueryMode::FilteredDiscovery);
        assert_eq!(classify(&spec(all, false, false, true)), QueryMode::FilteredDiscovery);
    }

    #[test]
    fn test_person_modes() {
        let person = ResourceKind::Person;
        assert_eq!(classify(&spec(person, true, false, false)), QueryMode::PersonSearch);
        assert_eq!(classify(&spec(person, true, true, true)), QueryMode::PersonSearch);
        assert_eq!(classify(&spec(person, false, true, false)), QueryMode::Empty);
        assert_eq!(classify(&spec(person, false, false, true)), QueryMode::Empty);
        assert_eq!(classify(&spec(person, false, false, false)), QueryMode::Reject);
    }
}
