pub mod catalog;
pub mod search;

pub use catalog::{CatalogItem, MediaKind, MovieItem, PageEnvelope, PersonItem, SeriesItem};
pub use search::{
    FilterSpec, LogicalPageSize, ParamError, ResourceKind, SearchParams, SortKey, YearFilter,
};
