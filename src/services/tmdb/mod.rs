//! TMDB Integration
//!
//! The movie and series catalogs are served by TMDB. This module provides:
//!
//! - **API Client**: one GET per physical page against `/search/{movie,tv,person}`
//!   or `/discover/{movie,tv}`
//! - **Types**: wire types and their conversion into tagged catalog items
//!
//! Every page comes back with 20 items at most, plus `total_pages` and
//! `total_results` for the whole query.

pub mod client;
pub mod types;

pub use client::TmdbClient;
