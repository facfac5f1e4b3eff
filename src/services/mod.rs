pub mod discovery;
pub mod metrics;
pub mod tmdb;
pub mod upstream;
