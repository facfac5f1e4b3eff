//! Prometheus counters, exposed by `GET /metrics`

use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static! {
    /// Search requests by serving mode
    pub static ref SEARCHES: IntCounterVec = register_int_counter_vec!(
        "discovery_searches_total",
        "Search requests by serving mode",
        &["mode"]
    )
    .unwrap();

    /// Upstream page calls by resource kind and outcome
    pub static ref UPSTREAM_CALLS: IntCounterVec = register_int_counter_vec!(
        "discovery_upstream_calls_total",
        "Upstream page calls by resource kind and outcome",
        &["kind", "outcome"]
    )
    .unwrap();

    /// Searches answered with the empty fallback page
    pub static ref DEGRADED: IntCounterVec = register_int_counter_vec!(
        "discovery_degraded_total",
        "Searches answered with the degraded empty page",
        &["reason"]
    )
    .unwrap();
}
