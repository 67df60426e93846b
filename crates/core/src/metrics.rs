//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Store queries issued by the browse engine
//! - Stale responses dropped by last-request-wins sequencing
//! - Document decoding, submissions and contract binding

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts};

// =============================================================================
// Browse Metrics
// =============================================================================

/// Store queries by collection and result.
pub static STORE_QUERIES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("magnetdex_store_queries_total", "Total document store queries"),
        &["collection", "result"], // "ok", "error", "stale"
    )
    .unwrap()
});

/// Responses that arrived after a newer request on the same tab.
pub static STALE_RESPONSES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "magnetdex_stale_responses_total",
        "Query responses discarded because a newer request superseded them",
    )
    .unwrap()
});

/// Documents that failed to decode into a record.
pub static DOCUMENTS_SKIPPED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "magnetdex_documents_skipped_total",
            "Documents skipped because they did not match their collection shape",
        ),
        &["collection"],
    )
    .unwrap()
});

// =============================================================================
// Write Path Metrics
// =============================================================================

/// Torrent submissions by collection and result.
pub static SUBMISSIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("magnetdex_submissions_total", "Total torrent submissions"),
        &["collection", "result"], // "created", "invalid", "error"
    )
    .unwrap()
});

/// Locally derived contract ids that disagreed with the store.
pub static CONTRACT_ID_MISMATCHES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "magnetdex_contract_id_mismatches_total",
        "Derived contract ids that differed from the store-assigned id",
    )
    .unwrap()
});

/// All core metrics, for registration with a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(STORE_QUERIES.clone()),
        Box::new(STALE_RESPONSES.clone()),
        Box::new(DOCUMENTS_SKIPPED.clone()),
        Box::new(SUBMISSIONS.clone()),
        Box::new(CONTRACT_ID_MISMATCHES.clone()),
    ]
}
