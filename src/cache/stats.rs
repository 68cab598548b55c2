//! Paging Statistics Module
//!
//! Tracks page loads, failures, coalesced requests and discarded results.

use serde::Serialize;

// == Paging Stats ==
/// Counters shared by all sessions of one cache.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingStats {
    /// Provider fetches started
    pub fetches_started: u64,
    /// Pages that completed successfully
    pub pages_loaded: u64,
    /// Fetches that completed with an error
    pub load_failures: u64,
    /// Load requests served by an already in-flight load
    pub coalesced_requests: u64,
    /// Completions dropped because their source or ticket was superseded
    pub stale_results_dropped: u64,
    /// In-flight loads cancelled on detach, refresh or shutdown
    pub loads_cancelled: u64,
    /// Sessions created
    pub sessions_started: u64,
}

impl PagingStats {
    // == Constructor ==
    /// Creates a new PagingStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Failure Rate ==
    /// Returns load_failures / (pages_loaded + load_failures), or 0.0 before any completion.
    pub fn failure_rate(&self) -> f64 {
        let total = self.pages_loaded + self.load_failures;
        if total == 0 {
            0.0
        } else {
            self.load_failures as f64 / total as f64
        }
    }

    pub fn record_fetch(&mut self) {
        self.fetches_started += 1;
    }

    pub fn record_page(&mut self) {
        self.pages_loaded += 1;
    }

    pub fn record_failure(&mut self) {
        self.load_failures += 1;
    }

    pub fn record_coalesced(&mut self) {
        self.coalesced_requests += 1;
    }

    pub fn record_stale(&mut self) {
        self.stale_results_dropped += 1;
    }

    pub fn record_cancelled(&mut self, count: u64) {
        self.loads_cancelled += count;
    }

    pub fn record_session(&mut self) {
        self.sessions_started += 1;
    }
}
