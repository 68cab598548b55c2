//! Page Cache Module
//!
//! Hands out subscriptions to the session bound to the requested query.
//! A change of query shuts the previous session down.

use std::sync::{Arc, Mutex};

use tracing::{debug, info};

use crate::cache::{lock, PagingStats, Session, Subscription};
use crate::config::PagingConfig;
use crate::paging::{QueryParams, SharedProvider, SortBy};

// == Page Cache ==
/// Cache of loaded pages for the current query, shared by all observers.
pub struct PageCache<T> {
    /// Remote provider used by every session
    provider: SharedProvider<T>,
    /// Page size and detach grace period
    config: PagingConfig,
    /// Session for the current query, if any
    current: Mutex<Option<Arc<Session<T>>>>,
    /// Counters across all sessions
    stats: Arc<Mutex<PagingStats>>,
}

impl<T: Clone + Send + Sync + 'static> PageCache<T> {
    // == Constructor ==
    pub fn new(provider: SharedProvider<T>, config: PagingConfig) -> Self {
        Self {
            provider,
            config,
            current: Mutex::new(None),
            stats: Arc::new(Mutex::new(PagingStats::new())),
        }
    }

    // == Get Stream ==
    /// Subscribes to the session for `(query, sort_by)`.
    ///
    /// Reuses the current session when the parameters match and it has not
    /// expired; otherwise the current session is shut down and a fresh one
    /// starts at the initial page. Must be called within a tokio runtime.
    pub fn get_stream(&self, query: impl Into<String>, sort_by: SortBy) -> Subscription<T> {
        let params = QueryParams::new(query, sort_by);
        let mut current = lock(&self.current);

        if let Some(session) = current.as_ref() {
            if session.params() == &params && !session.is_expired(self.config.grace_period) {
                debug!(query = %params.query, sort_by = %params.sort_by, "Reusing paging session");
                return Subscription::attach(Arc::clone(session));
            }
        }

        if let Some(previous) = current.take() {
            info!(
                from = %previous.params().query,
                to = %params.query,
                "Query changed, discarding paging session"
            );
            previous.shutdown();
        }

        let session = Session::new(
            self.provider.clone(),
            params,
            self.config.page_size,
            Arc::clone(&self.stats),
        );
        *current = Some(Arc::clone(&session));
        Subscription::attach(session)
    }

    // == Evict Expired ==
    /// Tears down the current session if it has been detached past the grace period.
    ///
    /// Returns the number of sessions removed.
    pub fn evict_expired(&self) -> usize {
        let mut current = lock(&self.current);
        match current.as_ref() {
            Some(session) if session.is_expired(self.config.grace_period) => {
                session.shutdown();
                *current = None;
                1
            }
            _ => 0,
        }
    }

    // == Accessors ==
    /// Parameters of the current session.
    pub fn current_params(&self) -> Option<QueryParams> {
        lock(&self.current)
            .as_ref()
            .map(|session| session.params().clone())
    }

    pub fn has_session(&self) -> bool {
        lock(&self.current).is_some()
    }

    pub fn config(&self) -> &PagingConfig {
        &self.config
    }

    /// Returns current paging statistics.
    pub fn stats(&self) -> PagingStats {
        lock(&self.stats).clone()
    }
}
