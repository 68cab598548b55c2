//! Session Reaper Task
//!
//! Background task that tears down a paging session once it has been detached
//! for longer than its grace period.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::PageCache;

/// Spawns a background task that periodically evicts expired sessions.
///
/// # Arguments
/// * `cache` - Shared page cache to sweep
/// * `interval` - Time between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_session_reaper<T>(cache: Arc<PageCache<T>>, interval: Duration) -> JoinHandle<()>
where
    T: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!("Starting session reaper with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.evict_expired();
            if removed > 0 {
                info!("Session reaper: removed {} detached session(s)", removed);
            } else {
                debug!("Session reaper: nothing to remove");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Edge;
    use crate::config::PagingConfig;
    use crate::paging::testing::ScriptedProvider;
    use crate::paging::SortBy;

    fn cache(grace: Duration) -> Arc<PageCache<String>> {
        Arc::new(PageCache::new(
            Arc::new(ScriptedProvider::new()),
            PagingConfig {
                page_size: 3,
                grace_period: grace,
            },
        ))
    }

    #[tokio::test]
    async fn test_reaper_removes_detached_session() {
        let cache = cache(Duration::from_millis(50));

        let feed = cache.get_stream("android", SortBy::PublishedAt);
        feed.load(Edge::Back).await;
        drop(feed);

        let handle = spawn_session_reaper(cache.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert!(!cache.has_session(), "Detached session should have been reaped");
        handle.abort();
    }

    #[tokio::test]
    async fn test_reaper_keeps_observed_session() {
        let cache = cache(Duration::ZERO);

        let feed = cache.get_stream("android", SortBy::PublishedAt);
        feed.load(Edge::Back).await;

        let handle = spawn_session_reaper(cache.clone(), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(cache.has_session(), "Observed session should not be removed");
        assert_eq!(feed.snapshot().items.len(), 3);
        handle.abort();
    }

    #[tokio::test]
    async fn test_reaper_can_be_aborted() {
        let handle = spawn_session_reaper(cache(Duration::ZERO), Duration::from_secs(1));

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
