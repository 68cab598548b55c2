//! Paged Source Module
//!
//! Fetches exactly one page per call from a remote provider and computes the
//! keys of the neighbouring pages.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::paging::{LoadParams, LoadResult, Page, PageKey, PagingState, QueryParams, SortBy};

static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

// == Page Provider ==
/// Remote provider of numbered pages.
///
/// Implementations own the wire format. An empty result marks the end of the stream.
#[async_trait]
pub trait PageProvider: Send + Sync {
    type Item: Clone + Send + Sync + 'static;

    async fn fetch(
        &self,
        query: &str,
        sort_by: SortBy,
        page: PageKey,
        page_size: usize,
    ) -> Result<Vec<Self::Item>, FetchError>;
}

/// Shared handle to a provider of `T` items.
pub type SharedProvider<T> = Arc<dyn PageProvider<Item = T>>;

// == Paged Source ==
/// A page loader bound to one immutable set of query parameters.
///
/// Sources are never re-bound: new parameters or an invalidation mean a new
/// source with a new id.
pub struct PagedSource<T> {
    id: u64,
    provider: SharedProvider<T>,
    params: QueryParams,
}

impl<T: Clone + Send + Sync + 'static> PagedSource<T> {
    pub fn new(provider: SharedProvider<T>, params: QueryParams) -> Self {
        Self {
            id: NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed),
            provider,
            params,
        }
    }

    /// Unique id used to tag in-flight loads.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    // == Load ==
    /// Loads one page. A missing key loads the initial page.
    ///
    /// Provider failures come back as `LoadResult::Failure`.
    pub async fn load(&self, params: LoadParams) -> LoadResult<T> {
        let key = params.key.unwrap_or(PageKey::INITIAL);

        match self
            .provider
            .fetch(&self.params.query, self.params.sort_by, key, params.page_size)
            .await
        {
            Ok(items) => {
                debug!(
                    source = self.id,
                    page = key.get(),
                    items = items.len(),
                    "Page loaded"
                );
                LoadResult::Page(Page::from_items(key, items))
            }
            Err(err) => {
                warn!(source = self.id, page = key.get(), error = %err, "Page load failed");
                LoadResult::Failure(err)
            }
        }
    }

    // == Refresh Key ==
    /// Picks the key to resume from after invalidation.
    ///
    /// Uses the page closest to the anchor: `prev_key + 1` when it has a previous
    /// page, else `next_key - 1`, else `None` (restart from the initial key).
    /// If the two disagree, `prev_key + 1` wins.
    pub fn refresh_key(&self, state: &PagingState<'_, T>) -> Option<PageKey> {
        let anchor = state.anchor_position?;
        let page = state.closest_page_to_position(anchor)?;

        page.prev_key
            .and_then(PageKey::next)
            .or_else(|| page.next_key.and_then(PageKey::prev))
    }
}
