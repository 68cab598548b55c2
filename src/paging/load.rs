//! Load Contract Module
//!
//! Request and result types exchanged between a session and its source.

use crate::error::FetchError;
use crate::paging::PageKey;

// == Load Params ==
/// Parameters for a single page load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadParams {
    /// Page to load; `None` means the initial page
    pub key: Option<PageKey>,
    /// Number of items requested from the provider
    pub page_size: usize,
}

// == Page ==
/// One fetched page together with the keys of its neighbours.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Key this page was loaded with
    pub key: PageKey,
    /// Items in provider order
    pub items: Vec<T>,
    /// `None` iff this is the first page
    pub prev_key: Option<PageKey>,
    /// `None` iff the provider returned no items
    pub next_key: Option<PageKey>,
}

impl<T> Page<T> {
    /// Builds a page from fetched items, deriving the adjacency keys.
    pub fn from_items(key: PageKey, items: Vec<T>) -> Self {
        let prev_key = key.prev();
        let next_key = if items.is_empty() { None } else { key.next() };
        Self {
            key,
            items,
            prev_key,
            next_key,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// == Load Result ==
/// Outcome of a load. Failures are values, never panics.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadResult<T> {
    Page(Page<T>),
    Failure(FetchError),
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_has_no_prev_key() {
        let page = Page::from_items(PageKey::INITIAL, vec![1, 2, 3]);
        assert_eq!(page.prev_key, None);
        assert_eq!(page.next_key, PageKey::new(2));
    }

    #[test]
    fn test_empty_page_ends_stream() {
        let page: Page<u8> = Page::from_items(PageKey::new(5).unwrap(), Vec::new());
        assert_eq!(page.prev_key, PageKey::new(4));
        assert_eq!(page.next_key, None);
        assert!(page.is_empty());
    }
}
