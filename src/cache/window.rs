//! Page Window Module
//!
//! Ordered window of loaded pages. Pages only join at an edge in key order;
//! a page that completes early is staged until the gap before it fills.

use std::collections::BTreeMap;

use crate::cache::Edge;
use crate::paging::{Page, PageKey};

// == Page Window ==
/// Contiguous run of loaded pages in ascending key order.
#[derive(Debug)]
pub struct PageWindow<T> {
    /// Key the window starts from when empty
    start_key: PageKey,
    /// Loaded pages, ascending by key
    pages: Vec<Page<T>>,
    /// Pages that arrived before their predecessor
    staged: BTreeMap<PageKey, Page<T>>,
}

impl<T: Clone> PageWindow<T> {
    // == Constructor ==
    /// Creates an empty window whose first load will be `start_key`.
    pub fn new(start_key: PageKey) -> Self {
        Self {
            start_key,
            pages: Vec::new(),
            staged: BTreeMap::new(),
        }
    }

    pub fn start_key(&self) -> PageKey {
        self.start_key
    }

    // == Next Key ==
    /// Key to load next at `edge`, or `None` when that edge is exhausted or,
    /// for the front edge, nothing is loaded yet.
    pub fn next_key(&self, edge: Edge) -> Option<PageKey> {
        match edge {
            Edge::Back => match self.pages.last() {
                Some(page) => page.next_key,
                None => Some(self.start_key),
            },
            Edge::Front => self.pages.first().and_then(|page| page.prev_key),
        }
    }

    /// True once a loaded page reports no neighbour at `edge`.
    pub fn is_exhausted(&self, edge: Edge) -> bool {
        !self.pages.is_empty() && self.next_key(edge).is_none()
    }

    // == Insert ==
    /// Adds a completed page.
    ///
    /// Returns true when the page (and any staged pages it unblocked) joined
    /// the window, false when it was staged or was a duplicate.
    pub fn insert(&mut self, page: Page<T>) -> bool {
        if self.contains(page.key) || self.staged.contains_key(&page.key) {
            return false;
        }

        if self.next_key(Edge::Back) == Some(page.key) {
            self.pages.push(page);
        } else if self.next_key(Edge::Front) == Some(page.key) {
            self.pages.insert(0, page);
        } else {
            self.staged.insert(page.key, page);
            return false;
        }

        self.drain_staged();
        true
    }

    fn drain_staged(&mut self) {
        loop {
            if let Some(page) = self
                .next_key(Edge::Back)
                .and_then(|key| self.staged.remove(&key))
            {
                self.pages.push(page);
            } else if let Some(page) = self
                .next_key(Edge::Front)
                .and_then(|key| self.staged.remove(&key))
            {
                self.pages.insert(0, page);
            } else {
                break;
            }
        }
    }

    pub fn contains(&self, key: PageKey) -> bool {
        self.pages.iter().any(|page| page.key == key)
    }

    // == Accessors ==
    pub fn pages(&self) -> &[Page<T>] {
        &self.pages
    }

    /// All items of the window, concatenated in key order.
    pub fn items(&self) -> Vec<T> {
        self.pages
            .iter()
            .flat_map(|page| page.items.iter().cloned())
            .collect()
    }

    pub fn item_count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn staged_count(&self) -> usize {
        self.staged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
