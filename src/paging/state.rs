//! Paging State Module
//!
//! Read-only view of the loaded pages used to pick a refresh key after
//! invalidation.

use crate::paging::Page;

// == Paging State ==
/// Loaded pages in ascending key order plus the last position the consumer viewed.
#[derive(Debug)]
pub struct PagingState<'a, T> {
    /// Pages in ascending key order
    pub pages: &'a [Page<T>],
    /// Index into the concatenated items, if the consumer reported one
    pub anchor_position: Option<usize>,
}

impl<'a, T> PagingState<'a, T> {
    pub fn new(pages: &'a [Page<T>], anchor_position: Option<usize>) -> Self {
        Self {
            pages,
            anchor_position,
        }
    }

    // == Closest Page ==
    /// Returns the page whose item range is closest to `position`.
    ///
    /// A position inside a page's range has distance 0. On equal distance the
    /// earlier page wins, so the page at or before the position is preferred.
    /// Empty pages occupy the gap at their offset.
    pub fn closest_page_to_position(&self, position: usize) -> Option<&'a Page<T>> {
        let mut offset = 0usize;
        let mut best: Option<(usize, &'a Page<T>)> = None;

        for page in self.pages {
            let start = offset;
            let end = offset + page.len();
            offset = end;

            let distance = if position < start {
                start - position
            } else if position >= end {
                position - end + 1
            } else {
                0
            };

            match best {
                Some((best_distance, _)) if best_distance <= distance => {}
                _ => best = Some((distance, page)),
            }
        }

        best.map(|(_, page)| page)
    }

    /// Total number of items across all loaded pages.
    pub fn item_count(&self) -> usize {
        self.pages.iter().map(Page::len).sum()
    }
}
