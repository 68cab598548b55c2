//! Paging Module
//!
//! The page-key contract: keys, query parameters, load results and the source
//! that turns a page-numbered provider into adjacency-aware pages.

mod key;
mod load;
mod query;
mod source;
mod state;

#[cfg(test)]
pub(crate) mod testing;

// Re-export public types
pub use key::PageKey;
pub use load::{LoadParams, LoadResult, Page};
pub use query::{QueryParams, SortBy};
pub use source::{PageProvider, PagedSource, SharedProvider};
pub use state::PagingState;

// == Public Constants ==
/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: usize = 20;
