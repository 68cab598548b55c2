//! News Pager - paged news search with a shared page cache
//!
//! Loads search results page by page in either direction, keeps loaded pages
//! for the active query, and serves them over a small HTTP API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod news;
pub mod paging;
pub mod tasks;

pub use api::{create_router, AppState};
pub use cache::{Edge, LoadState, PageCache, Snapshot, Subscription};
pub use config::{Config, PagingConfig};
pub use error::{ApiError, FetchError};
pub use news::{Article, NewsApiClient};
pub use paging::{PageKey, PageProvider, PagedSource, SortBy};
pub use tasks::spawn_session_reaper;
