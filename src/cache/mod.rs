//! Cache Module
//!
//! Session-scoped, in-memory cache of loaded pages with per-edge load
//! admission and snapshot publishing.

mod session;
mod snapshot;
mod stats;
mod store;
mod window;


use std::sync::{Mutex, MutexGuard, PoisonError};

// Re-export public types
pub use session::{PendingLoad, Session, Subscription};
pub use snapshot::{Edge, LoadState, Snapshot};
pub use stats::PagingStats;
pub use store::PageCache;
pub use window::PageWindow;

/// Locks a mutex, recovering the data if a holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
