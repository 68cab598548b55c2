//! Paging Session Module
//!
//! A session owns the page window for one `QueryParams`, runs at most one load
//! per edge and publishes a `Snapshot` after every change. Observers hold a
//! `Subscription`; the session detaches when the last one is dropped.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use futures::future::{self, BoxFuture, FutureExt, Shared};
use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tracing::{debug, info};

use crate::cache::{lock, Edge, LoadState, PageWindow, PagingStats, Snapshot};
use crate::error::FetchError;
use crate::paging::{
    LoadParams, LoadResult, PageKey, PagedSource, PagingState, QueryParams, SharedProvider,
};

/// Result of a load request. Every request coalesced onto the same load
/// resolves to the same state.
pub type PendingLoad = Shared<BoxFuture<'static, LoadState>>;

fn ready(state: LoadState) -> PendingLoad {
    future::ready(state).boxed().shared()
}

// == In-Flight Load ==
struct InFlight {
    /// Identifies which request currently owns the edge
    ticket: u64,
    key: PageKey,
    pending: PendingLoad,
    abort: AbortHandle,
}

#[derive(Default)]
struct EdgeSlot {
    state: LoadState,
    in_flight: Option<InFlight>,
}

struct SessionInner<T> {
    source: Arc<PagedSource<T>>,
    window: PageWindow<T>,
    front: EdgeSlot,
    back: EdgeSlot,
    anchor_position: Option<usize>,
    observers: usize,
    detached_at: Option<Instant>,
    closed: bool,
    next_ticket: u64,
}

impl<T> SessionInner<T> {
    fn slot(&self, edge: Edge) -> &EdgeSlot {
        match edge {
            Edge::Front => &self.front,
            Edge::Back => &self.back,
        }
    }

    fn slot_mut(&mut self, edge: Edge) -> &mut EdgeSlot {
        match edge {
            Edge::Front => &mut self.front,
            Edge::Back => &mut self.back,
        }
    }
}

// == Session ==
/// Cache of loaded pages for one `(query, sortBy)` pair, shared by its observers.
pub struct Session<T> {
    params: QueryParams,
    page_size: usize,
    provider: SharedProvider<T>,
    stats: Arc<Mutex<PagingStats>>,
    inner: Mutex<SessionInner<T>>,
    snapshots: watch::Sender<Snapshot<T>>,
}

impl<T: Clone + Send + Sync + 'static> Session<T> {
    // == Constructor ==
    /// Creates an idle session. Nothing is fetched until the first observer attaches.
    pub(crate) fn new(
        provider: SharedProvider<T>,
        params: QueryParams,
        page_size: usize,
        stats: Arc<Mutex<PagingStats>>,
    ) -> Arc<Self> {
        let source = Arc::new(PagedSource::new(provider.clone(), params.clone()));
        let (snapshots, _) = watch::channel(Snapshot::empty(params.clone()));

        lock(&stats).record_session();
        info!(
            query = %params.query,
            sort_by = %params.sort_by,
            source = source.id(),
            "Paging session started"
        );

        Arc::new(Self {
            params,
            page_size,
            provider,
            stats,
            inner: Mutex::new(SessionInner {
                source,
                window: PageWindow::new(PageKey::INITIAL),
                front: EdgeSlot::default(),
                back: EdgeSlot::default(),
                anchor_position: None,
                observers: 0,
                detached_at: None,
                closed: false,
                next_ticket: 1,
            }),
            snapshots,
        })
    }

    fn inner(&self) -> MutexGuard<'_, SessionInner<T>> {
        lock(&self.inner)
    }

    fn stats(&self) -> MutexGuard<'_, PagingStats> {
        lock(&self.stats)
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    #[cfg(test)]
    pub(crate) fn source_id(&self) -> u64 {
        self.inner().source.id()
    }

    pub fn observer_count(&self) -> usize {
        self.inner().observers
    }

    pub fn snapshot(&self) -> Snapshot<T> {
        self.snapshots.borrow().clone()
    }

    // == Snapshot Stream ==
    /// Stream of snapshots: the current one first, then one per change.
    ///
    /// Ends once the session is dropped.
    pub fn snapshots(&self) -> BoxStream<'static, Snapshot<T>> {
        let receiver = self.snapshots.subscribe();
        stream::unfold((receiver, true), |(mut receiver, first)| async move {
            if !first && receiver.changed().await.is_err() {
                return None;
            }
            let snapshot = receiver.borrow_and_update().clone();
            Some((snapshot, (receiver, false)))
        })
        .boxed()
    }

    // == Lifecycle ==
    /// Registers an observer. Starts the initial load if nothing is loaded or loading.
    pub(crate) fn attach(self: &Arc<Self>) {
        let mut inner = self.inner();
        inner.observers += 1;
        inner.detached_at = None;

        let idle = inner.back.in_flight.is_none() && !inner.back.state.is_error();
        if !inner.closed && inner.window.is_empty() && idle {
            let key = inner.window.start_key();
            let _ = self.start_load(&mut inner, Edge::Back, key);
        }
        self.publish(&mut inner);
    }

    /// Unregisters an observer. The last one out cancels in-flight loads.
    pub(crate) fn detach(&self) {
        let mut inner = self.inner();
        inner.observers = inner.observers.saturating_sub(1);
        if inner.observers > 0 {
            return;
        }

        self.cancel_in_flight(&mut inner);
        inner.detached_at = Some(Instant::now());
        self.publish(&mut inner);
        debug!(query = %self.params.query, "Paging session detached");
    }

    /// True once the session is closed, or has had no observers for `grace`.
    pub fn is_expired(&self, grace: Duration) -> bool {
        let inner = self.inner();
        inner.closed
            || (inner.observers == 0
                && inner
                    .detached_at
                    .is_some_and(|detached| detached.elapsed() >= grace))
    }

    /// Cancels in-flight loads and discards all loaded pages. Later loads are no-ops.
    pub(crate) fn shutdown(&self) {
        let mut inner = self.inner();
        if inner.closed {
            return;
        }

        inner.closed = true;
        self.cancel_in_flight(&mut inner);
        inner.window = PageWindow::new(PageKey::INITIAL);
        inner.anchor_position = None;
        inner.front.state = LoadState::IDLE;
        inner.back.state = LoadState::IDLE;
        self.publish(&mut inner);
        info!(query = %self.params.query, "Paging session shut down");
    }

    // == Load ==
    /// Requests the next page at `edge`.
    ///
    /// Joins the in-flight load when one exists. An errored edge stays errored
    /// until `retry`; an exhausted edge resolves immediately.
    pub fn load(self: &Arc<Self>, edge: Edge) -> PendingLoad {
        let mut inner = self.inner();
        self.load_locked(&mut inner, edge)
    }

    /// Clears an edge error and loads that edge again.
    pub fn retry(self: &Arc<Self>, edge: Edge) -> PendingLoad {
        let mut inner = self.inner();
        if inner.slot(edge).state.is_error() {
            info!(query = %self.params.query, edge = ?edge, "Retrying edge");
            inner.slot_mut(edge).state = LoadState::IDLE;
        }
        self.load_locked(&mut inner, edge)
    }

    fn load_locked(self: &Arc<Self>, inner: &mut SessionInner<T>, edge: Edge) -> PendingLoad {
        if inner.closed {
            return ready(LoadState::Error(FetchError::Cancelled));
        }

        let slot = inner.slot(edge);
        if let Some(in_flight) = &slot.in_flight {
            self.stats().record_coalesced();
            debug!(edge = ?edge, page = in_flight.key.get(), "Joining in-flight load");
            return in_flight.pending.clone();
        }
        if slot.state.is_error() {
            return ready(slot.state.clone());
        }

        match inner.window.next_key(edge) {
            Some(key) => {
                let pending = self.start_load(inner, edge, key);
                self.publish(inner);
                pending
            }
            None => ready(inner.slot(edge).state.clone()),
        }
    }

    // == Access ==
    /// Records the viewed index and prefetches an edge within one page of it.
    ///
    /// Errored, busy or exhausted edges are left alone.
    pub fn access(self: &Arc<Self>, index: usize) {
        let mut inner = self.inner();
        inner.anchor_position = Some(index);

        let count = inner.window.item_count();
        if inner.closed || count == 0 {
            return;
        }

        let mut started = false;
        if index.saturating_add(self.page_size) >= count {
            started |= self.prefetch(&mut inner, Edge::Back);
        }
        if index < self.page_size {
            started |= self.prefetch(&mut inner, Edge::Front);
        }
        if started {
            self.publish(&mut inner);
        }
    }

    fn prefetch(self: &Arc<Self>, inner: &mut SessionInner<T>, edge: Edge) -> bool {
        let slot = inner.slot(edge);
        if slot.in_flight.is_some() || !matches!(slot.state, LoadState::NotLoading { .. }) {
            return false;
        }
        match inner.window.next_key(edge) {
            Some(key) => {
                // Dropping the handle leaves the load running
                let _ = self.start_load(inner, edge, key);
                true
            }
            None => false,
        }
    }

    // == Refresh ==
    /// Invalidates the loaded pages and reloads from the page nearest the anchor.
    ///
    /// A new source replaces the current one, so late results of the old one
    /// are dropped.
    pub fn refresh(self: &Arc<Self>) -> PendingLoad {
        let mut inner = self.inner();
        if inner.closed {
            return ready(LoadState::Error(FetchError::Cancelled));
        }

        let refresh_key = inner.source.refresh_key(&PagingState::new(
            inner.window.pages(),
            inner.anchor_position,
        ));
        let start_key = refresh_key.unwrap_or(PageKey::INITIAL);

        self.cancel_in_flight(&mut inner);
        inner.source = Arc::new(PagedSource::new(
            self.provider.clone(),
            self.params.clone(),
        ));
        inner.window = PageWindow::new(start_key);
        inner.anchor_position = None;
        inner.front.state = LoadState::IDLE;
        inner.back.state = LoadState::IDLE;

        info!(
            query = %self.params.query,
            source = inner.source.id(),
            page = start_key.get(),
            "Paging session refreshed"
        );

        let pending = self.start_load(&mut inner, Edge::Back, start_key);
        self.publish(&mut inner);
        pending
    }

    // == Load Task ==
    fn start_load(
        self: &Arc<Self>,
        inner: &mut SessionInner<T>,
        edge: Edge,
        key: PageKey,
    ) -> PendingLoad {
        let ticket = inner.next_ticket;
        inner.next_ticket += 1;

        let source = Arc::clone(&inner.source);
        let session = Arc::downgrade(self);
        let page_size = self.page_size;

        self.stats().record_fetch();
        debug!(
            source = source.id(),
            edge = ?edge,
            page = key.get(),
            ticket,
            "Starting page load"
        );

        let task = tokio::spawn(async move {
            let result = source
                .load(LoadParams {
                    key: Some(key),
                    page_size,
                })
                .await;
            match session.upgrade() {
                Some(session) => session.complete(edge, ticket, source.id(), result),
                None => LoadState::Error(FetchError::Cancelled),
            }
        });
        let abort = task.abort_handle();
        let pending = async move {
            task.await
                .unwrap_or(LoadState::Error(FetchError::Cancelled))
        }
        .boxed()
        .shared();

        let slot = inner.slot_mut(edge);
        slot.state = LoadState::Loading;
        slot.in_flight = Some(InFlight {
            ticket,
            key,
            pending: pending.clone(),
            abort,
        });
        pending
    }

    // == Complete ==
    /// Applies a finished load if its ticket still owns the edge.
    ///
    /// Results from a replaced source or a cancelled ticket are dropped.
    pub(crate) fn complete(
        &self,
        edge: Edge,
        ticket: u64,
        source_id: u64,
        result: LoadResult<T>,
    ) -> LoadState {
        let mut inner = self.inner();

        let owns_edge = inner.source.id() == source_id
            && inner.slot(edge).in_flight.as_ref().map(|f| f.ticket) == Some(ticket);
        if !owns_edge {
            self.stats().record_stale();
            debug!(source = source_id, edge = ?edge, ticket, "Dropping stale load result");
            return LoadState::Error(FetchError::Cancelled);
        }

        inner.slot_mut(edge).in_flight = None;
        let state = match result {
            LoadResult::Page(page) => {
                self.stats().record_page();
                inner.window.insert(page);
                LoadState::NotLoading {
                    end_of_pagination: inner.window.is_exhausted(edge),
                }
            }
            LoadResult::Failure(err) => {
                self.stats().record_failure();
                LoadState::Error(err)
            }
        };

        inner.slot_mut(edge).state = state.clone();
        self.publish(&mut inner);
        state
    }

    fn cancel_in_flight(&self, inner: &mut SessionInner<T>) {
        let mut cancelled = 0;
        for edge in [Edge::Front, Edge::Back] {
            let slot = inner.slot_mut(edge);
            if let Some(in_flight) = slot.in_flight.take() {
                in_flight.abort.abort();
                slot.state = LoadState::IDLE;
                cancelled += 1;
            }
        }

        if cancelled > 0 {
            self.stats().record_cancelled(cancelled);
            debug!(query = %self.params.query, cancelled, "Cancelled in-flight loads");
        }
    }

    // == Publish ==
    fn publish(&self, inner: &mut SessionInner<T>) {
        for edge in [Edge::Front, Edge::Back] {
            let exhausted = inner.window.is_exhausted(edge);
            if let LoadState::NotLoading { end_of_pagination } = &mut inner.slot_mut(edge).state {
                *end_of_pagination = exhausted;
            }
        }

        self.snapshots.send_replace(Snapshot {
            params: self.params.clone(),
            items: inner.window.items(),
            load_state_front: inner.front.state.clone(),
            load_state_back: inner.back.state.clone(),
        });
    }
}

// == Subscription ==
/// One observer's handle on a session.
///
/// Cloning registers another observer; dropping the last one detaches the session.
pub struct Subscription<T: Clone + Send + Sync + 'static> {
    session: Arc<Session<T>>,
}

impl<T: Clone + Send + Sync + 'static> Subscription<T> {
    pub(crate) fn attach(session: Arc<Session<T>>) -> Self {
        session.attach();
        Self { session }
    }

    pub fn params(&self) -> &QueryParams {
        self.session.params()
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Snapshot<T> {
        self.session.snapshot()
    }

    /// Snapshot stream shared with every other observer of the session.
    pub fn stream(&self) -> BoxStream<'static, Snapshot<T>> {
        self.session.snapshots()
    }

    pub fn load(&self, edge: Edge) -> PendingLoad {
        self.session.load(edge)
    }

    pub fn retry(&self, edge: Edge) -> PendingLoad {
        self.session.retry(edge)
    }

    pub fn access(&self, index: usize) {
        self.session.access(index)
    }

    pub fn refresh(&self) -> PendingLoad {
        self.session.refresh()
    }

    pub fn observer_count(&self) -> usize {
        self.session.observer_count()
    }
}

impl<T: Clone + Send + Sync + 'static> Clone for Subscription<T> {
    fn clone(&self) -> Self {
        Self::attach(Arc::clone(&self.session))
    }
}

impl<T: Clone + Send + Sync + 'static> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.session.detach();
    }
}
