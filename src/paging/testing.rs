//! In-memory provider for unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::error::FetchError;
use crate::paging::{PageKey, PageProvider, SortBy};

pub type Call = (String, SortBy, u32, usize);

/// Provider returning `"{query}-{page}-{index}"` items, with scripted failures
/// and gates that hold a fetch until released.
pub struct ScriptedProvider {
    items_per_page: usize,
    last_page: u32,
    failures: Mutex<HashMap<u32, FetchError>>,
    gates: Mutex<HashMap<(String, u32), Arc<Semaphore>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::paged(3, u32::MAX)
    }

    /// Full pages up to and including `last_page`, empty pages after it.
    pub fn paged(items_per_page: usize, last_page: u32) -> Self {
        Self {
            items_per_page,
            last_page,
            failures: Mutex::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Makes the next fetch of `page` fail with `err`.
    pub fn fail_page(&self, page: u32, err: FetchError) {
        self.failures.lock().unwrap().insert(page, err);
    }

    /// Holds every fetch of `page` for `query` until a permit is added.
    pub fn gate(&self, query: &str, page: u32) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.gates
            .lock()
            .unwrap()
            .insert((query.to_string(), page), gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PageProvider for ScriptedProvider {
    type Item = String;

    async fn fetch(
        &self,
        query: &str,
        sort_by: SortBy,
        page: PageKey,
        page_size: usize,
    ) -> Result<Vec<String>, FetchError> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), sort_by, page.get(), page_size));

        let gate = self
            .gates
            .lock()
            .unwrap()
            .get(&(query.to_string(), page.get()))
            .cloned();
        if let Some(gate) = gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        let failure = self.failures.lock().unwrap().remove(&page.get());
        if let Some(err) = failure {
            return Err(err);
        }

        if page.get() > self.last_page {
            return Ok(Vec::new());
        }

        Ok((0..self.items_per_page)
            .map(|i| format!("{}-{}-{}", query, page, i))
            .collect())
    }
}
