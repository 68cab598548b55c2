//! Snapshot Module
//!
//! Consumer-visible view of a session: items loaded so far plus per-edge state.

use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::paging::QueryParams;

// == Edge ==
/// Side of the loaded window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// Toward lower page keys
    Front,
    /// Toward higher page keys
    Back,
}

// == Load State ==
/// Load state of one edge.
///
/// `NotLoading -> Loading -> NotLoading | Error`; `Error -> Loading` only on retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotLoading { end_of_pagination: bool },
    Loading,
    Error(FetchError),
}

impl LoadState {
    /// Idle, more pages may follow.
    pub const IDLE: LoadState = LoadState::NotLoading {
        end_of_pagination: false,
    };

    pub fn is_error(&self) -> bool {
        matches!(self, LoadState::Error(_))
    }

    pub fn end_of_pagination(&self) -> bool {
        matches!(
            self,
            LoadState::NotLoading {
                end_of_pagination: true
            }
        )
    }
}

impl Default for LoadState {
    fn default() -> Self {
        LoadState::IDLE
    }
}

// == Snapshot ==
/// Point-in-time concatenation of all loaded pages plus per-edge load state.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    /// Parameters of the session that produced this snapshot
    pub params: QueryParams,
    /// Items of all loaded pages, ascending key order
    pub items: Vec<T>,
    pub load_state_front: LoadState,
    pub load_state_back: LoadState,
}

impl<T> Snapshot<T> {
    /// Snapshot of a session that has loaded nothing yet.
    pub fn empty(params: QueryParams) -> Self {
        Self {
            params,
            items: Vec::new(),
            load_state_front: LoadState::IDLE,
            load_state_back: LoadState::IDLE,
        }
    }

    pub fn load_state(&self, edge: Edge) -> &LoadState {
        match edge {
            Edge::Front => &self.load_state_front,
            Edge::Back => &self.load_state_back,
        }
    }
}
