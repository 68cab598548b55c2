//! Response DTOs for the feed service
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{LoadState, PagingStats, Snapshot};
use crate::news::Article;
use crate::paging::SortBy;

/// Load state of one edge as rendered to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadStateView {
    /// One of `notLoading`, `loading`, `error`
    pub state: String,
    pub end_of_pagination: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<&LoadState> for LoadStateView {
    fn from(state: &LoadState) -> Self {
        match state {
            LoadState::NotLoading { end_of_pagination } => Self {
                state: "notLoading".to_string(),
                end_of_pagination: *end_of_pagination,
                error: None,
            },
            LoadState::Loading => Self {
                state: "loading".to_string(),
                end_of_pagination: false,
                error: None,
            },
            LoadState::Error(err) => Self {
                state: "error".to_string(),
                end_of_pagination: false,
                error: Some(err.to_string()),
            },
        }
    }
}

/// Response body for every feed endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub query: String,
    pub sort_by: SortBy,
    pub item_count: usize,
    pub items: Vec<Article>,
    pub front: LoadStateView,
    pub back: LoadStateView,
}

impl From<Snapshot<Article>> for FeedResponse {
    fn from(snapshot: Snapshot<Article>) -> Self {
        Self {
            query: snapshot.params.query,
            sort_by: snapshot.params.sort_by,
            item_count: snapshot.items.len(),
            front: LoadStateView::from(&snapshot.load_state_front),
            back: LoadStateView::from(&snapshot.load_state_back),
            items: snapshot.items,
        }
    }
}

/// Response body for detaching the feed (DELETE /feed)
#[derive(Debug, Clone, Serialize)]
pub struct DetachResponse {
    /// Success message
    pub message: String,
}

impl DetachResponse {
    pub fn new(query: &str) -> Self {
        Self {
            message: format!("Feed for '{}' detached", query),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: PagingStats,
    /// load_failures / (pages_loaded + load_failures)
    pub failure_rate: f64,
}

impl From<PagingStats> for StatsResponse {
    fn from(stats: PagingStats) -> Self {
        Self {
            failure_rate: stats.failure_rate(),
            stats,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::paging::QueryParams;

    #[test]
    fn test_load_state_view_error() {
        let view = LoadStateView::from(&LoadState::Error(FetchError::Transport("timeout".into())));
        assert_eq!(view.state, "error");
        assert_eq!(view.error.as_deref(), Some("Transport error: timeout"));

        let json = serde_json::to_string(&LoadStateView::from(&LoadState::Loading)).unwrap();
        assert!(!json.contains("error"));
        assert!(json.contains("endOfPagination"));
    }

    #[test]
    fn test_feed_response_from_snapshot() {
        let mut snapshot = Snapshot::empty(QueryParams::new("android", SortBy::Popularity));
        snapshot.load_state_back = LoadState::NotLoading {
            end_of_pagination: true,
        };

        let resp = FeedResponse::from(snapshot);
        assert_eq!(resp.item_count, 0);
        assert!(resp.back.end_of_pagination);

        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains(r#""sortBy":"popularity""#));
        assert!(json.contains(r#""state":"notLoading""#));
    }

    #[test]
    fn test_stats_response_flattens_counters() {
        let mut stats = PagingStats::new();
        stats.record_page();
        stats.record_failure();

        let json = serde_json::to_string(&StatsResponse::from(stats)).unwrap();
        assert!(json.contains(r#""pagesLoaded":1"#));
        assert!(json.contains(r#""failureRate":0.5"#));
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy()).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let json = serde_json::to_string(&ErrorResponse::new("Something went wrong")).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
