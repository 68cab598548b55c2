//! Request DTOs for the feed service
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::paging::SortBy;

/// Longest query the news provider accepts
pub const MAX_QUERY_LENGTH: usize = 500;

/// Request body for binding the feed (PUT /feed)
///
/// # Fields
/// - `query`: Search keywords
/// - `sortBy`: Optional ordering (defaults to `publishedAt`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRequest {
    /// Search keywords
    pub query: String,
    /// Result ordering
    #[serde(default)]
    pub sort_by: SortBy,
}

impl FeedRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.query.trim().is_empty() {
            return Some("Query cannot be empty".to_string());
        }
        if self.query.chars().count() > MAX_QUERY_LENGTH {
            return Some(format!(
                "Query exceeds maximum length of {} characters",
                MAX_QUERY_LENGTH
            ));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_request_deserialize() {
        let json = r#"{"query": "android", "sortBy": "popularity"}"#;
        let req: FeedRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.query, "android");
        assert_eq!(req.sort_by, SortBy::Popularity);
    }

    #[test]
    fn test_feed_request_default_sort() {
        let req: FeedRequest = serde_json::from_str(r#"{"query": "android"}"#).unwrap();
        assert_eq!(req.sort_by, SortBy::PublishedAt);
    }

    #[test]
    fn test_feed_request_rejects_unknown_sort() {
        let json = r#"{"query": "android", "sortBy": "newest"}"#;
        assert!(serde_json::from_str::<FeedRequest>(json).is_err());
    }

    #[test]
    fn test_validate_empty_query() {
        let req = FeedRequest {
            query: "   ".to_string(),
            sort_by: SortBy::Relevancy,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_long_query() {
        let req = FeedRequest {
            query: "x".repeat(MAX_QUERY_LENGTH + 1),
            sort_by: SortBy::Relevancy,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_valid_request() {
        let req = FeedRequest {
            query: "android".to_string(),
            sort_by: SortBy::PublishedAt,
        };
        assert!(req.validate().is_none());
    }
}
