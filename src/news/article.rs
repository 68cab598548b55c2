//! News API payloads
//!
//! Shapes of the `everything` endpoint's success and error bodies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publisher of an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
    pub id: Option<String>,
    pub name: String,
}

/// A single search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub source: ArticleSource,
    #[serde(default)]
    pub author: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub url_to_image: Option<String>,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub content: Option<String>,
}

/// Success body of a search request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub status: String,
    #[serde(default)]
    pub total_results: u64,
    #[serde(default)]
    pub articles: Vec<Article>,
}

/// Error body returned with a non-success status.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "status": "ok",
        "totalResults": 1,
        "articles": [{
            "source": {"id": null, "name": "Android Police"},
            "author": "Jane Doe",
            "title": "Android 16 ships",
            "description": "The release is out.",
            "url": "https://example.com/a16",
            "urlToImage": "https://example.com/a16.png",
            "publishedAt": "2025-06-10T17:00:00Z",
            "content": null
        }]
    }"#;

    #[test]
    fn test_news_response_deserialize() {
        let response: NewsResponse = serde_json::from_str(BODY).unwrap();
        assert_eq!(response.status, "ok");
        assert_eq!(response.total_results, 1);

        let article = &response.articles[0];
        assert_eq!(article.source.name, "Android Police");
        assert_eq!(article.url_to_image.as_deref(), Some("https://example.com/a16.png"));
        assert_eq!(article.published_at.to_rfc3339(), "2025-06-10T17:00:00+00:00");
        assert!(article.content.is_none());
    }

    #[test]
    fn test_article_serializes_camel_case() {
        let response: NewsResponse = serde_json::from_str(BODY).unwrap();
        let json = serde_json::to_string(&response.articles[0]).unwrap();
        assert!(json.contains("urlToImage"));
        assert!(json.contains("publishedAt"));
    }

    #[test]
    fn test_error_body_deserialize() {
        let body: NewsErrorBody = serde_json::from_str(
            r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#,
        )
        .unwrap();
        assert_eq!(body.code.as_deref(), Some("apiKeyInvalid"));
        assert_eq!(body.message, "Your API key is invalid.");
    }
}
