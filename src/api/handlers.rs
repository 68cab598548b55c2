//! API Handlers
//!
//! HTTP request handlers for each feed service endpoint.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::{Edge, PageCache, Subscription};
use crate::config::{Config, PagingConfig};
use crate::error::{ApiError, FetchError, Result};
use crate::models::{DetachResponse, FeedRequest, FeedResponse, HealthResponse, StatsResponse};
use crate::news::{Article, NewsApiClient};
use crate::paging::SharedProvider;

/// Application state shared across all handlers.
///
/// The service plays the part of a single screen: `feed` is its one
/// subscription, replaced on every `PUT /feed`.
#[derive(Clone)]
pub struct AppState {
    /// Page cache shared with the background reaper
    pub cache: Arc<PageCache<Article>>,
    /// Subscription held on behalf of the client
    pub feed: Arc<RwLock<Option<Subscription<Article>>>>,
}

impl AppState {
    /// Creates a new AppState around the given provider.
    pub fn new(provider: SharedProvider<Article>, paging: PagingConfig) -> Self {
        Self {
            cache: Arc::new(PageCache::new(provider, paging)),
            feed: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a new AppState backed by the News API client.
    pub fn from_config(config: &Config) -> std::result::Result<Self, FetchError> {
        let client = NewsApiClient::new(
            config.news_api_base_url.clone(),
            config.news_api_key.clone(),
            Duration::from_secs(config.request_timeout),
        )?;
        Ok(Self::new(Arc::new(client), config.paging()))
    }

    async fn with_feed<R>(&self, f: impl FnOnce(&Subscription<Article>) -> R) -> Result<R> {
        let feed = self.feed.read().await;
        feed.as_ref().map(f).ok_or(ApiError::NoActiveFeed)
    }

    async fn feed_response(&self) -> Result<Json<FeedResponse>> {
        let snapshot = self.with_feed(|feed| feed.snapshot()).await?;
        Ok(Json(snapshot.into()))
    }
}

/// Handler for PUT /feed
///
/// Binds the feed to a query. The initial page starts loading in the
/// background; the response shows the back edge as `loading`.
pub async fn bind_feed_handler(
    State(state): State<AppState>,
    Json(req): Json<FeedRequest>,
) -> Result<Json<FeedResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(ApiError::InvalidRequest(error_msg));
    }

    let subscription = state.cache.get_stream(req.query.trim(), req.sort_by);
    let snapshot = subscription.snapshot();

    // Replacing drops the previous subscription, detaching its session
    *state.feed.write().await = Some(subscription);

    Ok(Json(snapshot.into()))
}

/// Handler for GET /feed
pub async fn get_feed_handler(State(state): State<AppState>) -> Result<Json<FeedResponse>> {
    state.feed_response().await
}

/// Handler for POST /feed/load/:edge
///
/// Waits for the edge's load (joining one already in flight) and returns
/// the resulting snapshot.
pub async fn load_handler(
    State(state): State<AppState>,
    Path(edge): Path<Edge>,
) -> Result<Json<FeedResponse>> {
    let pending = state.with_feed(|feed| feed.load(edge)).await?;
    pending.await;
    state.feed_response().await
}

/// Handler for POST /feed/retry/:edge
pub async fn retry_handler(
    State(state): State<AppState>,
    Path(edge): Path<Edge>,
) -> Result<Json<FeedResponse>> {
    let pending = state.with_feed(|feed| feed.retry(edge)).await?;
    pending.await;
    state.feed_response().await
}

/// Handler for POST /feed/access/:index
///
/// Records the client's scroll position; may start prefetching either edge.
pub async fn access_handler(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<FeedResponse>> {
    state.with_feed(|feed| feed.access(index)).await?;
    state.feed_response().await
}

/// Handler for POST /feed/refresh
pub async fn refresh_handler(State(state): State<AppState>) -> Result<Json<FeedResponse>> {
    let pending = state.with_feed(|feed| feed.refresh()).await?;
    pending.await;
    state.feed_response().await
}

/// Handler for DELETE /feed
///
/// Drops the subscription. The session stays reusable for the grace period.
pub async fn detach_handler(State(state): State<AppState>) -> Result<Json<DetachResponse>> {
    let subscription = state
        .feed
        .write()
        .await
        .take()
        .ok_or(ApiError::NoActiveFeed)?;

    Ok(Json(DetachResponse::new(&subscription.params().query)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::ArticleSource;
    use crate::paging::{PageKey, PageProvider, SortBy};
    use async_trait::async_trait;
    use chrono::Utc;

    /// Two full pages of articles, then nothing.
    struct TwoPages;

    #[async_trait]
    impl PageProvider for TwoPages {
        type Item = Article;

        async fn fetch(
            &self,
            query: &str,
            _sort_by: SortBy,
            page: PageKey,
            page_size: usize,
        ) -> std::result::Result<Vec<Article>, FetchError> {
            if page.get() > 2 {
                return Ok(Vec::new());
            }
            Ok((0..page_size)
                .map(|i| Article {
                    source: ArticleSource {
                        id: None,
                        name: "Wire".to_string(),
                    },
                    author: None,
                    title: format!("{query} {}-{i}", page.get()),
                    description: None,
                    url: format!("https://example.com/{}/{i}", page.get()),
                    url_to_image: None,
                    published_at: Utc::now(),
                    content: None,
                })
                .collect())
        }
    }

    fn test_state() -> AppState {
        let paging = PagingConfig {
            page_size: 5,
            grace_period: Duration::from_secs(5),
        };
        AppState::new(Arc::new(TwoPages), paging)
    }

    fn feed_request(query: &str) -> Json<FeedRequest> {
        Json(FeedRequest {
            query: query.to_string(),
            sort_by: SortBy::PublishedAt,
        })
    }

    #[tokio::test]
    async fn test_bind_then_load_back() {
        let state = test_state();

        let bound = bind_feed_handler(State(state.clone()), feed_request("android"))
            .await
            .unwrap();
        assert_eq!(bound.query, "android");

        // Joins the initial load started by the bind
        let response = load_handler(State(state.clone()), Path(Edge::Back))
            .await
            .unwrap();
        assert_eq!(response.item_count, 5);
        assert_eq!(response.items[0].title, "android 1-0");
        assert_eq!(response.back.state, "notLoading");
    }

    #[tokio::test]
    async fn test_feed_endpoints_require_binding() {
        let state = test_state();

        assert!(matches!(
            get_feed_handler(State(state.clone())).await,
            Err(ApiError::NoActiveFeed)
        ));
        assert!(matches!(
            load_handler(State(state.clone()), Path(Edge::Back)).await,
            Err(ApiError::NoActiveFeed)
        ));
        assert!(matches!(
            detach_handler(State(state)).await,
            Err(ApiError::NoActiveFeed)
        ));
    }

    #[tokio::test]
    async fn test_bind_invalid_request() {
        let state = test_state();

        let result = bind_feed_handler(State(state.clone()), feed_request("  ")).await;
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
        assert!(!state.cache.has_session());
    }

    #[tokio::test]
    async fn test_detach_keeps_session_for_grace_period() {
        let state = test_state();
        let _bound = bind_feed_handler(State(state.clone()), feed_request("android"))
            .await
            .unwrap();

        let response = detach_handler(State(state.clone())).await.unwrap();
        assert!(response.message.contains("android"));
        assert!(state.cache.has_session());
        assert!(state.feed.read().await.is_none());
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();
        let _bound = bind_feed_handler(State(state.clone()), feed_request("android"))
            .await
            .unwrap();
        let _loaded = load_handler(State(state.clone()), Path(Edge::Back))
            .await
            .unwrap();

        let response = stats_handler(State(state)).await;
        assert_eq!(response.stats.sessions_started, 1);
        assert_eq!(response.stats.pages_loaded, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
