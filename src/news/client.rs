//! News API Client
//!
//! Page provider backed by the News API `everything` search endpoint.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::FetchError;
use crate::news::{Article, NewsErrorBody, NewsResponse};
use crate::paging::{PageKey, PageProvider, SortBy};

// == News Api Client ==
/// HTTP client for `GET {base}/everything`.
#[derive(Debug, Clone)]
pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NewsApiClient {
    /// Creates a client for `base_url` (e.g. `https://newsapi.org/v2`).
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("news_pager/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn everything_url(&self) -> String {
        format!("{}/everything", self.base_url)
    }
}

#[async_trait]
impl PageProvider for NewsApiClient {
    type Item = Article;

    async fn fetch(
        &self,
        query: &str,
        sort_by: SortBy,
        page: PageKey,
        page_size: usize,
    ) -> Result<Vec<Article>, FetchError> {
        let page = page.get().to_string();
        let page_size = page_size.to_string();

        let response = self
            .http
            .get(self.everything_url())
            .query(&[
                ("q", query),
                ("page", page.as_str()),
                ("sortBy", sort_by.as_str()),
                ("pageSize", page_size.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<NewsErrorBody>(&body)
                .map(|err| err.message)
                .unwrap_or(body);
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: NewsResponse = response.json().await?;
        debug!(
            query,
            page = %page,
            total_results = body.total_results,
            articles = body.articles.len(),
            "News page fetched"
        );
        Ok(body.articles)
    }
}
