//! News Module
//!
//! Concrete provider for the news search screen: article payloads and the
//! HTTP client that fetches them page by page.

mod article;
mod client;

pub use article::{Article, ArticleSource, NewsErrorBody, NewsResponse};
pub use client::NewsApiClient;
