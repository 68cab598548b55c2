//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::paging::DEFAULT_PAGE_SIZE;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Items requested per page, also the prefetch distance
    pub page_size: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Base URL of the news provider
    pub news_api_base_url: String,
    /// API key sent with every provider request
    pub news_api_key: String,
    /// Seconds a detached session stays reusable
    pub session_grace_period: u64,
    /// Background reaper interval in seconds
    pub reaper_interval: u64,
    /// Provider request timeout in seconds
    pub request_timeout: u64,
}

/// Settings the page cache needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    pub page_size: usize,
    pub grace_period: Duration,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Config::default().paging()
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PAGE_SIZE` - Items per page (default: 20)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `NEWS_API_BASE_URL` - Provider base URL (default: https://newsapi.org/v2)
    /// - `NEWS_API_KEY` - Provider API key (default: empty)
    /// - `SESSION_GRACE_PERIOD` - Seconds before a detached session is dropped (default: 5)
    /// - `REAPER_INTERVAL` - Reaper frequency in seconds (default: 1)
    /// - `REQUEST_TIMEOUT` - Provider request timeout in seconds (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            page_size: env_or("PAGE_SIZE", defaults.page_size).max(1),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            news_api_base_url: env_or("NEWS_API_BASE_URL", defaults.news_api_base_url),
            news_api_key: env_or("NEWS_API_KEY", defaults.news_api_key),
            session_grace_period: env_or("SESSION_GRACE_PERIOD", defaults.session_grace_period),
            reaper_interval: env_or("REAPER_INTERVAL", defaults.reaper_interval).max(1),
            request_timeout: env_or("REQUEST_TIMEOUT", defaults.request_timeout),
        }
    }

    /// Page cache settings derived from this configuration.
    pub fn paging(&self) -> PagingConfig {
        PagingConfig {
            page_size: self.page_size,
            grace_period: Duration::from_secs(self.session_grace_period),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            server_port: 3000,
            news_api_base_url: "https://newsapi.org/v2".to_string(),
            news_api_key: String::new(),
            session_grace_period: 5,
            reaper_interval: 1,
            request_timeout: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.news_api_base_url, "https://newsapi.org/v2");
        assert_eq!(config.session_grace_period, 5);
        assert_eq!(config.reaper_interval, 1);
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("PAGE_SIZE");
        env::remove_var("SERVER_PORT");
        env::remove_var("NEWS_API_BASE_URL");
        env::remove_var("SESSION_GRACE_PERIOD");

        let config = Config::from_env();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.news_api_base_url, "https://newsapi.org/v2");
        assert_eq!(config.session_grace_period, 5);
    }

    #[test]
    fn test_paging_config_from_config() {
        let paging = Config::default().paging();
        assert_eq!(paging.page_size, 20);
        assert_eq!(paging.grace_period, Duration::from_secs(5));
        assert_eq!(PagingConfig::default(), paging);
    }
}
