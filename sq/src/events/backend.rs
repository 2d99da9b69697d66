//! Events-search backend trait and the Ticketmaster Discovery implementation

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::SearchError;
use crate::config::EventsConfig;

/// Filters for one events search; blank inputs are omitted
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EventQuery {
    pub keyword: Option<String>,
    pub city: Option<String>,
}

impl EventQuery {
    pub fn new(keyword: &str, city: &str) -> Self {
        fn present(s: &str) -> Option<String> {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Self {
            keyword: present(keyword),
            city: present(city),
        }
    }
}

/// Raw events provider: one request in, provider JSON out
#[async_trait]
pub trait EventsBackend: Send + Sync {
    async fn fetch(&self, query: &EventQuery) -> Result<Value, SearchError>;
}

/// Stand-in for a backend that could not be built; every fetch fails
#[derive(Debug, Clone)]
pub struct UnavailableBackend {
    reason: String,
}

impl UnavailableBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl EventsBackend for UnavailableBackend {
    async fn fetch(&self, query: &EventQuery) -> Result<Value, SearchError> {
        debug!(?query, reason = %self.reason, "UnavailableBackend::fetch: called");
        Err(SearchError::Unavailable(self.reason.clone()))
    }
}

/// Ticketmaster Discovery API backend
pub struct TicketmasterBackend {
    base_url: String,
    api_key: String,
    page_size: Option<u32>,
    http: Client,
}

impl TicketmasterBackend {
    /// Create a new backend from configuration
    pub fn from_config(config: &EventsConfig) -> Result<Self, SearchError> {
        debug!(base_url = %config.base_url, "from_config: called");
        let api_key = config
            .get_api_key()
            .map_err(|e| SearchError::MissingCredentials(e.to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(SearchError::Network)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            page_size: config.page_size,
            http,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/discovery/v2/events.json", self.base_url)
    }

    fn query_params(&self, query: &EventQuery) -> Vec<(&'static str, String)> {
        let mut params = vec![("apikey", self.api_key.clone())];
        if let Some(keyword) = &query.keyword {
            params.push(("keyword", keyword.clone()));
        }
        if let Some(city) = &query.city {
            params.push(("city", city.clone()));
        }
        if let Some(size) = self.page_size {
            params.push(("size", size.to_string()));
        }
        params
    }
}

#[async_trait]
impl EventsBackend for TicketmasterBackend {
    async fn fetch(&self, query: &EventQuery) -> Result<Value, SearchError> {
        debug!(?query, "fetch: called");
        let response = self
            .http
            .get(self.endpoint())
            .query(&self.query_params(query))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, "fetch: API error");
            let message = response.text().await.unwrap_or_default();
            return Err(SearchError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}
