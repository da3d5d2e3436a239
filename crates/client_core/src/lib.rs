use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use shared::{
    domain::{
        CitySummary, CountySummary, HealthStatus, LocationMatch, ObligationsResponse,
        StateSummary,
    },
    error::ApiErrorBody,
    protocol::{CalendarFilters, SearchQuery},
};
use tracing::{debug, info};
use url::Url;

pub mod error;

pub use error::ClientError;

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";
/// Shorter search queries are answered with an empty list.
pub const MIN_SEARCH_QUERY_CHARS: usize = 2;

/// Read-only calendar backend.
#[async_trait]
pub trait CalendarApi: Send + Sync {
    async fn get_health(&self) -> Result<HealthStatus>;
    async fn get_states(&self) -> Result<Vec<StateSummary>>;
    async fn get_counties(&self, state_code: &str) -> Result<Vec<CountySummary>>;
    async fn get_cities(&self, state_code: &str, county_name: &str) -> Result<Vec<CitySummary>>;
    async fn get_obligations(&self, filters: &CalendarFilters) -> Result<ObligationsResponse>;
    async fn search_locations(&self, query: &str) -> Result<Vec<LocationMatch>>;
}

#[derive(Debug, Clone)]
pub struct CalendarClient {
    http: Client,
    base_url: Url,
}

impl CalendarClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, None)
    }

    /// Builds a client; without a timeout a hung backend call never resolves.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Setup)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // parse_base_url rejects cannot-be-a-base urls, so this always applies.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send_json<T: DeserializeOwned>(&self, url: Url, request: RequestBuilder) -> Result<T> {
        debug!(url = %url, "calendar api: GET");
        let response = request.send().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;

        if !status.is_success() {
            let message = ApiErrorBody::message_from_body(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string()
            });
            return Err(ClientError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T> {
        let url = self.endpoint(segments);
        let request = self.http.get(url.clone());
        self.send_json(url, request).await
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let invalid = |reason: String| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };
    let url = Url::parse(raw.trim()).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() {
        return Err(invalid("url cannot be used as a base".to_string()));
    }
    Ok(url)
}

fn require_non_empty(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ClientError::InvalidArgument(format!("{name} must not be empty")));
    }
    Ok(())
}

#[async_trait]
impl CalendarApi for CalendarClient {
    async fn get_health(&self) -> Result<HealthStatus> {
        self.get_json(&["health"]).await
    }

    async fn get_states(&self) -> Result<Vec<StateSummary>> {
        self.get_json(&["states"]).await
    }

    async fn get_counties(&self, state_code: &str) -> Result<Vec<CountySummary>> {
        require_non_empty("state code", state_code)?;
        self.get_json(&["counties", state_code]).await
    }

    async fn get_cities(&self, state_code: &str, county_name: &str) -> Result<Vec<CitySummary>> {
        require_non_empty("state code", state_code)?;
        require_non_empty("county name", county_name)?;
        self.get_json(&["cities", state_code, county_name]).await
    }

    async fn get_obligations(&self, filters: &CalendarFilters) -> Result<ObligationsResponse> {
        info!(
            state = filters.state.as_deref().unwrap_or(""),
            county = filters.county.as_deref().unwrap_or(""),
            city = filters.city.as_deref().unwrap_or(""),
            date_range = filters.date_range.as_deref().unwrap_or(""),
            "calendar api: fetch obligations"
        );
        let url = self.endpoint(&["calendar"]);
        let request = self.http.get(url.clone()).query(filters);
        self.send_json(url, request).await
    }

    async fn search_locations(&self, query: &str) -> Result<Vec<LocationMatch>> {
        let query = query.trim();
        if query.chars().count() < MIN_SEARCH_QUERY_CHARS {
            return Ok(Vec::new());
        }
        let url = self.endpoint(&["search"]);
        let request = self.http.get(url.clone()).query(&SearchQuery {
            q: query.to_string(),
        });
        self.send_json(url, request).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
