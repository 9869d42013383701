//! Address autocomplete backed by a public geocoding service.
//!
//! Lookups are lazy and uncached: every call is one independent request.
//! Failures never surface to the caller; a provider outage looks exactly
//! like "no matches".
//!
//! # Architecture
//!
//! - [`AddressLookup`]: the seam handlers depend on
//! - [`NominatimClient`]: OpenStreetMap Nominatim `/search` implementation
//! - [`QueryGate`]: latest-query-wins guard for overlapping lookups

mod gate;

pub use gate::{QueryGate, Ticket};

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

/// Public Nominatim instance.
pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";

/// Queries shorter than this (in characters) are not sent.
pub const MIN_QUERY_CHARS: usize = 3;

/// Upper bound on returned suggestions.
pub const MAX_SUGGESTIONS: usize = 5;

/// Country restriction passed to the provider.
pub const COUNTRY_CODES: &str = "us";

/// Quiet period after the last keystroke before a lookup is issued.
pub const SUGGEST_DEBOUNCE: Duration = Duration::from_millis(300);

/// One candidate address as the provider returns it.
///
/// The provider owns this shape; fields it omits default, fields we do not
/// model are carried through in [`AddressSuggestion::extra`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AddressSuggestion {
    #[serde(default)]
    pub place_id: u64,
    #[serde(default)]
    pub licence: String,
    #[serde(default)]
    pub osm_type: String,
    #[serde(default)]
    pub osm_id: u64,
    #[serde(default)]
    pub boundingbox: Vec<String>,
    #[serde(default)]
    pub lat: String,
    #[serde(default)]
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub class: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub importance: f64,
    /// Structured address parts (`addressdetails=1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Map<String, Value>>,
    /// Any other provider fields, passed through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Why a lookup produced nothing. Logged, never returned to callers.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("invalid search URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned status {0}")]
    Status(u16),
    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Resolves partial addresses to candidate matches.
#[async_trait::async_trait]
pub trait AddressLookup: Send + Sync {
    /// Suggestions for `query`, in provider relevance order, at most
    /// [`MAX_SUGGESTIONS`]. Never fails; errors degrade to an empty list.
    async fn suggest(&self, query: &str) -> Vec<AddressSuggestion>;
}

/// Nominatim `/search` client.
#[derive(Debug, Clone)]
pub struct NominatimClient {
    http: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl NominatimClient {
    /// Create a client for `base_url`, identifying itself as `user_agent`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            user_agent: user_agent.into(),
        }
    }

    /// Search URL for `query` with the fixed provider parameters.
    pub fn search_url(&self, query: &str) -> Result<Url, url::ParseError> {
        let mut url = Url::parse(&format!(
            "{}/search",
            self.base_url.trim_end_matches('/')
        ))?;
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", query)
            .append_pair("addressdetails", "1")
            .append_pair("limit", &MAX_SUGGESTIONS.to_string())
            .append_pair("countrycodes", COUNTRY_CODES);
        Ok(url)
    }

    async fn fetch(&self, query: &str) -> Result<Vec<AddressSuggestion>, LookupError> {
        let resp = self
            .http
            .get(self.search_url(query)?)
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Status(status.as_u16()));
        }

        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait::async_trait]
impl AddressLookup for NominatimClient {
    async fn suggest(&self, query: &str) -> Vec<AddressSuggestion> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return Vec::new();
        }

        match self.fetch(query).await {
            Ok(mut suggestions) => {
                suggestions.truncate(MAX_SUGGESTIONS);
                tracing::debug!(
                    name: "geocode.lookup.completed",
                    count = suggestions.len(),
                    "Address suggestions fetched"
                );
                suggestions
            }
            Err(e) => {
                tracing::warn!(
                    name: "geocode.lookup.failed",
                    error = %e,
                    "Failed to fetch address suggestions"
                );
                Vec::new()
            }
        }
    }
}
