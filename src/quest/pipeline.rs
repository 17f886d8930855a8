//! Outbound search request pipeline
//!
//! This module owns the HTTP client used for searches and the single header
//! override that makes a request look like it came from the active surface.
//! The override is applied by the pipeline to every matching request:
//! - host equal to (or a subdomain of) the search host
//! - path equal to `/search`
//!
//! At most one override is installed at a time.

use crate::quest::request::SEARCH_PATH;
use crate::state::SearchSurface;
use crate::{ConfigError, QuestError, Result};
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{Client, RequestBuilder, StatusCode};
use std::time::Duration;
use url::Url;

/// Header rewrite for the active surface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderOverride {
    pub surface: SearchSurface,
    pub user_agent: String,
}

impl HeaderOverride {
    fn apply(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header(ACCEPT, "*/*")
            .header(USER_AGENT, self.user_agent.as_str())
    }
}

/// Builds the HTTP client used for search requests
///
/// Only the connection phase is bounded; a search request itself runs as long
/// as the server takes.
pub fn build_search_client() -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Search client with an optional header override
pub struct SearchPipeline {
    client: Client,
    search_host: String,
    interceptor: Option<HeaderOverride>,
}

impl SearchPipeline {
    /// Creates a pipeline whose override targets the host of `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url)?;
        let host = match parsed.host_str() {
            Some(host) => host.to_ascii_lowercase(),
            None => {
                return Err(ConfigError::InvalidUrl(format!(
                    "base-url '{}' has no host",
                    base_url
                ))
                .into())
            }
        };

        let client = build_search_client().map_err(|source| QuestError::Http {
            url: base_url.to_string(),
            source,
        })?;

        Ok(Self {
            client,
            search_host: host,
            interceptor: None,
        })
    }

    /// Installs the override, replacing any installed one
    pub fn install(&mut self, header: HeaderOverride) {
        tracing::debug!("Installing {} header override", header.surface);
        if let Some(previous) = self.interceptor.replace(header) {
            tracing::debug!("Replaced {} header override", previous.surface);
        }
    }

    /// Removes the installed override
    ///
    /// Removing when nothing is installed is a no-op.
    pub fn remove(&mut self) -> Option<HeaderOverride> {
        self.interceptor.take()
    }

    /// The currently installed override
    pub fn installed(&self) -> Option<&HeaderOverride> {
        self.interceptor.as_ref()
    }

    /// Returns true if the override applies to the URL
    pub fn matches(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_ascii_lowercase();

        let host_matches =
            host == self.search_host || host.ends_with(&format!(".{}", self.search_host));

        host_matches && url.path() == SEARCH_PATH
    }

    /// Prepares a GET request, applying the override when it matches
    pub fn request(&self, url: &str) -> Result<RequestBuilder> {
        let parsed = Url::parse(url)?;
        let builder = self.client.get(parsed.clone());

        Ok(match &self.interceptor {
            Some(header) if self.matches(&parsed) => header.apply(builder),
            _ => builder,
        })
    }

    /// Issues one search request
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The server answered HTTP 200
    /// * `Err(QuestError::FetchFailed)` - The request never got a response
    /// * `Err(QuestError::ResponseAnomaly)` - Any status other than 200
    pub async fn search(&self, url: &str) -> Result<()> {
        let response = self
            .request(url)?
            .send()
            .await
            .map_err(|source| QuestError::FetchFailed {
                context: "Search".to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(QuestError::ResponseAnomaly {
                context: "Search".to_string(),
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}
