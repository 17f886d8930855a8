//! Identity provider backed by the configuration and optional JSON sources

use crate::config::IdentityConfig;
use crate::identity::{IdentityHeaders, IdentityProvider, IdentitySource, RotationTarget};
use crate::state::SearchSurface;
use crate::{QuestError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// JSON document served by the stable and updated identity sources
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentDocument {
    pub desktop: String,
    pub mobile: String,
}

impl UserAgentDocument {
    fn get(&self, surface: SearchSurface) -> &str {
        match surface {
            SearchSurface::Desktop => &self.desktop,
            SearchSurface::Mobile => &self.mobile,
        }
    }
}

/// Identity provider using configured defaults, user overrides and remote sources
///
/// - User overrides always win and are never replaced by rotation.
/// - `acquire` reloads the stable identities, from `stable-source-url` when
///   configured and from the configuration otherwise.
/// - `rotate` fetches replacements from `updated-source-url`.
pub struct HttpIdentityProvider {
    client: Client,
    config: IdentityConfig,
    headers: IdentityHeaders,
}

impl HttpIdentityProvider {
    pub fn new(config: IdentityConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| QuestError::IdentityUnavailable(e.to_string()))?;

        let headers = stable_from_config(&config);

        Ok(Self {
            client,
            config,
            headers,
        })
    }

    fn override_for(&self, surface: SearchSurface) -> Option<&str> {
        match surface {
            SearchSurface::Desktop => self.config.desktop_override.as_deref(),
            SearchSurface::Mobile => self.config.mobile_override.as_deref(),
        }
    }

    async fn fetch_document(&self, url: &str) -> Result<UserAgentDocument> {
        tracing::debug!("Fetching identity document from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| QuestError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuestError::IdentityUnavailable(format!(
                "{} returned HTTP {}",
                url,
                status.as_u16()
            )));
        }

        let document: UserAgentDocument =
            response.json().await.map_err(|source| QuestError::Http {
                url: url.to_string(),
                source,
            })?;

        if document.desktop.trim().is_empty() || document.mobile.trim().is_empty() {
            return Err(QuestError::IdentityUnavailable(format!(
                "{} returned an empty identity",
                url
            )));
        }

        Ok(document)
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn acquire(&mut self) -> Result<IdentityHeaders> {
        let mut headers = stable_from_config(&self.config);

        if let Some(url) = self.config.stable_source_url.clone() {
            let document = self.fetch_document(&url).await?;
            for surface in SearchSurface::ALL {
                if self.override_for(surface).is_none() {
                    headers.set(
                        surface,
                        document.get(surface).to_string(),
                        IdentitySource::Default,
                    );
                }
            }
        }

        self.headers = headers;
        Ok(self.headers.clone())
    }

    fn current(&self) -> &IdentityHeaders {
        &self.headers
    }

    async fn rotate(&mut self, target: RotationTarget) -> Result<()> {
        let url = self.config.updated_source_url.clone().ok_or_else(|| {
            QuestError::IdentityUnavailable(
                "no updated-source-url configured for identity rotation".to_string(),
            )
        })?;

        let document = self.fetch_document(&url).await?;

        for surface in SearchSurface::ALL {
            if !target.includes(surface) {
                continue;
            }

            let value = match self.override_for(surface) {
                Some(user_value) => user_value.to_string(),
                None => document.get(surface).to_string(),
            };
            self.headers.set(surface, value, IdentitySource::Updated);
        }

        tracing::info!("Rotated {} identity", target);
        Ok(())
    }
}

/// Builds the stable identities from configuration, applying user overrides
fn stable_from_config(config: &IdentityConfig) -> IdentityHeaders {
    IdentityHeaders::new(
        config
            .desktop_override
            .clone()
            .unwrap_or_else(|| config.desktop_user_agent.clone()),
        config
            .mobile_override
            .clone()
            .unwrap_or_else(|| config.mobile_user_agent.clone()),
    )
}
