use crate::config::StatusConfig;
use crate::state::{QuestJobStatus, SearchSurface};
use crate::status::{RemoteStatus, StatusSummary, SurfaceStatus};
use crate::{QuestError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Per-surface section of the status document
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct SurfaceDocument {
    pub progress: u32,
    pub max: u32,
}

/// JSON document served by the status endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusDocument {
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub completed: bool,
    pub desktop: SurfaceDocument,
    pub mobile: SurfaceDocument,
}

/// Remote status fetched from a JSON endpoint
///
/// Until the first successful update the snapshot is empty and invalid.
pub struct HttpRewardStatus {
    client: Client,
    config: StatusConfig,
    document: StatusDocument,
    job_status: QuestJobStatus,
}

impl HttpRewardStatus {
    pub fn new(config: StatusConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| QuestError::Status(e.to_string()))?;

        Ok(Self {
            client,
            config,
            document: StatusDocument::default(),
            job_status: QuestJobStatus::None,
        })
    }

    async fn fetch(&self) -> Result<StatusDocument> {
        let url = &self.config.endpoint;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| QuestError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuestError::Status(format!(
                "{} returned HTTP {}",
                url,
                status.as_u16()
            )));
        }

        response.json().await.map_err(|source| QuestError::Http {
            url: url.clone(),
            source,
        })
    }
}

#[async_trait]
impl RemoteStatus for HttpRewardStatus {
    fn job_status(&self) -> QuestJobStatus {
        self.job_status
    }

    fn surface(&self, surface: SearchSurface) -> SurfaceStatus {
        let section = match surface {
            SearchSurface::Desktop => self.document.desktop,
            SearchSurface::Mobile => self.document.mobile,
        };
        surface_status(section, self.document.valid, self.config.points_per_search)
    }

    fn summary(&self) -> StatusSummary {
        StatusSummary {
            completed: self.document.completed,
            valid: self.document.valid,
        }
    }

    async fn update(&mut self) -> Result<()> {
        self.job_status = QuestJobStatus::Busy;

        match self.fetch().await {
            Ok(document) => {
                tracing::debug!(
                    "Status: desktop {}/{}, mobile {}/{}, valid={}",
                    document.desktop.progress,
                    document.desktop.max,
                    document.mobile.progress,
                    document.mobile.max,
                    document.valid
                );
                self.document = document;
                self.job_status = QuestJobStatus::Done;
                Ok(())
            }
            Err(e) => {
                self.job_status = QuestJobStatus::Error;
                Err(e)
            }
        }
    }
}

/// Derives a surface snapshot from its document section
///
/// The required count rounds up so a partial search's worth of points still
/// asks for one more search.
fn surface_status(section: SurfaceDocument, valid: bool, points_per_search: u32) -> SurfaceStatus {
    let remaining = section.max.saturating_sub(section.progress);
    let completed = remaining == 0;

    SurfaceStatus {
        progress: section.progress,
        required_count: remaining.div_ceil(points_per_search.max(1)),
        completed,
        valid_and_completed: valid && completed,
    }
}
