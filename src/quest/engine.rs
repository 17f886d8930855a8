//! Quest engine - search loop orchestration
//!
//! The engine runs desktop and mobile search bursts until the remote status
//! reports both search quests complete. After every burst pair it refreshes
//! the status and compares progress; a surface whose progress did not move
//! gets its identity rotated, and a surface that stalls again on a rotated
//! identity ends the run with `QuestError::IdentityInvalid`.

use crate::config::{validate_search_config, Config, DeveloperConfig, SearchConfig};
use crate::identity::{HttpIdentityProvider, IdentityHeaders, IdentityProvider, RotationTarget};
use crate::quest::notify::{DeveloperNotice, Notifier, TracingNotifier};
use crate::quest::pipeline::{HeaderOverride, SearchPipeline};
use crate::quest::request::{build_search_url, random_delay_ms};
use crate::quest::stall::StallFlag;
use crate::state::{QuestJobStatus, SearchSurface};
use crate::status::RemoteStatus;
use crate::trends::{TrendSource, WordListTrendSource};
use crate::{QuestError, Result};
use std::time::Duration;

/// Search quest state machine
pub struct QuestEngine {
    search: SearchConfig,
    developer: DeveloperConfig,
    pipeline: SearchPipeline,
    trends: Box<dyn TrendSource>,
    identity: Box<dyn IdentityProvider>,
    notifier: Box<dyn Notifier>,
    job_status: QuestJobStatus,
    desktop_count: u32,
    mobile_count: u32,
    current_surface: Option<SearchSurface>,
}

impl QuestEngine {
    /// Creates an engine from explicit collaborators
    ///
    /// # Arguments
    ///
    /// * `search` - Search endpoint and pacing
    /// * `developer` - Developer notification switches
    /// * `trends` - Source of search terms
    /// * `identity` - Source of User-Agent identities
    /// * `notifier` - Sink for developer notices
    pub fn new(
        search: SearchConfig,
        developer: DeveloperConfig,
        trends: Box<dyn TrendSource>,
        identity: Box<dyn IdentityProvider>,
        notifier: Box<dyn Notifier>,
    ) -> Result<Self> {
        validate_search_config(&search)?;
        let pipeline = SearchPipeline::new(&search.base_url)?;

        Ok(Self {
            search,
            developer,
            pipeline,
            trends,
            identity,
            notifier,
            job_status: QuestJobStatus::None,
            desktop_count: 0,
            mobile_count: 0,
            current_surface: None,
        })
    }

    /// Creates an engine wired with the shipped collaborators
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.search.clone(),
            config.developer.clone(),
            Box::new(WordListTrendSource::new(&config.trends)),
            Box::new(HttpIdentityProvider::new(config.identity.clone())?),
            Box::new(TracingNotifier),
        )
    }

    pub fn job_status(&self) -> QuestJobStatus {
        self.job_status
    }

    /// Surface whose header override is installed, if any
    pub fn current_surface(&self) -> Option<SearchSurface> {
        self.current_surface
    }

    pub fn header_override(&self) -> Option<&HeaderOverride> {
        self.pipeline.installed()
    }

    /// Searches issued so far in the running burst of a surface
    pub fn search_count(&self, surface: SearchSurface) -> u32 {
        match surface {
            SearchSurface::Desktop => self.desktop_count,
            SearchSurface::Mobile => self.mobile_count,
        }
    }

    /// Identities currently in use
    pub fn identity(&self) -> &IdentityHeaders {
        self.identity.current()
    }

    pub fn trends_mut(&mut self) -> &mut dyn TrendSource {
        self.trends.as_mut()
    }

    /// Returns the engine to its idle state
    ///
    /// Must not be called while a run is in progress.
    pub fn reset(&mut self) {
        self.job_status = QuestJobStatus::None;
        self.desktop_count = 0;
        self.mobile_count = 0;
        self.current_surface = None;
        self.remove_header_override();
    }

    /// Runs the search quest until the status reports completion
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The loop ended. Job status is `Done` when both search
    ///   quests completed, or `Error` when the status turned invalid.
    /// * `Err(QuestError)` - Transport failure, identity exhaustion, or a
    ///   collaborator failure. Job status is `Error`.
    pub async fn do_work(&mut self, status: &mut dyn RemoteStatus) -> Result<()> {
        self.job_status = QuestJobStatus::Busy;

        match self.run(status).await {
            Ok(()) => {
                if self.job_status == QuestJobStatus::Busy {
                    self.job_status = QuestJobStatus::Done;
                }
                Ok(())
            }
            Err(e) => {
                self.job_status = QuestJobStatus::Error;
                self.quit_search_cleanup();
                if e.is_identity_invalid() {
                    self.notify(DeveloperNotice::UpdatedIdentityOutdated);
                }
                Err(e)
            }
        }
    }

    async fn run(&mut self, status: &mut dyn RemoteStatus) -> Result<()> {
        let headers = self.identity.acquire().await?;
        tracing::debug!(
            "Identities: desktop ({}) {}, mobile ({}) {}",
            headers.desktop_source,
            headers.desktop,
            headers.mobile_source,
            headers.mobile
        );
        self.trends.refresh().await?;

        self.work_loop(status).await
    }

    async fn work_loop(&mut self, status: &mut dyn RemoteStatus) -> Result<()> {
        loop {
            if status.is_search_completed() {
                tracing::info!("Search quests completed");
                return Ok(());
            }

            if status.job_status().is_error() || !status.summary().valid {
                tracing::warn!("Remote status is invalid, stopping search quests");
                self.job_status = QuestJobStatus::Error;
                return Ok(());
            }

            self.start_search_quests(status).await?;

            let flag = self.is_search_successful(status).await?;
            if flag.is_stalled() {
                self.recover_identity(flag).await?;
            }
        }
    }

    async fn start_search_quests(&mut self, status: &dyn RemoteStatus) -> Result<()> {
        for surface in SearchSurface::ALL {
            self.do_search(surface, status).await?;
        }
        self.quit_search_cleanup();
        Ok(())
    }

    /// Refreshes the status and reports which surfaces did not progress
    ///
    /// Progress is captured from the snapshot as it stands before the
    /// refresh, so a credit that lands late shows up one iteration later.
    pub async fn is_search_successful(&self, status: &mut dyn RemoteStatus) -> Result<StallFlag> {
        let desktop_before = status.surface(SearchSurface::Desktop).progress;
        let mobile_before = status.surface(SearchSurface::Mobile).progress;

        status.update().await?;

        let flag = StallFlag::evaluate(
            desktop_before,
            mobile_before,
            &status.surface(SearchSurface::Desktop),
            &status.surface(SearchSurface::Mobile),
        );
        tracing::debug!("Stall flag: {}", flag);
        Ok(flag)
    }

    async fn recover_identity(&mut self, flag: StallFlag) -> Result<()> {
        let Some(target) = flag.rotation_target() else {
            return Ok(());
        };

        let headers = self.identity.current();
        let exhausted = match target {
            RotationTarget::Both => {
                headers.is_updated(SearchSurface::Desktop)
                    && headers.is_updated(SearchSurface::Mobile)
            }
            RotationTarget::Desktop => headers.is_updated(SearchSurface::Desktop),
            RotationTarget::Mobile => headers.is_updated(SearchSurface::Mobile),
        };

        if exhausted {
            return Err(QuestError::IdentityInvalid { target });
        }

        tracing::warn!("Searches on {} are not credited, rotating identity", target);
        self.identity.rotate(target).await?;
        self.notify(DeveloperNotice::StableIdentityOutdated(target));
        Ok(())
    }

    async fn do_search(&mut self, surface: SearchSurface, status: &dyn RemoteStatus) -> Result<()> {
        self.set_search_count(surface, 0);
        if self.current_surface != Some(surface) {
            self.prepare_surface(surface);
        }

        self.request_searches(surface, status).await
    }

    fn prepare_surface(&mut self, surface: SearchSurface) {
        self.current_surface = Some(surface);
        self.remove_header_override();
        let user_agent = self.identity.current().user_agent(surface).to_string();
        self.pipeline.install(HeaderOverride {
            surface,
            user_agent,
        });
    }

    /// Issues searches for a surface until its required count is met
    async fn request_searches(
        &mut self,
        surface: SearchSurface,
        status: &dyn RemoteStatus,
    ) -> Result<()> {
        loop {
            if self.search_count(surface) >= status.surface(surface).required_count {
                return Ok(());
            }

            let word = self.trends.next_word(surface);
            let url = build_search_url(&mut rand::rng(), &self.search.base_url, &word);
            tracing::debug!("{} search: {}", surface, url);

            self.pipeline.search(&url).await?;
            self.set_search_count(surface, self.search_count(surface) + 1);

            let delay = random_delay_ms(
                &mut rand::rng(),
                self.search.min_delay_ms,
                self.search.max_delay_ms,
            );
            tracing::debug!("Sleeping for {} sec", delay / 1000);
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }

    fn quit_search_cleanup(&mut self) {
        self.desktop_count = 0;
        self.mobile_count = 0;
        self.current_surface = None;
        self.remove_header_override();
    }

    /// Removes the installed header override; a no-op when none is installed
    pub fn remove_header_override(&mut self) {
        if let Some(removed) = self.pipeline.remove() {
            tracing::debug!("Removed {} header override", removed.surface);
        }
    }

    fn set_search_count(&mut self, surface: SearchSurface, count: u32) {
        match surface {
            SearchSurface::Desktop => self.desktop_count = count,
            SearchSurface::Mobile => self.mobile_count = count,
        }
    }

    fn notify(&self, notice: DeveloperNotice) {
        let enabled = match notice {
            DeveloperNotice::StableIdentityOutdated(_) => {
                self.developer.notify_stable_identity_outdated
            }
            DeveloperNotice::UpdatedIdentityOutdated => {
                self.developer.notify_updated_identity_outdated
            }
        };

        if enabled {
            self.notifier.notify(&notice);
        }
    }
}
