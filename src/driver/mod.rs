//! Background driver
//!
//! The driver wakes up on a fixed interval and runs one pass:
//! 1. Skip if the quest engine or the status updater is still busy
//! 2. Wait until the network is reachable
//! 3. Reset quest state on a new calendar day
//! 4. Refresh the daily status and run the search quest if it is unfinished
//! 5. Reflect the outcome in the status indicator

mod probe;

pub use probe::{NetworkProbe, TcpProbe};

use crate::config::{Config, DriverConfig};
use crate::quest::QuestEngine;
use crate::state::SearchSurface;
use crate::status::{HttpRewardStatus, RemoteStatus};
use crate::{ConfigError, Result};
use chrono::{Local, NaiveDate};
use std::fmt;
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior};

/// Outward status of the background work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusIndicator {
    /// No pass has run yet
    #[default]
    Idle,
    Busy,
    Done,
    Error,
}

impl fmt::Display for StatusIndicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Busy => "busy",
            Self::Done => "done",
            Self::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// Result of a single driver pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// A previous pass was still running
    Skipped,
    /// The pass ran and left the indicator in this state
    Finished(StatusIndicator),
}

/// Periodic, single-flight runner for the quest engine
pub struct Driver {
    config: DriverConfig,
    engine: QuestEngine,
    status: Box<dyn RemoteStatus>,
    probe: Box<dyn NetworkProbe>,
    indicator: StatusIndicator,
    last_run_day: Option<NaiveDate>,
}

impl Driver {
    pub fn new(
        config: DriverConfig,
        engine: QuestEngine,
        status: Box<dyn RemoteStatus>,
        probe: Box<dyn NetworkProbe>,
    ) -> Self {
        Self {
            config,
            engine,
            status,
            probe,
            indicator: StatusIndicator::Idle,
            last_run_day: None,
        }
    }

    /// Creates a driver wired with the shipped collaborators
    pub fn from_config(config: &Config) -> Result<Self> {
        let engine = QuestEngine::from_config(config)?;
        let status = HttpRewardStatus::new(config.status.clone())?;
        let probe = TcpProbe::for_url(&config.search.base_url, Duration::from_secs(10))
            .ok_or_else(|| {
                ConfigError::InvalidUrl(format!(
                    "cannot probe base-url '{}'",
                    config.search.base_url
                ))
            })?;

        Ok(Self::new(
            config.driver.clone(),
            engine,
            Box::new(status),
            Box::new(probe),
        ))
    }

    pub fn indicator(&self) -> StatusIndicator {
        self.indicator
    }

    pub fn engine(&self) -> &QuestEngine {
        &self.engine
    }

    pub fn status(&self) -> &dyn RemoteStatus {
        self.status.as_ref()
    }

    /// Runs passes until Ctrl-C
    ///
    /// The first pass starts after `startup-delay-ms`, later ones every
    /// `interval-minutes`. A running pass is never interrupted; shutdown is
    /// only observed between passes.
    pub async fn run(&mut self) -> Result<()> {
        tokio::time::sleep(Duration::from_millis(self.config.startup_delay_ms)).await;

        let mut ticker = pass_interval(&self.config);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let outcome = self.run_once().await;
                    tracing::info!("Pass finished: {:?}", outcome);
                }
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutdown requested");
                    return Ok(());
                }
            }
        }
    }

    /// Runs one pass dated today in local time
    pub async fn run_once(&mut self) -> PassOutcome {
        self.run_once_at(Local::now().date_naive()).await
    }

    /// Runs one pass as if it were `today`
    pub async fn run_once_at(&mut self, today: NaiveDate) -> PassOutcome {
        if self.engine.job_status().is_busy() || self.status.job_status().is_busy() {
            tracing::debug!("Previous pass still running, skipping");
            return PassOutcome::Skipped;
        }

        self.wait_till_online().await;

        self.set_indicator(StatusIndicator::Busy);

        if self.is_new_day(today) {
            tracing::info!("New day {}, resetting quest state", today);
            self.engine.reset();
            self.engine.trends_mut().reset();
        }

        self.check_daily_status().await;

        if self.indicator == StatusIndicator::Busy {
            self.set_indicator(StatusIndicator::Done);
        }

        PassOutcome::Finished(self.indicator)
    }

    async fn wait_till_online(&self) {
        let wait = Duration::from_secs(self.config.online_wait_secs);
        while !self.probe.is_online().await {
            tracing::info!("Network unavailable, retrying in {}s", wait.as_secs());
            tokio::time::sleep(wait).await;
        }
    }

    fn is_new_day(&mut self, today: NaiveDate) -> bool {
        let new_day = self.last_run_day != Some(today);
        self.last_run_day = Some(today);
        new_day
    }

    async fn check_daily_status(&mut self) {
        if let Err(e) = self.status.update().await {
            tracing::error!("Daily status update failed: {}", e);
            self.set_indicator(StatusIndicator::Error);
            return;
        }

        if !self.status.summary().valid {
            tracing::warn!("Daily status is invalid");
            self.set_indicator(StatusIndicator::Error);
            return;
        }

        self.do_search_quests().await;
    }

    async fn do_search_quests(&mut self) {
        if self.status.summary().completed {
            tracing::info!("All daily quests already completed");
            return;
        }

        let desktop = self.status.surface(SearchSurface::Desktop);
        let mobile = self.status.surface(SearchSurface::Mobile);
        if desktop.completed && mobile.completed {
            return;
        }

        tracing::info!(
            "Starting search quests: desktop needs {}, mobile needs {}",
            desktop.required_count,
            mobile.required_count
        );

        if let Err(e) = self.engine.do_work(self.status.as_mut()).await {
            tracing::error!("Search quest failed: {}", e);
            self.set_indicator(StatusIndicator::Error);
            return;
        }

        if self.engine.job_status().is_error() {
            self.set_indicator(StatusIndicator::Error);
        }
    }

    fn set_indicator(&mut self, indicator: StatusIndicator) {
        if self.indicator != indicator {
            tracing::info!("Status indicator: {} -> {}", self.indicator, indicator);
            self.indicator = indicator;
        }
    }
}

/// Ticker for background passes
///
/// A pass that overruns the interval pushes the next one back instead of
/// firing the missed ticks in a row.
fn pass_interval(config: &DriverConfig) -> Interval {
    let mut ticker = tokio::time::interval(Duration::from_secs(config.interval_minutes * 60));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}
