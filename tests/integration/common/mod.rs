//! Test doubles shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use search_quest::config::{DeveloperConfig, SearchConfig};
use search_quest::identity::{IdentityHeaders, IdentityProvider, IdentitySource, RotationTarget};
use search_quest::quest::{DeveloperNotice, Notifier, QuestEngine};
use search_quest::state::{QuestJobStatus, SearchSurface};
use search_quest::status::{RemoteStatus, StatusSummary, SurfaceStatus};
use search_quest::trends::TrendSource;
use search_quest::{QuestError, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) TestDesktop";
pub const MOBILE_UA: &str = "Mozilla/5.0 (Linux; Android 14) TestMobile";

/// Surface that still needs `required` searches
pub fn pending(progress: u32, required: u32) -> SurfaceStatus {
    SurfaceStatus {
        progress,
        required_count: required,
        completed: false,
        valid_and_completed: false,
    }
}

/// Surface whose search quest is finished
pub fn done(progress: u32) -> SurfaceStatus {
    SurfaceStatus {
        progress,
        required_count: 0,
        completed: true,
        valid_and_completed: true,
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    pub desktop: SurfaceStatus,
    pub mobile: SurfaceStatus,
    pub valid: bool,
    pub completed: bool,
}

impl Snapshot {
    pub fn new(desktop: SurfaceStatus, mobile: SurfaceStatus) -> Self {
        Self {
            desktop,
            mobile,
            valid: true,
            completed: false,
        }
    }

    pub fn invalid(mut self) -> Self {
        self.valid = false;
        self
    }

    pub fn all_completed(mut self) -> Self {
        self.completed = true;
        self
    }
}

/// Remote status that replays a script of snapshots, one per update
///
/// Once the script runs out the last snapshot stays in place.
pub struct ScriptedStatus {
    current: Snapshot,
    script: VecDeque<Snapshot>,
    job_status: QuestJobStatus,
    fail_updates: bool,
    pub updates: Arc<AtomicUsize>,
}

impl ScriptedStatus {
    pub fn new(initial: Snapshot, script: Vec<Snapshot>) -> Self {
        Self {
            current: initial,
            script: script.into(),
            job_status: QuestJobStatus::None,
            fail_updates: false,
            updates: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_job_status(mut self, job_status: QuestJobStatus) -> Self {
        self.job_status = job_status;
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail_updates = true;
        self
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteStatus for ScriptedStatus {
    fn job_status(&self) -> QuestJobStatus {
        self.job_status
    }

    fn surface(&self, surface: SearchSurface) -> SurfaceStatus {
        match surface {
            SearchSurface::Desktop => self.current.desktop,
            SearchSurface::Mobile => self.current.mobile,
        }
    }

    fn summary(&self) -> StatusSummary {
        StatusSummary {
            completed: self.current.completed,
            valid: self.current.valid,
        }
    }

    async fn update(&mut self) -> Result<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if self.fail_updates {
            return Err(QuestError::Status("scripted failure".to_string()));
        }
        if let Some(next) = self.script.pop_front() {
            self.current = next;
        }
        Ok(())
    }
}

/// Identity provider that records rotations and suffixes rotated values
pub struct StubIdentity {
    headers: IdentityHeaders,
    fail_acquire: bool,
    pub rotations: Arc<Mutex<Vec<RotationTarget>>>,
}

impl StubIdentity {
    pub fn new(desktop_updated: bool, mobile_updated: bool) -> Self {
        let mut headers = IdentityHeaders::new(DESKTOP_UA, MOBILE_UA);
        if desktop_updated {
            headers.desktop_source = IdentitySource::Updated;
        }
        if mobile_updated {
            headers.mobile_source = IdentitySource::Updated;
        }
        Self {
            headers,
            fail_acquire: false,
            rotations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn unavailable(mut self) -> Self {
        self.fail_acquire = true;
        self
    }
}

#[async_trait]
impl IdentityProvider for StubIdentity {
    async fn acquire(&mut self) -> Result<IdentityHeaders> {
        if self.fail_acquire {
            return Err(QuestError::IdentityUnavailable(
                "identity source unreachable".to_string(),
            ));
        }
        Ok(self.headers.clone())
    }

    fn current(&self) -> &IdentityHeaders {
        &self.headers
    }

    async fn rotate(&mut self, target: RotationTarget) -> Result<()> {
        self.rotations.lock().unwrap().push(target);
        for surface in SearchSurface::ALL {
            if target.includes(surface) {
                let value = format!("{}-rotated", self.headers.user_agent(surface));
                self.headers.set(surface, value, IdentitySource::Updated);
            }
        }
        Ok(())
    }
}

/// Trend source returning one fixed term per surface
pub struct FixedTrends {
    fail_refresh: bool,
    pub resets: Arc<AtomicUsize>,
}

impl FixedTrends {
    pub fn new() -> Self {
        Self {
            fail_refresh: false,
            resets: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn unavailable(mut self) -> Self {
        self.fail_refresh = true;
        self
    }
}

#[async_trait]
impl TrendSource for FixedTrends {
    async fn refresh(&mut self) -> Result<()> {
        if self.fail_refresh {
            return Err(QuestError::Trends("no search terms available".to_string()));
        }
        Ok(())
    }

    fn next_word(&mut self, surface: SearchSurface) -> String {
        format!("{} weather today", surface)
    }

    fn reset(&mut self) {
        self.resets.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notices: Arc<Mutex<Vec<DeveloperNotice>>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &DeveloperNotice) {
        self.notices.lock().unwrap().push(*notice);
    }
}

/// Handles into the collaborators of an engine built by `build_engine`
pub struct Probes {
    pub rotations: Arc<Mutex<Vec<RotationTarget>>>,
    pub notices: Arc<Mutex<Vec<DeveloperNotice>>>,
    pub trend_resets: Arc<AtomicUsize>,
}

impl Probes {
    pub fn rotations(&self) -> Vec<RotationTarget> {
        self.rotations.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<DeveloperNotice> {
        self.notices.lock().unwrap().clone()
    }
}

pub fn all_notices() -> DeveloperConfig {
    DeveloperConfig {
        notify_stable_identity_outdated: true,
        notify_updated_identity_outdated: true,
    }
}

/// Builds an engine against `base_url` with no pause between searches
pub fn build_engine(
    base_url: &str,
    identity: StubIdentity,
    developer: DeveloperConfig,
) -> (QuestEngine, Probes) {
    build_engine_with_trends(base_url, identity, FixedTrends::new(), developer)
}

pub fn build_engine_with_trends(
    base_url: &str,
    identity: StubIdentity,
    trends: FixedTrends,
    developer: DeveloperConfig,
) -> (QuestEngine, Probes) {
    let notifier = RecordingNotifier::default();
    let probes = Probes {
        rotations: identity.rotations.clone(),
        notices: notifier.notices.clone(),
        trend_resets: trends.resets.clone(),
    };

    let engine = QuestEngine::new(
        SearchConfig {
            base_url: base_url.to_string(),
            min_delay_ms: 0,
            max_delay_ms: 0,
        },
        developer,
        Box::new(trends),
        Box::new(identity),
        Box::new(notifier),
    )
    .expect("Failed to build engine");

    (engine, probes)
}
