//! Remote daily status
//!
//! The remote status reports how far each surface's search quest has come.
//! The quest engine only reads snapshots and asks for refreshes; it never
//! edits them.

mod http;

pub use http::{HttpRewardStatus, StatusDocument, SurfaceDocument};

use crate::state::{QuestJobStatus, SearchSurface};
use crate::Result;
use async_trait::async_trait;

/// Progress of one surface's search quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceStatus {
    /// Credited progress counter
    pub progress: u32,

    /// Searches still needed to complete the surface
    pub required_count: u32,

    /// Progress reached its maximum
    pub completed: bool,

    /// Snapshot is valid and the surface is complete
    pub valid_and_completed: bool,
}

/// Aggregate flags of a status snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusSummary {
    /// Every daily quest, search or not, is finished
    pub completed: bool,

    /// The snapshot could be trusted
    pub valid: bool,
}

/// Capability reporting the daily quest progress
#[async_trait]
pub trait RemoteStatus: Send + Sync {
    /// Lifecycle of the status updater itself
    fn job_status(&self) -> QuestJobStatus;

    /// Latest snapshot for one surface
    fn surface(&self, surface: SearchSurface) -> SurfaceStatus;

    /// Aggregate flags of the latest snapshot
    fn summary(&self) -> StatusSummary;

    /// Both surfaces finished their search quests
    fn is_search_completed(&self) -> bool {
        self.surface(SearchSurface::Desktop).completed
            && self.surface(SearchSurface::Mobile).completed
    }

    /// Fetches a fresh snapshot
    async fn update(&mut self) -> Result<()>;
}
