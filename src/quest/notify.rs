//! Developer notifications
//!
//! Notices are best effort and only emitted when the matching developer
//! switch is on; the engine checks the switch before calling a notifier.

use crate::identity::RotationTarget;
use std::fmt;

/// A developer-facing notice about identity health
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeveloperNotice {
    /// The stable identity stopped working and was rotated
    StableIdentityOutdated(RotationTarget),
    /// A rotated identity stopped working too
    UpdatedIdentityOutdated,
}

impl DeveloperNotice {
    /// Stable identifier, so a later notice replaces an earlier one
    pub fn id(&self) -> &'static str {
        match self {
            Self::StableIdentityOutdated(_) => "stable_identity_outdated",
            Self::UpdatedIdentityOutdated => "updated_identity_outdated",
        }
    }
}

impl fmt::Display for DeveloperNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StableIdentityOutdated(target) => {
                write!(f, "Stable identity is outdated! Surface: {}", target)
            }
            Self::UpdatedIdentityOutdated => write!(f, "Critical!! Updated identity is outdated!"),
        }
    }
}

/// Capability that delivers developer notices
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &DeveloperNotice);
}

/// Notifier that writes notices to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &DeveloperNotice) {
        match notice {
            DeveloperNotice::StableIdentityOutdated(_) => {
                tracing::warn!(notice = notice.id(), "{}", notice)
            }
            DeveloperNotice::UpdatedIdentityOutdated => {
                tracing::error!(notice = notice.id(), "{}", notice)
            }
        }
    }
}
