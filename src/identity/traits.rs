//! Identity provider trait and identity header types

use crate::state::SearchSurface;
use crate::Result;
use async_trait::async_trait;
use std::fmt;

/// Where the identity value for a surface came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentitySource {
    /// The stable identity shipped with the configuration or stable source
    Default,
    /// A replacement obtained by rotation
    Updated,
}

impl fmt::Display for IdentitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Updated => write!(f, "updated"),
        }
    }
}

/// Surfaces a rotation request applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationTarget {
    Desktop,
    Mobile,
    Both,
}

impl RotationTarget {
    /// Returns true if the target covers the given surface
    pub fn includes(&self, surface: SearchSurface) -> bool {
        match self {
            Self::Both => true,
            Self::Desktop => surface == SearchSurface::Desktop,
            Self::Mobile => surface == SearchSurface::Mobile,
        }
    }
}

impl fmt::Display for RotationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Desktop => write!(f, "desktop"),
            Self::Mobile => write!(f, "mobile"),
            Self::Both => write!(f, "desktop and mobile"),
        }
    }
}

/// Current identity header values and their provenance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityHeaders {
    pub desktop: String,
    pub mobile: String,
    pub desktop_source: IdentitySource,
    pub mobile_source: IdentitySource,
}

impl IdentityHeaders {
    /// Creates headers with both surfaces at default provenance
    pub fn new(desktop: impl Into<String>, mobile: impl Into<String>) -> Self {
        Self {
            desktop: desktop.into(),
            mobile: mobile.into(),
            desktop_source: IdentitySource::Default,
            mobile_source: IdentitySource::Default,
        }
    }

    /// User-Agent value for a surface
    pub fn user_agent(&self, surface: SearchSurface) -> &str {
        match surface {
            SearchSurface::Desktop => &self.desktop,
            SearchSurface::Mobile => &self.mobile,
        }
    }

    /// Provenance of a surface's value
    pub fn source(&self, surface: SearchSurface) -> IdentitySource {
        match surface {
            SearchSurface::Desktop => self.desktop_source,
            SearchSurface::Mobile => self.mobile_source,
        }
    }

    /// Returns true if the surface already runs on a rotated identity
    pub fn is_updated(&self, surface: SearchSurface) -> bool {
        self.source(surface) == IdentitySource::Updated
    }

    /// Replaces a surface's value and records its provenance
    pub fn set(&mut self, surface: SearchSurface, value: String, source: IdentitySource) {
        match surface {
            SearchSurface::Desktop => {
                self.desktop = value;
                self.desktop_source = source;
            }
            SearchSurface::Mobile => {
                self.mobile = value;
                self.mobile_source = source;
            }
        }
    }
}

/// Capability that supplies and rotates identity headers
///
/// The quest engine never builds identities itself. It reads the current
/// values and asks for a rotation when a surface stops being credited.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Loads the current stable identities
    ///
    /// Called at the start of every quest run.
    async fn acquire(&mut self) -> Result<IdentityHeaders>;

    /// Returns the identities currently in use
    fn current(&self) -> &IdentityHeaders;

    /// Replaces the identities of the targeted surfaces
    ///
    /// Rotated surfaces report `IdentitySource::Updated` afterwards.
    async fn rotate(&mut self, target: RotationTarget) -> Result<()>;
}
