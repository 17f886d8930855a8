//! Search-Quest: an automated daily search quest runner
//!
//! This crate drives a rewards program's daily search quest by issuing paced
//! desktop and mobile search requests, watching a remote progress endpoint,
//! and rotating the identifying User-Agent headers when searches stop being
//! credited.

pub mod config;
pub mod driver;
pub mod identity;
pub mod quest;
pub mod state;
pub mod status;
pub mod trends;

use thiserror::Error;

/// Main error type for Search-Quest operations
#[derive(Debug, Error)]
pub enum QuestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The search endpoint could not be reached at the network level
    #[error("{context} fetch failed: {source}")]
    FetchFailed {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    /// The search endpoint answered with something other than HTTP 200
    #[error("{context} response anomaly: HTTP {status}")]
    ResponseAnomaly { context: String, status: u16 },

    /// No further identity rotation is possible for the named surface(s)
    #[error("Cannot find a working identity for {target}")]
    IdentityInvalid { target: identity::RotationTarget },

    #[error("Identity source error: {0}")]
    IdentityUnavailable(String),

    #[error("Trend source error: {0}")]
    Trends(String),

    #[error("Remote status error: {0}")]
    Status(String),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuestError {
    /// Returns true if this error means the identity pool is exhausted
    pub fn is_identity_invalid(&self) -> bool {
        matches!(self, Self::IdentityInvalid { .. })
    }

    /// Returns true for transport-level search failures
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::FetchFailed { .. } | Self::ResponseAnomaly { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Search-Quest operations
pub type Result<T> = std::result::Result<T, QuestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use driver::{Driver, StatusIndicator};
pub use identity::{IdentityHeaders, IdentityProvider, IdentitySource, RotationTarget};
pub use quest::{QuestEngine, StallFlag};
pub use state::{QuestJobStatus, SearchSurface};
pub use status::{RemoteStatus, StatusSummary, SurfaceStatus};
pub use trends::TrendSource;
