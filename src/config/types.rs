use serde::Deserialize;

/// Main configuration structure for Search-Quest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    pub identity: IdentityConfig,
    pub status: StatusConfig,
    #[serde(default)]
    pub trends: TrendsConfig,
    #[serde(default)]
    pub driver: DriverConfig,
    #[serde(default)]
    pub developer: DeveloperConfig,
}

/// Search request configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Scheme and host of the search engine (e.g., "https://www.bing.com")
    #[serde(rename = "base-url", default = "default_base_url")]
    pub base_url: String,

    /// Lower bound of the pause after each credited search (milliseconds, inclusive)
    #[serde(rename = "min-delay-ms", default = "default_min_delay_ms")]
    pub min_delay_ms: u64,

    /// Upper bound of the pause after each credited search (milliseconds, inclusive)
    #[serde(rename = "max-delay-ms", default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Identity (User-Agent) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Stable desktop User-Agent used until a rotation happens
    #[serde(rename = "desktop-user-agent")]
    pub desktop_user_agent: String,

    /// Stable mobile User-Agent used until a rotation happens
    #[serde(rename = "mobile-user-agent")]
    pub mobile_user_agent: String,

    /// Optional JSON document with the current stable identities
    #[serde(rename = "stable-source-url", default)]
    pub stable_source_url: Option<String>,

    /// Optional JSON document with replacement identities
    #[serde(rename = "updated-source-url", default)]
    pub updated_source_url: Option<String>,

    /// User override for the desktop identity
    #[serde(rename = "desktop-override", default)]
    pub desktop_override: Option<String>,

    /// User override for the mobile identity
    #[serde(rename = "mobile-override", default)]
    pub mobile_override: Option<String>,
}

/// Remote status endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StatusConfig {
    /// URL of the JSON status document
    pub endpoint: String,

    /// Points credited per search, used to derive the required search count
    #[serde(rename = "points-per-search", default = "default_points_per_search")]
    pub points_per_search: u32,
}

/// Trend word source configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrendsConfig {
    /// Inline search terms
    #[serde(default)]
    pub words: Vec<String>,

    /// File with one search term per line
    #[serde(rename = "words-file", default)]
    pub words_file: Option<String>,
}

/// Background driver configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DriverConfig {
    /// Minutes between background passes
    #[serde(rename = "interval-minutes", default = "default_interval_minutes")]
    pub interval_minutes: u64,

    /// Seconds to wait between connectivity probes while offline
    #[serde(rename = "online-wait-secs", default = "default_online_wait_secs")]
    pub online_wait_secs: u64,

    /// Delay before the first pass (milliseconds)
    #[serde(rename = "startup-delay-ms", default = "default_startup_delay_ms")]
    pub startup_delay_ms: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            interval_minutes: default_interval_minutes(),
            online_wait_secs: default_online_wait_secs(),
            startup_delay_ms: default_startup_delay_ms(),
        }
    }
}

/// Developer notification switches
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeveloperConfig {
    #[serde(rename = "notify-stable-identity-outdated", default)]
    pub notify_stable_identity_outdated: bool,

    #[serde(rename = "notify-updated-identity-outdated", default)]
    pub notify_updated_identity_outdated: bool,
}

fn default_base_url() -> String {
    "https://www.bing.com".to_string()
}

fn default_min_delay_ms() -> u64 {
    6000
}

fn default_max_delay_ms() -> u64 {
    15000
}

fn default_points_per_search() -> u32 {
    5
}

fn default_interval_minutes() -> u64 {
    120
}

fn default_online_wait_secs() -> u64 {
    60
}

fn default_startup_delay_ms() -> u64 {
    5000
}
