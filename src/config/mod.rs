//! Configuration module for Search-Quest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use search_quest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("quest.toml")).unwrap();
//! println!("Searching against: {}", config.search.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, DeveloperConfig, DriverConfig, IdentityConfig, SearchConfig, StatusConfig,
    TrendsConfig,
};

pub(crate) use validation::validate_search_config;

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
