//! Quest module containing the search quest engine
//!
//! This module contains the core quest logic, including:
//! - Search URL construction and request pacing
//! - The outbound search pipeline and its header override
//! - Stall detection between status refreshes
//! - The engine state machine driving bursts and identity recovery

mod engine;
mod notify;
mod pipeline;
mod request;
mod stall;

pub use engine::QuestEngine;
pub use notify::{DeveloperNotice, Notifier, TracingNotifier};
pub use pipeline::{build_search_client, HeaderOverride, SearchPipeline};
pub use request::{
    build_search_url, random_delay_ms, SearchTokens, FORM_CODES, INCLUDE_PROBABILITY, SEARCH_PATH,
};
pub use stall::StallFlag;
