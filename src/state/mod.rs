//! State module for tracking quest progress
//!
//! # Components
//!
//! - `QuestJobStatus`: lifecycle of the quest engine and the status updater
//! - `SearchSurface`: the desktop or mobile surface a search is issued from

mod job_status;
mod surface;

// Re-export main types
pub use job_status::QuestJobStatus;
pub use surface::SearchSurface;
