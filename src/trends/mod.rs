//! Trend word sources
//!
//! A trend source hands out the next search term for each surface. Terms
//! cycle, so a source never runs dry during a quest.

mod word_list;

pub use word_list::WordListTrendSource;

use crate::state::SearchSurface;
use crate::Result;
use async_trait::async_trait;

/// Capability that yields search terms
#[async_trait]
pub trait TrendSource: Send + Sync {
    /// Loads a fresh set of terms
    ///
    /// Called at the start of every quest run.
    async fn refresh(&mut self) -> Result<()>;

    /// Returns the next term for a surface, advancing that surface's cursor
    fn next_word(&mut self, surface: SearchSurface) -> String;

    /// Forgets loaded terms and cursor positions
    fn reset(&mut self);
}
