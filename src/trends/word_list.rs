use crate::config::TrendsConfig;
use crate::state::SearchSurface;
use crate::trends::TrendSource;
use crate::{QuestError, Result};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use std::path::PathBuf;

/// Trend source built from inline words and an optional words file
///
/// Each refresh reloads the file (one term per line, blank lines and `#`
/// comments skipped), merges the inline words and shuffles the result.
/// Desktop and mobile keep separate cursors; mobile starts halfway through
/// the list so the two surfaces do not search the same term back to back.
pub struct WordListTrendSource {
    inline: Vec<String>,
    words_file: Option<PathBuf>,
    words: Vec<String>,
    desktop_idx: usize,
    mobile_idx: usize,
}

impl WordListTrendSource {
    pub fn new(config: &TrendsConfig) -> Self {
        Self {
            inline: clean_words(config.words.iter().map(String::as_str)),
            words_file: config.words_file.as_ref().map(PathBuf::from),
            words: Vec::new(),
            desktop_idx: 0,
            mobile_idx: 0,
        }
    }

    /// Number of terms loaded by the last refresh
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[async_trait]
impl TrendSource for WordListTrendSource {
    async fn refresh(&mut self) -> Result<()> {
        let mut words = self.inline.clone();

        if let Some(path) = &self.words_file {
            let content = tokio::fs::read_to_string(path).await.map_err(|e| {
                QuestError::Trends(format!("Failed to read {}: {}", path.display(), e))
            })?;
            words.extend(clean_words(content.lines()));
        }

        if words.is_empty() {
            return Err(QuestError::Trends("no search terms available".to_string()));
        }

        words.shuffle(&mut rand::rng());
        tracing::debug!("Loaded {} trend words", words.len());

        self.desktop_idx = 0;
        self.mobile_idx = words.len() / 2;
        self.words = words;
        Ok(())
    }

    fn next_word(&mut self, surface: SearchSurface) -> String {
        if self.words.is_empty() {
            // Unrefreshed source: fall back to the inline list in order
            return self
                .inline
                .first()
                .cloned()
                .unwrap_or_else(|| "news".to_string());
        }

        let idx = match surface {
            SearchSurface::Desktop => &mut self.desktop_idx,
            SearchSurface::Mobile => &mut self.mobile_idx,
        };
        let word = self.words[*idx % self.words.len()].clone();
        *idx = (*idx + 1) % self.words.len();
        word
    }

    fn reset(&mut self) {
        self.words.clear();
        self.desktop_idx = 0;
        self.mobile_idx = 0;
    }
}

fn clean_words<'a>(raw: impl Iterator<Item = &'a str>) -> Vec<String> {
    raw.map(str::trim)
        .filter(|w| !w.is_empty() && !w.starts_with('#'))
        .map(str::to_string)
        .collect()
}
