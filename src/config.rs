//! Configuration for outline extraction.
//!
//! All thresholds and word lists live in one immutable [`OutlineConfig`] that
//! is handed to the engine at construction. Nothing is read from globals.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Words that indicate running prose rather than a label.
const DEFAULT_STOPWORDS: &[&str] = &[
    "the", "and", "that", "this", "with", "from", "for", "was", "are", "have", "has", "but",
    "also", "which", "their", "there", "they", "will", "would", "could", "should", "been",
    "being", "does", "did", "can", "may", "might", "must", "shall", "through", "during",
    "before", "after", "above", "below", "between", "among", "within", "without",
];

/// Font name fragments that mark a glyph as emphasized.
const DEFAULT_EMPHASIS_MARKERS: &[&str] = &["bold", "black", "italic"];

/// Which level classifier drives heading assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelStrategyKind {
    /// Structural patterns and size thresholds first, font ranking as backstop
    #[default]
    Hybrid,
    /// Structural patterns and size thresholds only
    PatternThreshold,
    /// Top distinct (size, emphasis) pairs map to H1..Hk
    RankBased,
}

/// How the document title is picked when metadata carries none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleStrategyKind {
    /// First prominent line among the first few lines of the first page
    #[default]
    EarlyPage,
    /// Highest scoring first-page line (size, emphasis, proximity to top)
    Scored,
}

/// Line assembly parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    /// Decimal places kept when quantizing glyph y positions into lines
    pub y_precision: u32,
    /// Join consecutive lines that look like one wrapped heading
    pub merge_wrapped_lines: bool,
    /// Maximum size difference (points) for two lines to be merged
    pub merge_size_tolerance: f32,
    /// Case-insensitive font name fragments that mark emphasis
    pub emphasis_markers: Vec<String>,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            y_precision: 1,
            merge_wrapped_lines: false,
            merge_size_tolerance: 0.5,
            emphasis_markers: DEFAULT_EMPHASIS_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

/// Outline extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Font size at or above which an early line qualifies as the title
    pub title_threshold: f32,
    /// Font size at or above which a candidate is H1
    pub h1_threshold: f32,
    /// Font size at or above which a candidate is H2
    pub h2_threshold: f32,
    /// Font size at or above which a candidate is H3
    pub h3_threshold: f32,
    /// Lower-cased function words used for the prose ratio test
    pub stopwords: BTreeSet<String>,
    /// Number of heading levels the rank-based classifier hands out (1..=5)
    pub max_levels: usize,
    /// Minimum heading length in characters
    pub min_chars: usize,
    /// Maximum heading length in characters
    pub max_chars: usize,
    /// Maximum number of words in a heading
    pub max_words: usize,
    /// Stopword share above which a line is treated as prose
    pub stopword_ratio: f32,
    /// Candidates smaller than this fraction of the average size are dropped
    pub min_relative_size: f32,
    /// Number of first-page lines examined for the title
    pub title_scan_limit: usize,
    /// Minimum title length in characters
    pub title_min_chars: usize,
    /// Maximum title length in characters
    pub title_max_chars: usize,
    /// Level classifier selection
    pub level_strategy: LevelStrategyKind,
    /// Title selector selection
    pub title_strategy: TitleStrategyKind,
    /// Line assembly parameters
    pub lines: LineConfig,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            title_threshold: 20.0,
            h1_threshold: 18.0,
            h2_threshold: 16.0,
            h3_threshold: 14.0,
            stopwords: DEFAULT_STOPWORDS.iter().map(|w| w.to_string()).collect(),
            max_levels: 3,
            min_chars: 3,
            max_chars: 150,
            max_words: 10,
            stopword_ratio: 0.3,
            min_relative_size: 0.8,
            title_scan_limit: 10,
            title_min_chars: 5,
            title_max_chars: 100,
            level_strategy: LevelStrategyKind::Hybrid,
            title_strategy: TitleStrategyKind::EarlyPage,
            lines: LineConfig::default(),
        }
    }
}

impl OutlineConfig {
    /// Create a configuration with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset that classifies by structural patterns and size thresholds only.
    pub fn pattern_threshold() -> Self {
        Self::default().with_level_strategy(LevelStrategyKind::PatternThreshold)
    }

    /// Preset that maps the top three (size, emphasis) pairs to H1..H3.
    pub fn rank_based() -> Self {
        Self::default()
            .with_level_strategy(LevelStrategyKind::RankBased)
            .with_max_levels(3)
    }

    /// Set the level classifier.
    pub fn with_level_strategy(mut self, kind: LevelStrategyKind) -> Self {
        self.level_strategy = kind;
        self
    }

    /// Set the title selector.
    pub fn with_title_strategy(mut self, kind: TitleStrategyKind) -> Self {
        self.title_strategy = kind;
        self
    }

    /// Set the number of rank-based levels.
    pub fn with_max_levels(mut self, max_levels: usize) -> Self {
        self.max_levels = max_levels;
        self
    }

    /// Set the title, H1, H2 and H3 size thresholds.
    pub fn with_thresholds(mut self, title: f32, h1: f32, h2: f32, h3: f32) -> Self {
        self.title_threshold = title;
        self.h1_threshold = h1;
        self.h2_threshold = h2;
        self.h3_threshold = h3;
        self
    }

    /// Replace the stopword list.
    pub fn with_stopwords<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stopwords = words.into_iter().map(|w| w.into().to_lowercase()).collect();
        self
    }

    /// Enable or disable merging of wrapped heading lines.
    pub fn with_merge_wrapped_lines(mut self, enable: bool) -> Self {
        self.lines.merge_wrapped_lines = enable;
        self
    }

    /// Check whether a word is a stopword, ignoring case.
    pub fn is_stopword(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        self.stopwords.iter().any(|w| w.to_lowercase() == word)
    }

    /// Check that the configuration is internally consistent.
    pub fn validate(&self) -> Result<()> {
        if !(1..=5).contains(&self.max_levels) {
            return Err(Error::InvalidConfig(format!(
                "max_levels must be between 1 and 5, got {}",
                self.max_levels
            )));
        }

        let thresholds = [
            self.title_threshold,
            self.h1_threshold,
            self.h2_threshold,
            self.h3_threshold,
        ];
        if thresholds.iter().any(|t| !t.is_finite() || *t <= 0.0) {
            return Err(Error::InvalidConfig(
                "font size thresholds must be positive".to_string(),
            ));
        }
        if thresholds.windows(2).any(|w| w[0] < w[1]) {
            return Err(Error::InvalidConfig(
                "thresholds must satisfy title >= h1 >= h2 >= h3".to_string(),
            ));
        }

        if self.min_chars == 0 || self.min_chars > self.max_chars {
            return Err(Error::InvalidConfig(format!(
                "invalid heading length range {}..={}",
                self.min_chars, self.max_chars
            )));
        }
        if self.title_min_chars > self.title_max_chars {
            return Err(Error::InvalidConfig(format!(
                "invalid title length range {}..={}",
                self.title_min_chars, self.title_max_chars
            )));
        }
        if self.max_words == 0 || self.title_scan_limit == 0 {
            return Err(Error::InvalidConfig(
                "max_words and title_scan_limit must be at least 1".to_string(),
            ));
        }
        if !(self.stopword_ratio > 0.0 && self.stopword_ratio <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "stopword_ratio must be in (0, 1], got {}",
                self.stopword_ratio
            )));
        }
        if !self.min_relative_size.is_finite() || self.min_relative_size < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "min_relative_size must be non-negative, got {}",
                self.min_relative_size
            )));
        }
        if self.lines.y_precision > 6 {
            return Err(Error::InvalidConfig(format!(
                "y_precision above 6 decimals is meaningless, got {}",
                self.lines.y_precision
            )));
        }
        if !self.lines.merge_size_tolerance.is_finite() || self.lines.merge_size_tolerance < 0.0 {
            return Err(Error::InvalidConfig(
                "merge_size_tolerance must be non-negative".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(OutlineConfig::default().validate().is_ok());
        assert!(OutlineConfig::pattern_threshold().validate().is_ok());
        assert!(OutlineConfig::rank_based().validate().is_ok());
    }

    #[test]
    fn test_presets_select_strategy() {
        assert_eq!(
            OutlineConfig::pattern_threshold().level_strategy,
            LevelStrategyKind::PatternThreshold
        );
        assert_eq!(OutlineConfig::rank_based().level_strategy, LevelStrategyKind::RankBased);
        assert_eq!(OutlineConfig::default().level_strategy, LevelStrategyKind::Hybrid);
    }

    #[test]
    fn test_max_levels_out_of_range() {
        assert!(OutlineConfig::default().with_max_levels(0).validate().is_err());
        assert!(OutlineConfig::default().with_max_levels(6).validate().is_err());
        assert!(OutlineConfig::default().with_max_levels(5).validate().is_ok());
    }

    #[test]
    fn test_thresholds_must_descend() {
        let config = OutlineConfig::default().with_thresholds(20.0, 14.0, 16.0, 12.0);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_stopwords_are_lowercased() {
        let config = OutlineConfig::default().with_stopwords(["The", "OF"]);
        assert!(config.is_stopword("the"));
        assert!(config.is_stopword("of"));
        assert!(!config.is_stopword("and"));
    }

    #[test]
    fn test_partial_json_overlays_defaults() {
        let config: OutlineConfig =
            serde_json::from_str(r#"{"max_levels": 5, "level_strategy": "rank_based"}"#).unwrap();
        assert_eq!(config.max_levels, 5);
        assert_eq!(config.level_strategy, LevelStrategyKind::RankBased);
        assert_eq!(config.h1_threshold, 18.0);
        assert!(config.is_stopword("between"));
        assert_eq!(config.lines.y_precision, 1);
    }
}
