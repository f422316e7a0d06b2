//! Heading level classification.
//!
//! Two strategies map accepted candidates onto H1..H5:
//!
//! - [`PatternThresholdStrategy`]: structural cues ("Chapter 3", "2.1",
//!   "IV.", ALL CAPS) and fixed size cut points, then size relative to the
//!   document average.
//! - [`RankStrategy`]: the distinct (font size, emphasis) pairs of the
//!   document, largest first, become H1..Hk.
//!
//! [`HybridStrategy`] runs the pattern/threshold rules first and lets the
//! rank map decide only for candidates those rules leave unclassified, so the
//! two never compete for the same candidate.

use crate::config::{LevelStrategyKind, OutlineConfig};
use crate::error::Result;
use crate::layout::font_stats::FontStatistics;
use crate::layout::text_block::TextSpan;
use crate::utils::safe_float_cmp;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural patterns that qualify a line as a heading on their own.
const STRONG_PATTERNS: &[&str] = &[
    r"^(?i:chapter|section|part)\s+(\d+|[IVXLC]+)\b",
    r"^\d+(\.\d+)*\.?\s+\p{Lu}",
    r"^[A-Z][A-Z\s]{4,}$",
    r"^[IVX]+\.\s+\p{Lu}",
    r"^[A-Z]\.\s+\p{Lu}",
];

/// Heading hierarchy level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Top-level heading
    H1,
    /// Section heading
    H2,
    /// Subsection heading
    H3,
    /// Fourth level
    H4,
    /// Fifth level
    H5,
}

impl HeadingLevel {
    /// All levels, most prominent first.
    pub const ALL: [HeadingLevel; 5] = [
        HeadingLevel::H1,
        HeadingLevel::H2,
        HeadingLevel::H3,
        HeadingLevel::H4,
        HeadingLevel::H5,
    ];

    /// Level for a zero-based rank (0 = H1), if within H1..H5.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdf_outline::layout::heading_detector::HeadingLevel;
    ///
    /// assert_eq!(HeadingLevel::from_rank(0), Some(HeadingLevel::H1));
    /// assert_eq!(HeadingLevel::from_rank(4), Some(HeadingLevel::H5));
    /// assert_eq!(HeadingLevel::from_rank(5), None);
    /// ```
    pub fn from_rank(rank: usize) -> Option<Self> {
        Self::ALL.get(rank).copied()
    }

    /// Get the hierarchy level as a number (0 = H1, ..., 4 = H5).
    pub fn hierarchy_level(&self) -> u8 {
        match self {
            HeadingLevel::H1 => 0,
            HeadingLevel::H2 => 1,
            HeadingLevel::H3 => 2,
            HeadingLevel::H4 => 3,
            HeadingLevel::H5 => 4,
        }
    }

    /// Label used in serialized outlines.
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
            HeadingLevel::H4 => "H4",
            HeadingLevel::H5 => "H5",
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A span under consideration, scored by its size relative to the document.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    /// The underlying line
    pub span: &'a TextSpan,
    /// Font size divided by the document average
    pub score: f32,
}

impl<'a> Candidate<'a> {
    /// Score a span against the document statistics.
    pub fn new(span: &'a TextSpan, stats: &FontStatistics) -> Self {
        Self {
            span,
            score: stats.relative_size(span.font_size()),
        }
    }
}

/// Trait for assigning heading levels to a document's candidates.
pub trait LevelStrategy: Send + Sync {
    /// Assign a level (or none) to every candidate, in input order.
    fn assign(
        &self,
        candidates: &[Candidate<'_>],
        stats: &FontStatistics,
    ) -> Vec<Option<HeadingLevel>>;

    /// Return the name of this strategy for debugging.
    fn name(&self) -> &'static str;
}

/// Structural patterns first, then fixed and relative size thresholds.
#[derive(Debug, Clone)]
pub struct PatternThresholdStrategy {
    strong_patterns: Vec<Regex>,
    h1_threshold: f32,
    h2_threshold: f32,
    h3_threshold: f32,
}

impl PatternThresholdStrategy {
    /// Build the strategy, compiling its patterns once.
    pub fn new(config: &OutlineConfig) -> Result<Self> {
        let strong_patterns = STRONG_PATTERNS
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            strong_patterns,
            h1_threshold: config.h1_threshold,
            h2_threshold: config.h2_threshold,
            h3_threshold: config.h3_threshold,
        })
    }

    /// Check whether the text carries a structural heading cue.
    pub fn has_strong_pattern(&self, text: &str) -> bool {
        self.strong_patterns.iter().any(|re| re.is_match(text))
    }

    /// Classify one candidate.
    pub fn classify(&self, candidate: &Candidate<'_>) -> Option<HeadingLevel> {
        let span = candidate.span;
        let size = span.font_size();
        let emphasized = span.is_emphasized();

        if self.has_strong_pattern(span.text()) {
            return if size >= self.h1_threshold || emphasized {
                Some(HeadingLevel::H1)
            } else {
                Some(HeadingLevel::H2)
            };
        }

        if size >= self.h1_threshold {
            return Some(HeadingLevel::H1);
        }
        if size >= self.h2_threshold {
            return Some(HeadingLevel::H2);
        }
        if size >= self.h3_threshold {
            return Some(HeadingLevel::H3);
        }

        let relative = candidate.score;
        if emphasized && relative > 1.1 {
            return if relative > 1.3 {
                Some(HeadingLevel::H2)
            } else {
                Some(HeadingLevel::H3)
            };
        }
        if relative > 1.5 {
            return Some(HeadingLevel::H2);
        }
        if relative > 1.2 {
            return Some(HeadingLevel::H3);
        }

        None
    }
}

impl LevelStrategy for PatternThresholdStrategy {
    fn assign(
        &self,
        candidates: &[Candidate<'_>],
        _stats: &FontStatistics,
    ) -> Vec<Option<HeadingLevel>> {
        candidates.iter().map(|c| self.classify(c)).collect()
    }

    fn name(&self) -> &'static str {
        "PatternThresholdStrategy"
    }
}

/// Formatting signature used by the rank map.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FontKey {
    size: f32,
    emphasized: bool,
}

impl FontKey {
    fn of(span: &TextSpan) -> Self {
        Self {
            size: span.font_size(),
            emphasized: span.is_emphasized(),
        }
    }
}

/// Maps the top distinct (size, emphasis) pairs to H1..Hk.
#[derive(Debug, Clone, Copy)]
pub struct RankStrategy {
    max_levels: usize,
}

impl RankStrategy {
    /// Create a rank strategy handing out at most `max_levels` levels (1..=5).
    pub fn new(max_levels: usize) -> Self {
        Self {
            max_levels: max_levels.clamp(1, HeadingLevel::ALL.len()),
        }
    }

    /// Distinct formatting pairs in rank order with their assigned level.
    ///
    /// Pairs sort by size (descending), then emphasized before plain; the
    /// sort is stable so first-seen order settles anything left.
    fn level_map(&self, candidates: &[Candidate<'_>]) -> Vec<(FontKey, HeadingLevel)> {
        let mut keys: Vec<FontKey> = Vec::new();
        for candidate in candidates {
            let key = FontKey::of(candidate.span);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        keys.sort_by(|a, b| {
            safe_float_cmp(b.size, a.size).then_with(|| b.emphasized.cmp(&a.emphasized))
        });

        keys.into_iter()
            .take(self.max_levels)
            .enumerate()
            .filter_map(|(rank, key)| HeadingLevel::from_rank(rank).map(|level| (key, level)))
            .collect()
    }
}

impl LevelStrategy for RankStrategy {
    fn assign(
        &self,
        candidates: &[Candidate<'_>],
        _stats: &FontStatistics,
    ) -> Vec<Option<HeadingLevel>> {
        let map = self.level_map(candidates);
        candidates
            .iter()
            .map(|c| {
                let key = FontKey::of(c.span);
                map.iter().find(|(k, _)| *k == key).map(|(_, level)| *level)
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "RankStrategy"
    }
}

/// Pattern/threshold rules with the rank map as backstop.
#[derive(Debug, Clone)]
pub struct HybridStrategy {
    primary: PatternThresholdStrategy,
    backstop: RankStrategy,
}

impl HybridStrategy {
    /// Combine a primary and a backstop strategy.
    pub fn new(primary: PatternThresholdStrategy, backstop: RankStrategy) -> Self {
        Self { primary, backstop }
    }
}

impl LevelStrategy for HybridStrategy {
    fn assign(
        &self,
        candidates: &[Candidate<'_>],
        stats: &FontStatistics,
    ) -> Vec<Option<HeadingLevel>> {
        let primary = self.primary.assign(candidates, stats);
        let backstop = self.backstop.assign(candidates, stats);
        primary
            .into_iter()
            .zip(backstop)
            .map(|(p, b)| p.or(b))
            .collect()
    }

    fn name(&self) -> &'static str {
        "HybridStrategy"
    }
}

/// Create the level strategy selected by configuration.
pub fn create_strategy(config: &OutlineConfig) -> Result<Box<dyn LevelStrategy>> {
    Ok(match config.level_strategy {
        LevelStrategyKind::PatternThreshold => Box::new(PatternThresholdStrategy::new(config)?),
        LevelStrategyKind::RankBased => Box::new(RankStrategy::new(config.max_levels)),
        LevelStrategyKind::Hybrid => Box::new(HybridStrategy::new(
            PatternThresholdStrategy::new(config)?,
            RankStrategy::new(config.max_levels),
        )),
    })
}
