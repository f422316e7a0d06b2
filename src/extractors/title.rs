//! Document title selection.
//!
//! An embedded metadata title always wins. Otherwise a [`TitleSelector`]
//! picks a line from the first page that carries text, and the first line of
//! that page is the last resort before [`UNTITLED`].

use crate::config::{OutlineConfig, TitleStrategyKind};
use crate::error::Result;
use crate::extractors::noise_filter::TextNoiseFilter;
use crate::layout::text_block::{normalize_whitespace, TextSpan};
use lazy_static::lazy_static;
use regex::Regex;

/// Title used when a document has no text at all.
pub const UNTITLED: &str = "Untitled Document";

/// Lines closer to the top than this earn the position bonus when scoring.
const TOP_REGION: f32 = 200.0;

lazy_static! {
    /// A bare number is never a title (page numbers, years, report codes)
    static ref RE_PURE_NUMBER: Regex = Regex::new(r"^\d+$").unwrap();
}

/// Where the chosen title came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSource {
    /// Embedded document metadata
    Metadata,
    /// A line picked by the title selector
    Heuristic,
    /// First line of the first page
    FirstLine,
    /// No text at all
    Sentinel,
}

/// The selected title.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleSelection {
    /// Title text
    pub text: String,
    /// Provenance
    pub source: TitleSource,
}

impl TitleSelection {
    fn new(text: impl Into<String>, source: TitleSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }

    /// The sentinel selection for documents without text.
    pub fn untitled() -> Self {
        Self::new(UNTITLED, TitleSource::Sentinel)
    }

    /// Case-folded, whitespace-normalized title used to exclude it from the
    /// outline.
    ///
    /// The sentinel excludes nothing.
    pub fn exclusion_key(&self) -> Option<String> {
        match self.source {
            TitleSource::Sentinel => None,
            _ => Some(normalize_whitespace(&self.text).to_lowercase()),
        }
    }
}

/// Trait for choosing a title from the document's lines.
pub trait TitleSelector: Send + Sync {
    /// Pick a title. `spans` are in reading order.
    fn select(&self, spans: &[TextSpan], metadata_title: Option<&str>) -> TitleSelection;

    /// Return the name of this selector for debugging.
    fn name(&self) -> &'static str;
}

/// Use the metadata title, trimmed, when it is non-empty.
fn from_metadata(metadata_title: Option<&str>) -> Option<TitleSelection> {
    metadata_title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| TitleSelection::new(t, TitleSource::Metadata))
}

/// Lines of the first page that carries any text.
fn first_page(spans: &[TextSpan]) -> &[TextSpan] {
    match spans.first() {
        Some(first) => {
            let end = spans
                .iter()
                .position(|s| s.page() != first.page())
                .unwrap_or(spans.len());
            &spans[..end]
        },
        None => &[],
    }
}

/// True when the text has cased letters and none of them is lower case.
fn is_all_uppercase(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

fn fallback(page: &[TextSpan]) -> TitleSelection {
    match page.first() {
        Some(span) => TitleSelection::new(span.text(), TitleSource::FirstLine),
        None => TitleSelection::untitled(),
    }
}

/// First prominent line among the first few lines of the first page.
#[derive(Debug, Clone)]
pub struct EarlyPageTitle {
    scan_limit: usize,
    min_chars: usize,
    max_chars: usize,
    title_threshold: f32,
    text_filter: TextNoiseFilter,
}

impl EarlyPageTitle {
    /// Build the selector from configuration.
    pub fn new(config: &OutlineConfig) -> Result<Self> {
        Ok(Self {
            scan_limit: config.title_scan_limit,
            min_chars: config.title_min_chars,
            max_chars: config.title_max_chars,
            title_threshold: config.title_threshold,
            text_filter: TextNoiseFilter::new(config)?,
        })
    }

    fn qualifies(&self, span: &TextSpan) -> bool {
        let text = span.text();
        if RE_PURE_NUMBER.is_match(text) || self.text_filter.is_prose(text) {
            return false;
        }
        let len = span.char_count();
        (self.min_chars..=self.max_chars).contains(&len)
            && (span.font_size() >= self.title_threshold
                || span.is_emphasized()
                || is_all_uppercase(text))
    }
}

impl TitleSelector for EarlyPageTitle {
    fn select(&self, spans: &[TextSpan], metadata_title: Option<&str>) -> TitleSelection {
        if let Some(selection) = from_metadata(metadata_title) {
            return selection;
        }

        let page = first_page(spans);
        page.iter()
            .take(self.scan_limit)
            .find(|span| self.qualifies(span))
            .map(|span| TitleSelection::new(span.text(), TitleSource::Heuristic))
            .unwrap_or_else(|| fallback(page))
    }

    fn name(&self) -> &'static str {
        "EarlyPageTitle"
    }
}

/// Highest scoring first-page line: size, emphasis and closeness to the top.
///
/// Only lines longer than the minimum title length compete.
#[derive(Debug, Clone, Copy)]
pub struct ScoredTitle {
    min_chars: usize,
}

impl ScoredTitle {
    /// Build the selector from configuration.
    pub fn new(config: &OutlineConfig) -> Self {
        Self {
            min_chars: config.title_min_chars,
        }
    }

    fn score(span: &TextSpan) -> f32 {
        let mut score = span.font_size();
        if span.is_emphasized() {
            score += 20.0;
        }
        if span.y_position() < TOP_REGION {
            score += 100.0;
        }
        score
    }
}

impl TitleSelector for ScoredTitle {
    fn select(&self, spans: &[TextSpan], metadata_title: Option<&str>) -> TitleSelection {
        if let Some(selection) = from_metadata(metadata_title) {
            return selection;
        }

        let page = first_page(spans);
        let mut best: Option<(&TextSpan, f32)> = None;
        for span in page {
            if span.char_count() <= self.min_chars || RE_PURE_NUMBER.is_match(span.text()) {
                continue;
            }
            let score = Self::score(span);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((span, score));
            }
        }

        best.map(|(span, _)| TitleSelection::new(span.text(), TitleSource::Heuristic))
            .unwrap_or_else(|| fallback(page))
    }

    fn name(&self) -> &'static str {
        "ScoredTitle"
    }
}

/// Create the title selector chosen by configuration.
pub fn create_title_selector(config: &OutlineConfig) -> Result<Box<dyn TitleSelector>> {
    Ok(match config.title_strategy {
        TitleStrategyKind::EarlyPage => Box::new(EarlyPageTitle::new(config)?),
        TitleStrategyKind::Scored => Box::new(ScoredTitle::new(config)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, page: u32, size: f32, bold: bool, y: f32) -> TextSpan {
        TextSpan::new(text, page, size, bold, y).unwrap()
    }

    fn early() -> EarlyPageTitle {
        EarlyPageTitle::new(&OutlineConfig::default()).unwrap()
    }

    #[test]
    fn test_metadata_title_wins() {
        let spans = vec![span("Big Heading", 1, 30.0, true, 10.0)];
        let title = early().select(&spans, Some("  Annual   Report  "));
        assert_eq!(title.text, "Annual   Report");
        assert_eq!(title.source, TitleSource::Metadata);
        assert_eq!(title.exclusion_key().as_deref(), Some("annual report"));
    }

    #[test]
    fn test_blank_metadata_ignored() {
        let spans = vec![span("Big Heading", 1, 30.0, true, 10.0)];
        let title = early().select(&spans, Some("   "));
        assert_eq!(title.text, "Big Heading");
        assert_eq!(title.source, TitleSource::Heuristic);
    }

    #[test]
    fn test_skips_numbers_and_prose() {
        let spans = vec![
            span("2024", 1, 30.0, true, 10.0),
            span("This report was prepared by staff.", 1, 24.0, true, 30.0),
            span("QUARTERLY REVIEW", 1, 11.0, false, 50.0),
        ];
        let title = early().select(&spans, None);
        assert_eq!(title.text, "QUARTERLY REVIEW");
    }

    #[test]
    fn test_requires_prominence() {
        let spans = vec![
            span("Plain Line", 1, 11.0, false, 10.0),
            span("Emphasized Line", 1, 11.0, true, 30.0),
        ];
        let title = early().select(&spans, None);
        assert_eq!(title.text, "Emphasized Line");
    }

    #[test]
    fn test_scan_limit_and_first_page_only() {
        let mut spans: Vec<TextSpan> = (0..12)
            .map(|i| span(&format!("Plain Line {}", i), 1, 11.0, false, i as f32 * 20.0))
            .collect();
        spans.push(span("Late Bold Line", 1, 11.0, true, 400.0));
        spans.push(span("Second Page Title", 2, 30.0, true, 10.0));

        let title = early().select(&spans, None);
        assert_eq!(title.text, "Plain Line 0");
        assert_eq!(title.source, TitleSource::FirstLine);
    }

    #[test]
    fn test_first_page_with_text_is_used() {
        let spans = vec![span("Cover Heading", 2, 24.0, false, 10.0)];
        let title = early().select(&spans, None);
        assert_eq!(title.text, "Cover Heading");
    }

    #[test]
    fn test_empty_document_is_untitled() {
        let title = early().select(&[], None);
        assert_eq!(title.text, UNTITLED);
        assert_eq!(title.source, TitleSource::Sentinel);
        assert_eq!(title.exclusion_key(), None);
    }

    #[test]
    fn test_scored_prefers_large_top_bold() {
        let spans = vec![
            span("Running Header", 1, 9.0, false, 20.0),
            span("Document Title", 1, 22.0, true, 120.0),
            span("Huge Footer Mark", 1, 40.0, false, 760.0),
        ];
        let title = ScoredTitle::new(&OutlineConfig::default()).select(&spans, None);
        assert_eq!(title.text, "Document Title");
    }

    #[test]
    fn test_scored_requires_more_than_min_chars() {
        let spans = vec![
            span("Scope", 1, 30.0, true, 10.0),
            span("Longer Heading", 1, 12.0, false, 300.0),
        ];
        let title = ScoredTitle::new(&OutlineConfig::default()).select(&spans, None);
        assert_eq!(title.text, "Longer Heading");
        assert_eq!(title.source, TitleSource::Heuristic);
    }

    #[test]
    fn test_scored_tie_keeps_earliest() {
        let spans = vec![
            span("First Line", 1, 14.0, false, 20.0),
            span("Second Line", 1, 14.0, false, 40.0),
        ];
        let title = ScoredTitle::new(&OutlineConfig::default()).select(&spans, None);
        assert_eq!(title.text, "First Line");
    }

    #[test]
    fn test_exclusion_key_is_folded() {
        let title = TitleSelection::new("Annual Report", TitleSource::Heuristic);
        assert_eq!(title.exclusion_key().as_deref(), Some("annual report"));
    }

    #[test]
    fn test_create_title_selector() {
        let config = OutlineConfig::default().with_title_strategy(TitleStrategyKind::Scored);
        assert_eq!(create_title_selector(&config).unwrap().name(), "ScoredTitle");
        assert_eq!(
            create_title_selector(&OutlineConfig::default()).unwrap().name(),
            "EarlyPageTitle"
        );
    }
}
