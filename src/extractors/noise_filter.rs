//! Noise filtering for heading candidates.
//!
//! A line is noise when it is page furniture (page numbers, counters, dates,
//! links), running prose, or an extraction artifact. The text filter looks at
//! the text only; size-relative rejection is a separate step because it needs
//! document statistics.

use crate::config::OutlineConfig;
use crate::error::Result;
use crate::layout::font_stats::FontStatistics;
use crate::layout::text_block::TextSpan;
use regex::Regex;
use std::collections::BTreeSet;

/// Page furniture patterns, matched against the trimmed text.
const FURNITURE_PATTERNS: &[&str] = &[
    r"^\d+$",
    r"^[\d\s\-.()]+$",
    r"(?i)^(page|p\.)\s*\d+",
    r"(?i)^\d+\s+of\s+\d+$",
];

const DATE_PATTERNS: &[&str] = &[
    r"^(19|20)\d{2}$",
    r"^\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4}$",
    r"^\d{4}-\d{2}-\d{2}$",
    r"(?i)^(jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?\s+(\d{1,2},?\s+)?\d{4}$",
    r"(?i)^\d{1,2}\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec)[a-z]*\.?,?\s+\d{4}$",
];

const LINK_PATTERNS: &[&str] = &[
    r"(?i)(^www\.|https?://|ftp://|mailto:)",
    r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}",
];

const AUXILIARY_VERBS: &str = r"(?i)\b(is|are|was|were|has|have|had|will|would|could|should)\b";

/// Why a line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoiseReason {
    /// Shorter than the minimum heading length
    TooShort,
    /// Longer than the maximum heading length
    TooLong,
    /// More words than a heading carries
    TooManyWords,
    /// Page number, page counter or bare number run
    PageFurniture,
    /// Date or year
    Date,
    /// URL or email address
    Link,
    /// Sentence punctuation, function words or auxiliary verbs
    Prose,
    /// No upper-case letters at all
    Lowercase,
    /// Repeated characters or words left by a broken extraction
    Garbled,
    /// Font size too small relative to the document
    TooSmall,
}

/// A predicate that rejects spans which cannot be headings.
pub trait NoiseFilter: Send + Sync {
    /// Return true if the span should be dropped.
    fn is_noise(&self, span: &TextSpan) -> bool;

    /// Return the name of this filter for debugging.
    fn name(&self) -> &'static str;
}

/// Text-only noise filter.
///
/// Patterns are compiled once at construction and shared by every call.
#[derive(Debug, Clone)]
pub struct TextNoiseFilter {
    min_chars: usize,
    max_chars: usize,
    max_words: usize,
    stopword_ratio: f32,
    stopwords: BTreeSet<String>,
    furniture: Vec<Regex>,
    dates: Vec<Regex>,
    links: Vec<Regex>,
    auxiliary_verbs: Regex,
}

impl TextNoiseFilter {
    /// Build the filter from configuration.
    pub fn new(config: &OutlineConfig) -> Result<Self> {
        Ok(Self {
            min_chars: config.min_chars,
            max_chars: config.max_chars,
            max_words: config.max_words,
            stopword_ratio: config.stopword_ratio,
            stopwords: config.stopwords.iter().map(|w| w.to_lowercase()).collect(),
            furniture: compile_all(FURNITURE_PATTERNS)?,
            dates: compile_all(DATE_PATTERNS)?,
            links: compile_all(LINK_PATTERNS)?,
            auxiliary_verbs: Regex::new(AUXILIARY_VERBS)?,
        })
    }

    /// Add a page furniture pattern (e.g. a recurring running header).
    pub fn with_furniture_pattern(mut self, pattern: &str) -> Result<Self> {
        self.furniture.push(Regex::new(pattern)?);
        Ok(self)
    }

    /// Return the first rule the text violates, if any.
    pub fn noise_reason(&self, text: &str) -> Option<NoiseReason> {
        let text = text.trim();
        let len = text.chars().count();

        if len < self.min_chars {
            return Some(NoiseReason::TooShort);
        }
        if len > self.max_chars {
            return Some(NoiseReason::TooLong);
        }
        if text.split_whitespace().count() > self.max_words {
            return Some(NoiseReason::TooManyWords);
        }
        if self.dates.iter().any(|re| re.is_match(text)) {
            return Some(NoiseReason::Date);
        }
        if self.links.iter().any(|re| re.is_match(text)) {
            return Some(NoiseReason::Link);
        }
        if self.furniture.iter().any(|re| re.is_match(text)) {
            return Some(NoiseReason::PageFurniture);
        }
        if self.is_prose(text) {
            return Some(NoiseReason::Prose);
        }
        if is_all_lowercase(text) {
            return Some(NoiseReason::Lowercase);
        }
        if is_garbled(text) {
            return Some(NoiseReason::Garbled);
        }
        None
    }

    /// Check whether the text reads like a sentence rather than a label.
    pub fn is_prose(&self, text: &str) -> bool {
        let text = text.trim();

        if text.ends_with(&['.', '!', '?', ';'][..]) {
            return true;
        }
        if sentence_punctuation_count(text) >= 2 {
            return true;
        }
        if self.auxiliary_verbs.is_match(text) {
            return true;
        }

        let words: Vec<String> = text
            .split_whitespace()
            .map(|w| {
                w.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .filter(|w| !w.is_empty())
            .collect();
        if words.len() > 1 {
            let common = words.iter().filter(|w| self.stopwords.contains(*w)).count();
            if common as f32 / words.len() as f32 > self.stopword_ratio {
                return true;
            }
        }

        false
    }
}

impl NoiseFilter for TextNoiseFilter {
    fn is_noise(&self, span: &TextSpan) -> bool {
        match self.noise_reason(span.text()) {
            Some(reason) => {
                log::trace!("noise {:?}: '{}'", reason, span.text());
                true
            },
            None => false,
        }
    }

    fn name(&self) -> &'static str {
        "TextNoiseFilter"
    }
}

/// Runs several filters; a span is noise if any of them rejects it.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn NoiseFilter>>,
}

impl FilterChain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a filter.
    pub fn push(&mut self, filter: Box<dyn NoiseFilter>) {
        self.filters.push(filter);
    }

    /// Names of the filters in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }
}

impl NoiseFilter for FilterChain {
    fn is_noise(&self, span: &TextSpan) -> bool {
        self.filters.iter().any(|f| f.is_noise(span))
    }

    fn name(&self) -> &'static str {
        "FilterChain"
    }
}

/// Drops candidates that are small compared to the document average.
#[derive(Debug, Clone, Copy)]
pub struct RelativeSizeFilter {
    min_ratio: f32,
}

impl RelativeSizeFilter {
    /// Create a filter rejecting spans below `min_ratio` × average size.
    pub fn new(min_ratio: f32) -> Self {
        Self { min_ratio }
    }

    /// Check a span against the document statistics.
    pub fn is_too_small(&self, span: &TextSpan, stats: &FontStatistics) -> bool {
        stats.relative_size(span.font_size()) < self.min_ratio
    }
}

fn compile_all(patterns: &[&str]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| Regex::new(p).map_err(Into::into))
        .collect()
}

/// Count sentence punctuation, ignoring separators inside numbers like `1.2.3`.
fn sentence_punctuation_count(text: &str) -> usize {
    let chars: Vec<char> = text.chars().collect();
    chars
        .iter()
        .enumerate()
        .filter(|&(i, &c)| {
            if !matches!(c, '.' | '!' | '?' | ',' | ';' | ':') {
                return false;
            }
            let before = i.checked_sub(1).map(|j| chars[j]);
            let after = chars.get(i + 1).copied();
            let in_number = matches!(c, '.' | ',')
                && before.is_some_and(|b| b.is_ascii_digit())
                && after.is_some_and(|a| a.is_ascii_digit());
            !in_number
        })
        .count()
}

/// True when the text has cased letters and none of them is upper case.
fn is_all_lowercase(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_uppercase() {
            return false;
        }
        if c.is_lowercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// Runs of four identical characters or a word repeated back to back.
fn is_garbled(text: &str) -> bool {
    let mut run = 0;
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if Some(c) == prev && !c.is_whitespace() {
            run += 1;
            if run >= 4 {
                return true;
            }
        } else {
            run = 1;
        }
        prev = Some(c);
    }

    let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
    words
        .windows(2)
        .any(|pair| pair[0] == pair[1] && pair[0].chars().any(char::is_alphabetic))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> TextNoiseFilter {
        TextNoiseFilter::new(&OutlineConfig::default()).unwrap()
    }

    #[test]
    fn test_stopwords_from_json_are_case_folded() {
        let config: OutlineConfig =
            serde_json::from_str(r#"{"stopwords": ["Cargo", "Manifest"]}"#).unwrap();
        let f = TextNoiseFilter::new(&config).unwrap();
        assert!(!filter().is_prose("Cargo Manifest Review"));
        assert!(f.is_prose("Cargo Manifest Review"));
        assert!(config.is_stopword("cargo"));
    }

    #[test]
    fn test_headings_pass() {
        let f = filter();
        for text in [
            "Chapter 1",
            "1.1 Overview",
            "1.1.1 Scope and Purpose",
            "Introduction",
            "APPENDIX A",
            "II. Related Work",
            "Results of the Study",
            "Summary:",
        ] {
            assert_eq!(f.noise_reason(text), None, "{} should pass", text);
        }
    }

    #[test]
    fn test_length_limits() {
        let f = filter();
        assert_eq!(f.noise_reason("AB"), Some(NoiseReason::TooShort));
        let long = "Word ".repeat(40);
        assert_eq!(f.noise_reason(&long), Some(NoiseReason::TooLong));
        assert_eq!(
            f.noise_reason("One Two Three Four Five Six Seven Eight Nine Ten Eleven"),
            Some(NoiseReason::TooManyWords)
        );
    }

    #[test]
    fn test_page_furniture() {
        let f = filter();
        assert!(f.noise_reason("12").is_some());
        assert_eq!(f.noise_reason("127"), Some(NoiseReason::PageFurniture));
        assert_eq!(f.noise_reason("Page 3"), Some(NoiseReason::PageFurniture));
        assert_eq!(f.noise_reason("page 3 of 10"), Some(NoiseReason::PageFurniture));
        assert_eq!(f.noise_reason("3 of 10"), Some(NoiseReason::PageFurniture));
        assert_eq!(f.noise_reason("- 4 -"), Some(NoiseReason::PageFurniture));
    }

    #[test]
    fn test_dates_and_links() {
        let f = filter();
        assert_eq!(f.noise_reason("12/05/2023"), Some(NoiseReason::Date));
        assert_eq!(f.noise_reason("2023-05-12"), Some(NoiseReason::Date));
        assert_eq!(f.noise_reason("2024"), Some(NoiseReason::Date));
        assert_eq!(f.noise_reason("March 15, 2023"), Some(NoiseReason::Date));
        assert_eq!(f.noise_reason("15 March 2023"), Some(NoiseReason::Date));
        assert_eq!(f.noise_reason("www.example.org"), Some(NoiseReason::Link));
        assert_eq!(f.noise_reason("See https://example.org"), Some(NoiseReason::Link));
        assert_eq!(f.noise_reason("Contact info@example.com"), Some(NoiseReason::Link));
    }

    #[test]
    fn test_prose_rejected() {
        let f = filter();
        assert_eq!(
            f.noise_reason("This is a long sentence about the chapter."),
            Some(NoiseReason::Prose)
        );
        assert_eq!(f.noise_reason("Really?"), Some(NoiseReason::Prose));
        assert_eq!(f.noise_reason("First, second: third"), Some(NoiseReason::Prose));
        assert_eq!(f.noise_reason("The Results Were Good"), Some(NoiseReason::Prose));
        assert_eq!(f.noise_reason("Between The Lines"), Some(NoiseReason::Prose));
    }

    #[test]
    fn test_lowercase_rejected() {
        let f = filter();
        assert_eq!(f.noise_reason("continued from above"), Some(NoiseReason::Prose));
        assert_eq!(f.noise_reason("continued overleaf"), Some(NoiseReason::Lowercase));
    }

    #[test]
    fn test_garbled_rejected() {
        let f = filter();
        assert_eq!(f.noise_reason("Draft XXXX Version"), Some(NoiseReason::Garbled));
        assert_eq!(f.noise_reason("Annual Annual Report"), Some(NoiseReason::Garbled));
        assert_eq!(f.noise_reason("Booook Title"), Some(NoiseReason::Garbled));
        assert_eq!(f.noise_reason("Bookkeeping Basics"), None);
    }

    #[test]
    fn test_extra_furniture_pattern() {
        let f = filter().with_furniture_pattern(r"^ACME Corp Confidential$").unwrap();
        assert_eq!(f.noise_reason("ACME Corp Confidential"), Some(NoiseReason::PageFurniture));
        assert!(filter().with_furniture_pattern("(broken").is_err());
    }

    struct RejectAll;

    impl NoiseFilter for RejectAll {
        fn is_noise(&self, _span: &TextSpan) -> bool {
            true
        }

        fn name(&self) -> &'static str {
            "RejectAll"
        }
    }

    #[test]
    fn test_filter_chain() {
        let span = TextSpan::new("Introduction", 1, 14.0, true, 0.0).unwrap();

        let mut chain = FilterChain::new();
        chain.push(Box::new(filter()));
        assert!(!chain.is_noise(&span));

        chain.push(Box::new(RejectAll));
        assert!(chain.is_noise(&span));
        assert_eq!(chain.names(), vec!["TextNoiseFilter", "RejectAll"]);
    }

    #[test]
    fn test_relative_size_filter() {
        let spans = vec![
            TextSpan::new("Heading", 1, 20.0, false, 0.0).unwrap(),
            TextSpan::new("Tiny Label", 1, 6.0, false, 10.0).unwrap(),
        ];
        let stats = FontStatistics::collect(&spans);
        let size_filter = RelativeSizeFilter::new(0.8);

        assert!(!size_filter.is_too_small(&spans[0], &stats));
        assert!(size_filter.is_too_small(&spans[1], &stats));
    }
}
